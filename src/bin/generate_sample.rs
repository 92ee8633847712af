//! Writes a small, deterministic handover scenario in the simulator's CSV
//! format so the report binaries can be tried without running a simulation.
//!
//! Files land in the configured input directory under the configured names.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;
use log::info;

use sim_charts::config::{InputConfig, ReportConfig};

/// Simulated seconds.
const DURATION_S: f64 = 60.0;
/// Sampling step of the periodic traces.
const STEP_S: f64 = 0.5;
/// Times at which UE 2 changes serving cell, with (source, target).
const HANDOVERS: [(f64, u32, u32); 2] = [(20.0, 1, 2), (40.0, 2, 3)];

const STATIC_UES: [u32; 2] = [1, 3];
const MOBILE_UE: u32 = 2;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn sample_times() -> impl Iterator<Item = f64> {
    let steps = (DURATION_S / STEP_S) as usize;
    (1..=steps).map(|i| i as f64 * STEP_S)
}

/// Distance in seconds to the nearest handover of the mobile UE.
fn handover_distance(t: f64) -> f64 {
    HANDOVERS
        .iter()
        .map(|(at, _, _)| (t - at).abs())
        .fold(f64::INFINITY, f64::min)
}

fn writer(dir: &Path, file: &str) -> Result<Writer<fs::File>> {
    let path = dir.join(file);
    Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))
}

fn write_throughput(dir: &Path, cfg: &InputConfig, rng: &mut SimpleRng) -> Result<()> {
    let mut w = writer(dir, &cfg.throughput)?;
    w.write_record(["Time", "UE_ID", "Throughput_Mbps"])?;
    for t in sample_times() {
        for ue in [1, MOBILE_UE, 3] {
            let mbps = if ue == MOBILE_UE {
                let dip = (1.0 - handover_distance(t) / 2.0).max(0.0);
                2.9 * (1.0 - 0.85 * dip) + rng.gauss(0.0, 0.15)
            } else {
                3.0 + rng.gauss(0.0, 0.08)
            };
            w.write_record([
                format!("{t:.1}"),
                ue.to_string(),
                format!("{:.4}", mbps.max(0.0)),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

fn write_rsrp(dir: &Path, cfg: &InputConfig, rng: &mut SimpleRng) -> Result<()> {
    let mut w = writer(dir, &cfg.rsrp)?;
    w.write_record(["Time", "IMSI", "CellId", "RSRP"])?;
    for t in sample_times() {
        // The mobile UE flies past cells 1, 2 and 3 in turn.
        let position = t / DURATION_S * 3.0;
        for cell in 1..=3u32 {
            let distance = (position - (cell as f64 - 0.5)).abs();
            let rsrp = -75.0 - 18.0 * distance + rng.gauss(0.0, 1.5);
            w.write_record([
                format!("{t:.1}"),
                MOBILE_UE.to_string(),
                cell.to_string(),
                format!("{rsrp:.2}"),
            ])?;
        }
        for ue in STATIC_UES {
            w.write_record([
                format!("{t:.1}"),
                ue.to_string(),
                "1".to_string(),
                format!("{:.2}", -82.0 + rng.gauss(0.0, 1.0)),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

fn write_sinr(dir: &Path, cfg: &InputConfig, rng: &mut SimpleRng) -> Result<()> {
    let mut w = writer(dir, &cfg.sinr)?;
    w.write_record(["Time", "IMSI", "SINR"])?;
    for (i, t) in sample_times().enumerate() {
        for ue in [1, MOBILE_UE, 3] {
            let sinr = if ue == MOBILE_UE {
                // Occasional saturated readings the reports filter out.
                if i % 37 == 0 {
                    80.0
                } else {
                    let dip = (1.0 - handover_distance(t) / 3.0).max(0.0);
                    22.0 - 20.0 * dip + rng.gauss(0.0, 4.0)
                }
            } else {
                25.0 + rng.gauss(0.0, 2.0)
            };
            w.write_record([format!("{t:.1}"), ue.to_string(), format!("{sinr:.3}")])?;
        }
    }
    w.flush()?;
    Ok(())
}

fn write_mec(dir: &Path, cfg: &InputConfig, rng: &mut SimpleRng) -> Result<()> {
    let mut w = writer(dir, &cfg.mec_offload)?;
    w.write_record([
        "Time",
        "UE_ID",
        "TaskID",
        "Type",
        "Latency",
        "Throughput",
        "MigrationPenalty",
    ])?;
    let mut task = 0u32;
    for k in 1..=(DURATION_S / 2.0) as u32 {
        let t = k as f64 * 2.0;
        for ue in [1, MOBILE_UE, 3] {
            task += 1;
            let near_ho = ue == MOBILE_UE && handover_distance(t) <= 2.0;
            let penalty = if near_ho { 0.035 } else { 0.0 };
            let latency = 0.012 + penalty + rng.next_f64() * 0.006;
            w.write_record([
                format!("{t:.1}"),
                ue.to_string(),
                task.to_string(),
                "Offload".to_string(),
                format!("{latency:.5}"),
                format!("{:.3}", 2.5 + rng.gauss(0.0, 0.2)),
                format!("{penalty:.3}"),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

fn write_handovers(dir: &Path, cfg: &InputConfig) -> Result<()> {
    let mut w = writer(dir, &cfg.handover_quality)?;
    w.write_record([
        "Time",
        "IMSI",
        "Source",
        "Target",
        "PingPong",
        "Duration",
        "TpBefore",
        "TpAfter",
        "Degradation",
    ])?;
    for (at, source, target) in HANDOVERS {
        w.write_record([
            format!("{at:.1}"),
            MOBILE_UE.to_string(),
            source.to_string(),
            target.to_string(),
            "0".to_string(),
            "0.045".to_string(),
            "2.91".to_string(),
            "2.62".to_string(),
            "9.97".to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn write_flow_stats(dir: &Path, cfg: &InputConfig, rng: &mut SimpleRng) -> Result<()> {
    let mut w = writer(dir, &cfg.flow_stats)?;
    w.write_record([
        "FlowID", "Src", "Dst", "TxPkts", "RxPkts", "LostPkts", "LossRate", "Delay(ms)",
        "Jitter(ms)",
    ])?;
    // Downlink data flows 1, 3 and 7 (the mobile UE); the rest is signalling.
    let flows: [(u32, &str, u32, f64); 6] = [
        (1, "7.0.0.2", 5400, 0.35),
        (2, "7.0.0.2", 40, 0.05),
        (3, "7.0.0.4", 5400, 0.32),
        (4, "7.0.0.4", 38, 0.04),
        (7, "7.0.0.3", 5400, 1.45),
        (8, "7.0.0.3", 41, 0.06),
    ];
    for (id, dst, tx, jitter) in flows {
        let lost = if id == 7 { 86 } else { (rng.next_f64() * 3.0) as u32 };
        let rx = tx.saturating_sub(lost);
        w.write_record([
            id.to_string(),
            "1.0.0.2".to_string(),
            dst.to_string(),
            tx.to_string(),
            rx.to_string(),
            lost.to_string(),
            format!("{:.4}", lost as f64 / tx as f64),
            format!("{:.3}", 15.0 + rng.gauss(0.0, 1.0)),
            format!("{:.3}", jitter + rng.gauss(0.0, 0.02).abs()),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    sim_charts::init_logging();

    let cfg = ReportConfig::discover().input;
    let dir = cfg.data_dir.as_path();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    write_throughput(dir, &cfg, &mut rng)?;
    write_rsrp(dir, &cfg, &mut rng)?;
    write_sinr(dir, &cfg, &mut rng)?;
    write_mec(dir, &cfg, &mut rng)?;
    write_handovers(dir, &cfg)?;
    write_flow_stats(dir, &cfg, &mut rng)?;
    info!("sample scenario written to {}", dir.display());

    println!(
        "Wrote {:.0} s of samples for UEs 1-3 with {} handovers to {}",
        DURATION_S,
        HANDOVERS.len(),
        dir.display()
    );
    Ok(())
}
