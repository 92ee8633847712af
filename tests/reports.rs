use std::fs;
use std::path::Path;
use std::process::Command;

use sim_charts::config::{FlowRoleMap, InputConfig, RenderConfig};
use sim_charts::data::loader::load_dataset;
use sim_charts::data::model::Dataset;
use sim_charts::figure::{MarkerShape, Panel};
use sim_charts::reports::{combined_report, compare_delay_report, sinr_report, Inputs, ReportKind};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

fn scenario() -> (TempDir, InputConfig) {
    let dir = tempfile::tempdir().unwrap();
    let cfg = InputConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    write(
        dir.path(),
        &cfg.throughput,
        "Time,UE_ID,Throughput_Mbps\n\
         0.5,1,3.0\n0.5,2,2.9\n0.5,3,3.1\n\
         1.0,1,3.1\n1.0,2,0.6\n1.0,3,3.0\n\
         1.5,1,2.9\n1.5,2,2.7\n1.5,3,3.0\n",
    );
    write(
        dir.path(),
        &cfg.flow_stats,
        "FlowID,Src,Dst,TxPkts,RxPkts,LostPkts,LossRate,Delay(ms),Jitter(ms)\n\
         7,1.0.0.2,7.0.0.3,5400,5314,86,0.0159,15.2,1.45\n\
         2,1.0.0.2,7.0.0.2,40,40,0,0,3.1,0.05\n\
         3,1.0.0.2,7.0.0.4,5400,5399,1,0.0002,14.8,0.32\n\
         1,1.0.0.2,7.0.0.2,5400,5400,0,0,14.9,0.35\n",
    );
    write(
        dir.path(),
        &cfg.rsrp,
        "Time,IMSI,CellId,RSRP\n\
         0.5,2,1,-80.0\n0.5,2,2,-95.0\n\
         1.0,2,1,-88.0\n1.0,2,2,-86.0\n\
         1.0,1,1,-82.0\n",
    );
    write(
        dir.path(),
        &cfg.handover_quality,
        "Time,IMSI,Source,Target,PingPong,Duration,TpBefore,TpAfter,Degradation\n\
         12.5,2,1,2,0,0.04,2.9,2.6,10.3\n\
         20.0,1,1,2,0,0.04,3.0,3.0,0.0\n\
         41.25,2,2,3,0,0.05,2.8,2.5,10.7\n",
    );
    (dir, cfg)
}

#[test]
fn combined_report_from_files() {
    let (_dir, cfg) = scenario();
    let inputs = Inputs::load(&cfg, ReportKind::Combined.inputs());
    let fig = combined_report(&inputs, &FlowRoleMap::default());

    // One throughput panel per static UE, all three on the comparison.
    for (col, ue_label) in [(0, "(A) UE 1"), (1, "(B) UE 3")] {
        let panel = fig.panel_at(0, col).and_then(Panel::as_lines).unwrap();
        assert!(panel.style.title.starts_with(ue_label));
        assert_eq!(panel.traces.len(), 1);
        assert_eq!(panel.traces[0].points.len(), 3);
    }
    let comparison = fig.panel_at(0, 2).and_then(Panel::as_lines).unwrap();
    assert_eq!(comparison.traces.len(), 3);

    // Flow 2 is below the packet threshold; the rest are sorted by id.
    let jitter = fig.panel_at(0, 3).and_then(Panel::as_bars).unwrap();
    let labels: Vec<&str> = jitter.bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["UE 1", "UE 3", "UE 2"]);
    assert_eq!(jitter.bars[0].color, jitter.bars[1].color);
    assert_ne!(jitter.bars[2].color, jitter.bars[0].color);
    assert!((jitter.y_max - 1.45 * 1.25).abs() < 1e-9);

    // SINR and MEC files were never written.
    assert!(fig.panel_at(1, 2).unwrap().is_blank());
    assert!(fig.panel_at(1, 3).unwrap().is_blank());
}

#[test]
fn handover_markers_follow_the_mobile_ue() {
    let (_dir, cfg) = scenario();
    let inputs = Inputs::load(&cfg, ReportKind::Combined.inputs());
    let fig = combined_report(&inputs, &FlowRoleMap::default());

    let rsrp = fig.panel_at(1, 0).and_then(Panel::as_lines).unwrap();
    let times: Vec<f64> = rsrp.markers.iter().map(|m| m.time).collect();
    assert_eq!(times, [12.5, 41.25]);
    assert!(rsrp.markers.iter().all(|m| m.shape == MarkerShape::Line && m.dashed));
    assert_eq!(rsrp.traces.len(), 2);

    let impact = fig.panel_at(1, 1).and_then(Panel::as_lines).unwrap();
    assert_eq!(
        impact.markers[0].shape,
        MarkerShape::Band {
            start: 10.5,
            end: 14.5
        }
    );
}

#[test]
fn missing_files_leave_panels_blank() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = InputConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let sinr = load_dataset(&cfg.path(&cfg.sinr));
    assert!(sinr.is_missing());
    assert!(matches!(sinr, Dataset::Missing { .. }));

    let inputs = Inputs::load(&cfg, ReportKind::CompareDelay.inputs());
    let fig = compare_delay_report(&inputs, &FlowRoleMap::default());
    assert_eq!(fig.slots.len(), 4);
    assert_eq!(fig.populated().count(), 0);
    assert_eq!(sinr_report(&inputs).populated().count(), 0);
}

#[test]
fn sample_generator_feeds_every_report() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("run");
    let config = dir.path().join("sim-charts.json");
    fs::write(
        &config,
        serde_json::json!({ "input": { "data_dir": data_dir } }).to_string(),
    )
    .unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_generate_sample"))
        .env("SIM_CHARTS_CONFIG", &config)
        .status()
        .unwrap();
    assert!(status.success());

    let cfg = InputConfig {
        data_dir,
        ..Default::default()
    };
    let inputs = Inputs::load(&cfg, ReportKind::Combined.inputs());
    let fig = combined_report(&inputs, &FlowRoleMap::default());
    assert_eq!(fig.populated().count(), 8);

    let jitter = fig.panel_at(0, 3).and_then(Panel::as_bars).unwrap();
    assert_eq!(jitter.bars.len(), 3);

    let sinr = fig.panel_at(1, 3).and_then(Panel::as_lines).unwrap();
    assert!(sinr.traces[0].points.iter().all(|p| p.value < 60.0));
    assert_eq!(sinr.markers.len(), 2);
}

#[test]
#[ignore = "needs system fonts"]
fn renders_png_of_configured_size() {
    let (dir, cfg) = scenario();
    let inputs = Inputs::load(&cfg, ReportKind::Combined.inputs());
    let fig = combined_report(&inputs, &FlowRoleMap::default());
    let render = RenderConfig {
        dpi: 40,
        ..ReportKind::Combined.render_config(&RenderConfig::default())
    };
    let out = dir.path().join(ReportKind::Combined.output_file());
    sim_charts::render::render_png(&fig, &render, &out).unwrap();

    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), render.pixel_size());
}
