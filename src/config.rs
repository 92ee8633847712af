//! Report configuration: figure style, input/output locations, flow roles.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::data::model::SubjectId;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "SIM_CHARTS_CONFIG";
/// Configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sim-charts.json";

/// Everything a report binary needs besides the data itself.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub render: RenderConfig,
    pub flow_roles: FlowRoleMap,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub data_dir: PathBuf,
    pub throughput: String,
    pub flow_stats: String,
    pub rsrp: String,
    pub sinr: String,
    pub mec_offload: String,
    pub handover_quality: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            throughput: "scenario1_final_throughput.csv".into(),
            flow_stats: "scenario1_final_flow_stats.csv".into(),
            rsrp: "scenario1_final_rsrp.csv".into(),
            sinr: "scenario1_final_sinr.csv".into(),
            mec_offload: "scenario1_final_mec_offload.csv".into(),
            handover_quality: "scenario1_final_handover_quality.csv".into(),
        }
    }
}

impl InputConfig {
    pub fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Explicit replacement for a plotting library's global style state.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Figure size in inches (width, height).
    pub figure_size: (f64, f64),
    pub dpi: u32,
    /// Base font size in points.
    pub font_size: f64,
    /// Default line width in points.
    pub line_width: f64,
    pub background: String,
    pub font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            figure_size: (24.0, 12.0),
            dpi: 300,
            font_size: 10.0,
            line_width: 2.0,
            background: "white".into(),
            font_family: "sans-serif".into(),
        }
    }
}

impl RenderConfig {
    pub fn with_figure_size(mut self, width: f64, height: f64) -> Self {
        self.figure_size = (width, height);
        self
    }

    pub fn with_font_size(mut self, pt: f64) -> Self {
        self.font_size = pt;
        self
    }

    pub fn with_line_width(mut self, pt: f64) -> Self {
        self.line_width = pt;
        self
    }

    /// Output size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_size;
        let dpi = self.dpi as f64;
        ((w * dpi).round().max(1.0) as u32, (h * dpi).round().max(1.0) as u32)
    }

    /// Convert a length in points to pixels at this DPI.
    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.0
    }
}

// ---------------------------------------------------------------------------
// Flow roles
// ---------------------------------------------------------------------------

/// Display label and colour for one flow role.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlowRole {
    /// Label template; `{flow}` is replaced with the flow id.
    pub label: String,
    /// Template for crowded figures; falls back to `label`.
    #[serde(default)]
    pub short_label: Option<String>,
    pub color: String,
}

/// Which of a role's label templates a chart uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    #[default]
    Full,
    Short,
}

impl FlowRole {
    pub fn new(label: &str, short_label: &str, color: &str) -> Self {
        Self {
            label: label.into(),
            short_label: Some(short_label.into()),
            color: color.into(),
        }
    }

    pub fn label_for(&self, flow: SubjectId, style: LabelStyle) -> String {
        let template = match style {
            LabelStyle::Full => &self.label,
            LabelStyle::Short => self.short_label.as_ref().unwrap_or(&self.label),
        };
        template.replace("{flow}", &flow.to_string())
    }
}

/// Which flows belong to which tracked unit. Flows not listed get `default`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlowRoleMap {
    pub roles: BTreeMap<SubjectId, FlowRole>,
    pub default: FlowRole,
}

impl Default for FlowRoleMap {
    /// Flow 7 carries the mobile UE's traffic in the handover scenario.
    fn default() -> Self {
        Self {
            roles: [(7, FlowRole::new("UE 2 (Mobile)\nFlow {flow}", "UE 2", "red"))].into(),
            default: FlowRole::new("UE Static\nFlow {flow}", "UE {flow}", "skyblue"),
        }
    }
}

impl FlowRoleMap {
    pub fn role_for(&self, flow: SubjectId) -> &FlowRole {
        self.roles.get(&flow).unwrap_or(&self.default)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl ReportConfig {
    /// Read a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Configuration for a report run: `$SIM_CHARTS_CONFIG`, else
    /// `sim-charts.json` in the working directory, else defaults.
    ///
    /// A broken file is reported and ignored.
    pub fn discover() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(cfg) => {
                debug!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                error!("{e:#}; using defaults");
                Self::default()
            }
        }
    }

    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output.output_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_size_follows_dpi() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.pixel_size(), (7200, 3600));
        let small = cfg.with_figure_size(12.0, 6.0);
        assert_eq!(small.pixel_size(), (3600, 1800));
        assert!((small.pt_to_px(72.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn default_roles_single_out_flow_seven() {
        let roles = FlowRoleMap::default();
        assert_eq!(roles.role_for(7).color, "red");
        assert_eq!(roles.role_for(1).color, "skyblue");
        assert_eq!(roles.role_for(3).label_for(3, LabelStyle::Full), "UE Static\nFlow 3");
        assert_eq!(roles.role_for(3).label_for(3, LabelStyle::Short), "UE 3");
        assert_eq!(roles.role_for(7).label_for(7, LabelStyle::Short), "UE 2");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: ReportConfig =
            serde_json::from_str(r#"{ "input": { "data_dir": "runs/42" }, "render": { "dpi": 100 } }"#)
                .unwrap();
        assert_eq!(cfg.input.data_dir, PathBuf::from("runs/42"));
        assert_eq!(cfg.input.sinr, "scenario1_final_sinr.csv");
        assert_eq!(cfg.render.dpi, 100);
        assert_eq!(cfg.render.figure_size, (24.0, 12.0));
        assert_eq!(cfg.flow_roles, FlowRoleMap::default());
    }

    #[test]
    fn flow_roles_are_configurable() {
        let cfg: ReportConfig = serde_json::from_str(
            r#"{ "flow_roles": {
                    "roles": { "4": { "label": "UAV {flow}", "color": "orange" } },
                    "default": { "label": "other", "color": "gray" } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.flow_roles.role_for(4).label_for(4, LabelStyle::Full), "UAV 4");
        assert_eq!(cfg.flow_roles.role_for(4).label_for(4, LabelStyle::Short), "UAV 4");
        assert_eq!(cfg.flow_roles.role_for(7).label, "other");
    }
}
