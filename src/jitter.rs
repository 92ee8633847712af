//! Per-flow jitter bar chart from FlowMonitor statistics.

use log::debug;

use crate::color::color_or_black;
use crate::config::{FlowRoleMap, LabelStyle};
use crate::data::model::{SubjectId, TabularDataset};
use crate::figure::{Bar, BarPanel, Panel, PanelStyle, ValueFormat};

/// Flows that sent this many packets or fewer are treated as noise.
pub const NOISE_THRESHOLD_PKTS: f64 = 100.0;

/// Headroom above the tallest bar.
const Y_HEADROOM: f64 = 1.25;

pub const NO_DATA_MESSAGE: &str = "No Valid Flow Data";

/// One row that survived the packet-count filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowJitter {
    pub flow: SubjectId,
    pub tx_packets: f64,
    pub jitter_ms: f64,
}

#[derive(Debug, Clone)]
pub struct JitterBarAggregator {
    pub flow_column: String,
    pub tx_column: String,
    pub jitter_column: String,
    pub threshold: f64,
    pub roles: FlowRoleMap,
    pub label_style: LabelStyle,
    pub value_format: ValueFormat,
}

impl JitterBarAggregator {
    pub fn new(roles: FlowRoleMap) -> Self {
        Self {
            flow_column: "FlowID".into(),
            tx_column: "TxPkts".into(),
            jitter_column: "Jitter(ms)".into(),
            threshold: NOISE_THRESHOLD_PKTS,
            roles,
            label_style: LabelStyle::Full,
            value_format: ValueFormat::default(),
        }
    }

    pub fn label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }

    pub fn value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    /// Flows above the packet threshold, sorted by flow id.
    ///
    /// Rows with a non-numeric or fractional flow id, a non-numeric packet
    /// count or a non-finite jitter are dropped.
    /// The sort is stable, so duplicate flow ids keep source order.
    pub fn aggregate(&self, flows: &TabularDataset) -> Vec<FlowJitter> {
        let (Some(f_idx), Some(tx_idx), Some(j_idx)) = (
            flows.column_index(&self.flow_column),
            flows.column_index(&self.tx_column),
            flows.column_index(&self.jitter_column),
        ) else {
            debug!("flow stats lack one of the jitter columns: {:?}", flows.columns);
            return Vec::new();
        };

        let mut kept: Vec<FlowJitter> = flows
            .rows
            .iter()
            .filter_map(|row| {
                let flow = row[f_idx].as_f64().filter(|f| f.fract() == 0.0)?;
                let tx_packets = row[tx_idx].as_f64()?;
                let jitter_ms = row[j_idx].as_f64().filter(|j| j.is_finite())?;
                (tx_packets > self.threshold).then_some(FlowJitter {
                    flow: flow as SubjectId,
                    tx_packets,
                    jitter_ms,
                })
            })
            .collect();
        kept.sort_by_key(|f| f.flow);
        kept
    }

    /// Bar panel for the given flow table. A missing table leaves the panel
    /// blank; an empty result shows the no-data placeholder.
    pub fn build(&self, flows: Option<&TabularDataset>, style: PanelStyle) -> Panel {
        let Some(flows) = flows else {
            return Panel::Blank;
        };
        let kept = self.aggregate(flows);
        if kept.is_empty() {
            return Panel::Placeholder(NO_DATA_MESSAGE.into());
        }

        let bars: Vec<Bar> = kept
            .iter()
            .map(|f| {
                let role = self.roles.role_for(f.flow);
                Bar {
                    label: role.label_for(f.flow, self.label_style),
                    value: f.jitter_ms,
                    color: color_or_black(&role.color),
                }
            })
            .collect();
        let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
        let y_max = if max > 0.0 { max * Y_HEADROOM } else { 1.0 };

        Panel::Bars(BarPanel {
            style,
            bars,
            y_max,
            value_format: self.value_format.clone(),
        })
    }
}
