//! The four simulation reports, each a fixed grid of panels over the
//! scenario's CSV outputs.
//!
//! Every builder is a pure function from loaded [`Inputs`] to a [`Figure`];
//! [`run`] adds configuration discovery, loading, rendering and the exit
//! status shared by all report binaries.

use std::process::ExitCode;

use log::{info, warn};
use plotters::style::RGBColor;

use crate::config::{FlowRoleMap, InputConfig, LabelStyle, RenderConfig, ReportConfig};
use crate::data::filter::filter_by_subject;
use crate::data::loader::load_dataset;
use crate::data::model::{Dataset, SubjectId, TabularDataset};
use crate::figure::{
    AnnotationPlacement, Figure, GridCell, LegendPosition, LegendStyle, Panel, PanelStyle,
    ValueFormat,
};
use crate::jitter::JitterBarAggregator;
use crate::plotter::{EventSpec, PivotSpec, SeriesSpec, TimeSeriesEventPlotter};
use crate::render::render_png;

/// The mobile UE whose handovers the reports follow.
pub const MOBILE_UE: SubjectId = 2;
/// Static reference UEs.
pub const STATIC_UES: [SubjectId; 2] = [1, 3];

/// Target rate of the static UEs, in Mbps.
pub const EXPECTED_THROUGHPUT_MBPS: f64 = 3.0;
/// Half-width of the shaded window around a handover, in seconds.
pub const HO_IMPACT_HALF_WIDTH_S: f64 = 2.0;
/// SINR samples at or above this are simulator artifacts.
pub const SINR_CEILING_DB: f64 = 60.0;

const TAB_BLUE: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const TAB_ORANGE: RGBColor = RGBColor(0xff, 0x7f, 0x0e);
const TAB_GREEN: RGBColor = RGBColor(0x2c, 0xa0, 0x2c);
const RED: RGBColor = RGBColor(255, 0, 0);
const DARK_RED: RGBColor = RGBColor(139, 0, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);

/// Column names written by the simulator.
pub mod columns {
    pub const TIME: &str = "Time";
    pub const UE_ID: &str = "UE_ID";
    pub const IMSI: &str = "IMSI";
    pub const THROUGHPUT: &str = "Throughput_Mbps";
    pub const CELL_ID: &str = "CellId";
    pub const RSRP: &str = "RSRP";
    pub const SINR: &str = "SINR";
    pub const LATENCY: &str = "Latency";
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Throughput,
    FlowStats,
    Rsrp,
    Sinr,
    MecOffload,
    HandoverQuality,
}

impl Input {
    pub fn file_name(self, cfg: &InputConfig) -> &str {
        match self {
            Input::Throughput => &cfg.throughput,
            Input::FlowStats => &cfg.flow_stats,
            Input::Rsrp => &cfg.rsrp,
            Input::Sinr => &cfg.sinr,
            Input::MecOffload => &cfg.mec_offload,
            Input::HandoverQuality => &cfg.handover_quality,
        }
    }
}

/// The simulator outputs a report reads. Inputs a report does not ask for
/// stay missing without being touched on disk.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub throughput: Dataset,
    pub flow_stats: Dataset,
    pub rsrp: Dataset,
    pub sinr: Dataset,
    pub mec_offload: Dataset,
    pub handover: Dataset,
}

impl Default for Inputs {
    fn default() -> Self {
        let missing = || Dataset::Missing {
            path: Default::default(),
        };
        Self {
            throughput: missing(),
            flow_stats: missing(),
            rsrp: missing(),
            sinr: missing(),
            mec_offload: missing(),
            handover: missing(),
        }
    }
}

impl Inputs {
    pub fn load(cfg: &InputConfig, wanted: &[Input]) -> Self {
        let mut inputs = Self::default();
        for &input in wanted {
            *inputs.slot_mut(input) = load_dataset(&cfg.path(input.file_name(cfg)));
        }
        inputs
    }

    /// Replace one input, mainly for building figures from in-memory tables.
    pub fn with(mut self, input: Input, table: TabularDataset) -> Self {
        *self.slot_mut(input) = Dataset::Loaded(table);
        self
    }

    fn slot_mut(&mut self, input: Input) -> &mut Dataset {
        match input {
            Input::Throughput => &mut self.throughput,
            Input::FlowStats => &mut self.flow_stats,
            Input::Rsrp => &mut self.rsrp,
            Input::Sinr => &mut self.sinr,
            Input::MecOffload => &mut self.mec_offload,
            Input::HandoverQuality => &mut self.handover,
        }
    }

    /// Handover events of one UE, `None` when the event table is missing
    /// or empty.
    fn handovers_of(&self, ue: SubjectId) -> Option<TabularDataset> {
        self.handover
            .non_empty()
            .map(|ho| filter_by_subject(ho, columns::IMSI, ue))
    }
}

// ---------------------------------------------------------------------------
// Report catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// 2×4 overview of every metric.
    Combined,
    /// Static vs mobile throughput and per-flow jitter, 2×2.
    CompareDelay,
    /// RSRP across the top row, throughput and MEC latency below.
    Handover,
    /// SINR of the mobile UE alone.
    Sinr,
}

impl ReportKind {
    pub fn output_file(self) -> &'static str {
        match self {
            ReportKind::Combined => "Full_UAV_MEC_Report_2x4.png",
            ReportKind::CompareDelay => "Compare & Delay.png",
            ReportKind::Handover => "UAV_MEC_Report_3Charts_Clean.png",
            ReportKind::Sinr => "SINR_Only_Report.png",
        }
    }

    pub fn inputs(self) -> &'static [Input] {
        match self {
            ReportKind::Combined => &[
                Input::Throughput,
                Input::FlowStats,
                Input::Rsrp,
                Input::Sinr,
                Input::MecOffload,
                Input::HandoverQuality,
            ],
            ReportKind::CompareDelay => &[Input::Throughput, Input::FlowStats],
            ReportKind::Handover => &[
                Input::Throughput,
                Input::Rsrp,
                Input::MecOffload,
                Input::HandoverQuality,
            ],
            ReportKind::Sinr => &[Input::Sinr, Input::HandoverQuality],
        }
    }

    /// Figure size and base font/line size of this report; DPI, background
    /// and font family come from `base`.
    pub fn render_config(self, base: &RenderConfig) -> RenderConfig {
        let base = base.clone();
        match self {
            ReportKind::Combined => base
                .with_figure_size(24.0, 12.0)
                .with_font_size(10.0)
                .with_line_width(2.0),
            ReportKind::CompareDelay => base
                .with_figure_size(18.0, 12.0)
                .with_font_size(11.0)
                .with_line_width(2.0),
            ReportKind::Handover => base
                .with_figure_size(16.0, 12.0)
                .with_font_size(12.5)
                .with_line_width(2.5),
            ReportKind::Sinr => base
                .with_figure_size(12.0, 6.0)
                .with_font_size(10.0)
                .with_line_width(2.0),
        }
    }

    pub fn build(self, inputs: &Inputs, roles: &FlowRoleMap) -> Figure {
        match self {
            ReportKind::Combined => combined_report(inputs, roles),
            ReportKind::CompareDelay => compare_delay_report(inputs, roles),
            ReportKind::Handover => handover_report(inputs),
            ReportKind::Sinr => sinr_report(inputs),
        }
    }
}

/// Discover configuration, load inputs, build and write one report.
///
/// Missing inputs only blank their panels; the exit status is a failure
/// only when the image cannot be written.
pub fn run(kind: ReportKind) -> ExitCode {
    let config = ReportConfig::discover();
    let inputs = Inputs::load(&config.input, kind.inputs());
    let figure = kind.build(&inputs, &config.flow_roles);

    if figure.populated().next().is_none() {
        warn!("no input data found, {} will be empty", kind.output_file());
    }

    let path = config.output_path(kind.output_file());
    let render = kind.render_config(&config.render);
    match render_png(&figure, &render, &path) {
        Ok(()) => {
            info!("{:?} report written", kind);
            println!("Saved report: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to save {}: {e:#}", path.display());
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Shared panels
// ---------------------------------------------------------------------------

fn rows_of(ds: &Dataset, id_column: &str, ue: SubjectId) -> Option<TabularDataset> {
    ds.non_empty().map(|t| filter_by_subject(t, id_column, ue))
}

fn small_legend() -> LegendStyle {
    LegendStyle::default().font_scale(0.8)
}

/// Throughput of one static UE against the expected rate.
fn static_throughput_panel(
    inputs: &Inputs,
    ue: SubjectId,
    color: RGBColor,
    style: PanelStyle,
) -> Panel {
    let Some(rows) = rows_of(&inputs.throughput, columns::UE_ID, ue) else {
        return Panel::Blank;
    };
    TimeSeriesEventPlotter::new(
        style
            .x_label("Time (s)")
            .y_label("Mbps")
            .y_bounds(0.0, 5.0),
    )
    .series(
        &rows,
        &SeriesSpec::new(columns::TIME, columns::THROUGHPUT, "Throughput", color),
    )
    .threshold(
        EXPECTED_THROUGHPUT_MBPS,
        RED,
        0.5,
        Some("Expected (3Mbps)"),
    )
    .build()
}

/// All three UEs on one axis, the mobile one emphasised.
fn throughput_comparison_panel(
    inputs: &Inputs,
    labels: [&str; 3],
    style: PanelStyle,
) -> Panel {
    let Some(thpt) = inputs.throughput.non_empty() else {
        return Panel::Blank;
    };
    let [ue1, ue3, ue2] = labels;
    let series = |ue: SubjectId, spec: SeriesSpec| {
        (filter_by_subject(thpt, columns::UE_ID, ue), spec)
    };
    let lines = [
        series(
            STATIC_UES[0],
            SeriesSpec::new(columns::TIME, columns::THROUGHPUT, ue1, TAB_BLUE).alpha(0.4),
        ),
        series(
            STATIC_UES[1],
            SeriesSpec::new(columns::TIME, columns::THROUGHPUT, ue3, TAB_ORANGE).alpha(0.4),
        ),
        series(
            MOBILE_UE,
            SeriesSpec::new(columns::TIME, columns::THROUGHPUT, ue2, RED).width(2.5),
        ),
    ];
    lines
        .iter()
        .fold(
            TimeSeriesEventPlotter::new(
                style
                    .title_color(DARK_RED)
                    .x_label("Time (s)")
                    .y_label("Throughput (Mbps)")
                    .strong_grid(),
            ),
            |plot, (rows, spec)| plot.series(rows, spec),
        )
        .build()
}

/// RSRP per serving cell with a dashed line at every handover.
fn rsrp_panel(inputs: &Inputs, events: &EventSpec, marker_pt: f64, style: PanelStyle) -> Panel {
    let Some(rows) = rows_of(&inputs.rsrp, columns::IMSI, MOBILE_UE) else {
        return Panel::Blank;
    };
    let handovers = inputs.handovers_of(MOBILE_UE);
    TimeSeriesEventPlotter::new(style.y_label("RSRP (dBm)"))
        .pivot(
            &rows,
            &PivotSpec::new(columns::TIME, columns::CELL_ID, columns::RSRP)
                .alpha(0.8)
                .marker(marker_pt),
        )
        .events(handovers.as_ref(), events)
        .build()
}

/// Mobile UE throughput with a shaded window around every handover.
fn handover_impact_panel(inputs: &Inputs, band_label: Option<&str>, style: PanelStyle) -> Panel {
    let Some(rows) = rows_of(&inputs.throughput, columns::UE_ID, MOBILE_UE) else {
        return Panel::Blank;
    };
    let handovers = inputs.handovers_of(MOBILE_UE);
    let mut band = EventSpec::band(columns::TIME, HO_IMPACT_HALF_WIDTH_S, RED);
    if let Some(label) = band_label {
        band = band.label(label);
    }
    TimeSeriesEventPlotter::new(style.x_label("Time (s)").y_label("Mbps"))
        .series(
            &rows,
            &SeriesSpec::new(columns::TIME, columns::THROUGHPUT, "Throughput", TAB_GREEN),
        )
        .events(handovers.as_ref(), &band)
        .build()
}

/// MEC task latency of the mobile UE, seconds shown as milliseconds.
fn mec_latency_panel(inputs: &Inputs, marker_pt: f64, style: PanelStyle) -> Panel {
    let Some(rows) = rows_of(&inputs.mec_offload, columns::UE_ID, MOBILE_UE) else {
        return Panel::Blank;
    };
    TimeSeriesEventPlotter::new(style.x_label("Time (s)").y_label("Latency (ms)"))
        .series(
            &rows,
            &SeriesSpec::new(columns::TIME, columns::LATENCY, "Latency", TAB_BLUE)
                .scale(1000.0)
                .marker(marker_pt),
        )
        .build()
}

/// SINR of the mobile UE below the artifact ceiling, with handover lines.
fn sinr_panel(inputs: &Inputs, label: &str, events: &EventSpec, style: PanelStyle) -> Panel {
    let Some(rows) = rows_of(&inputs.sinr, columns::IMSI, MOBILE_UE) else {
        return Panel::Blank;
    };
    let handovers = inputs.handovers_of(MOBILE_UE);
    TimeSeriesEventPlotter::new(
        style
            .x_label("Time (s)")
            .y_label("SINR (dB)")
            .y_bounds(-10.0, SINR_CEILING_DB),
    )
    .series(
        &rows,
        &SeriesSpec::new(columns::TIME, columns::SINR, label, PURPLE)
            .alpha(0.8)
            .below(SINR_CEILING_DB),
    )
    .events(handovers.as_ref(), events)
    .build()
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Eight panels: static throughputs, comparison, jitter, then RSRP,
/// handover impact, MEC latency and SINR of the mobile UE.
pub fn combined_report(inputs: &Inputs, roles: &FlowRoleMap) -> Figure {
    let mut fig = Figure::new(2, 4);

    fig.place(
        GridCell::at(0, 0),
        static_throughput_panel(
            inputs,
            STATIC_UES[0],
            TAB_BLUE,
            PanelStyle::titled("(A) UE 1: Throughput").legend(small_legend()),
        ),
    );
    fig.place(
        GridCell::at(0, 1),
        static_throughput_panel(
            inputs,
            STATIC_UES[1],
            TAB_ORANGE,
            PanelStyle::titled("(B) UE 3: Throughput").legend(small_legend()),
        ),
    );
    fig.place(
        GridCell::at(0, 2),
        throughput_comparison_panel(
            inputs,
            ["UE 1", "UE 3", "UE 2 (Mobile)"],
            PanelStyle::titled("(C) Throughput comparison between 3 UEs").legend(small_legend()),
        ),
    );
    fig.place(
        GridCell::at(0, 3),
        JitterBarAggregator::new(roles.clone())
            .label_style(LabelStyle::Short)
            .build(
                inputs.flow_stats.table(),
                PanelStyle::titled("(D) Jitter Comparison")
                    .y_label("Jitter (ms)")
                    .no_legend(),
            ),
    );

    fig.place(
        GridCell::at(1, 0),
        rsrp_panel(
            inputs,
            &EventSpec::vertical_line(columns::TIME, RED).alpha(0.8),
            2.0,
            PanelStyle::titled("(E) RSRP & Handover (UE 2)")
                .x_label("Time (s)")
                .legend(
                    LegendStyle::at(LegendPosition::LowerRight)
                        .with_title("Cell")
                        .font_scale(0.7),
                ),
        ),
    );
    fig.place(
        GridCell::at(1, 1),
        handover_impact_panel(
            inputs,
            None,
            PanelStyle::titled("(F) Throughput Stability (UE 2)").legend(small_legend()),
        ),
    );
    fig.place(
        GridCell::at(1, 2),
        mec_latency_panel(
            inputs,
            4.0,
            PanelStyle::titled("(G) MEC Service Latency (UE 2)").legend(small_legend()),
        ),
    );
    fig.place(
        GridCell::at(1, 3),
        sinr_panel(
            inputs,
            "SINR",
            &EventSpec::vertical_line(columns::TIME, RED),
            PanelStyle::titled("(H) SINR with Nakagami Fading (UE 2)")
                .legend(LegendStyle::at(LegendPosition::LowerRight).font_scale(0.8)),
        ),
    );

    fig
}

/// Static UEs one by one, all three together, and per-flow jitter.
pub fn compare_delay_report(inputs: &Inputs, roles: &FlowRoleMap) -> Figure {
    let mut fig = Figure::new(2, 2);

    fig.place(
        GridCell::at(0, 0),
        static_throughput_panel(
            inputs,
            STATIC_UES[0],
            TAB_BLUE,
            PanelStyle::titled("(A) UE 1 (Static User): Throughput Stability"),
        ),
    );
    fig.place(
        GridCell::at(0, 1),
        static_throughput_panel(
            inputs,
            STATIC_UES[1],
            TAB_ORANGE,
            PanelStyle::titled("(B) UE 3 (Static User): Throughput Stability"),
        ),
    );
    fig.place(
        GridCell::at(1, 0),
        throughput_comparison_panel(
            inputs,
            ["UE 1 (Static)", "UE 3 (Static)", "UE 2 (Mobile - Handover)"],
            PanelStyle::titled("(C) Comparison: Mobile vs. Static Users"),
        ),
    );
    fig.place(
        GridCell::at(1, 1),
        JitterBarAggregator::new(roles.clone())
            .value_format(ValueFormat::with_suffix("ms"))
            .build(
                inputs.flow_stats.table(),
                PanelStyle::titled("(D) Jitter Comparison (Lower is Better)")
                    .y_label("Jitter (ms)")
                    .no_legend(),
            ),
    );

    fig
}

/// RSRP with annotated handovers across the top, throughput impact and MEC
/// latency below.
pub fn handover_report(inputs: &Inputs) -> Figure {
    let mut fig = Figure::new(2, 2);

    fig.place(
        GridCell::at(0, 0).spanning(1, 2),
        rsrp_panel(
            inputs,
            &EventSpec::vertical_line(columns::TIME, RED)
                .alpha(0.8)
                .width(1.5)
                .annotate("HO Event", AnnotationPlacement::AxesFraction(0.95))
                .annotation_offset(-2.0, true),
            3.0,
            PanelStyle::titled("Signal Strength (RSRP) & Handover Points (UE 2)")
                .title_scale(1.12)
                .legend(LegendStyle::at(LegendPosition::LowerRight).with_title("Cell ID")),
        ),
    );
    fig.place(
        GridCell::at(1, 0),
        handover_impact_panel(
            inputs,
            Some("HO Impact"),
            PanelStyle::titled("Throughput Stability"),
        ),
    );
    fig.place(
        GridCell::at(1, 1),
        mec_latency_panel(inputs, 5.0, PanelStyle::titled("MEC Service Latency")),
    );

    fig
}

/// SINR of the mobile UE with labelled handover lines.
pub fn sinr_report(inputs: &Inputs) -> Figure {
    let mut fig = Figure::new(1, 1);
    fig.place(
        GridCell::at(0, 0),
        sinr_panel(
            inputs,
            "SINR (Signal Quality)",
            &EventSpec::vertical_line(columns::TIME, RED)
                .width(1.5)
                .annotate("HO Event", AnnotationPlacement::Data(52.0)),
            PanelStyle::titled("SINR Variation with Nakagami Fading (UE 2)")
                .title_scale(1.4)
                .legend(LegendStyle::at(LegendPosition::LowerRight)),
        ),
    );
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{normalize_schema, read_csv};
    use crate::figure::MarkerShape;

    fn table(text: &str) -> TabularDataset {
        let mut ds = read_csv(text.as_bytes()).unwrap();
        normalize_schema(&mut ds);
        ds
    }

    fn throughput() -> TabularDataset {
        table(
            "Time,UE_ID,Throughput_Mbps\n\
             1,1,3.1\n1,2,2.9\n1,3,3.0\n\
             2,1,3.2\n2,2,0.4\n2,3,3.0\n\
             3,1,3.0\n3,2,2.8\n3,3,2.9\n",
        )
    }

    fn handovers() -> TabularDataset {
        table("Time,IMSI,Source,Target\n2.0,2,1,2\n2.5,1,1,2\n8.0,2,2,3\n")
    }

    #[test]
    fn combined_report_places_eight_panels() {
        let inputs = Inputs::default()
            .with(Input::Throughput, throughput())
            .with(Input::HandoverQuality, handovers());
        let fig = combined_report(&inputs, &FlowRoleMap::default());
        assert_eq!((fig.rows, fig.cols), (2, 4));
        assert_eq!(fig.slots.len(), 8);

        let a = fig.panel_at(0, 0).and_then(Panel::as_lines).unwrap();
        assert_eq!(a.style.title, "(A) UE 1: Throughput");
        assert_eq!(a.style.y_bounds, Some((0.0, 5.0)));
        assert_eq!(a.rules[0].y, EXPECTED_THROUGHPUT_MBPS);

        let c = fig.panel_at(0, 2).and_then(Panel::as_lines).unwrap();
        let labels: Vec<&str> = c.traces.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["UE 1", "UE 3", "UE 2 (Mobile)"]);
        assert_eq!(c.traces[2].width, Some(2.5));
        assert_eq!(c.traces[0].width, None);

        let f = fig.panel_at(1, 1).and_then(Panel::as_lines).unwrap();
        let bands: Vec<_> = f.markers.iter().map(|m| m.shape).collect();
        assert_eq!(
            bands,
            [
                MarkerShape::Band { start: 0.0, end: 4.0 },
                MarkerShape::Band { start: 6.0, end: 10.0 },
            ]
        );

        // No flow, RSRP, MEC or SINR data was given.
        assert!(fig.panel_at(0, 3).unwrap().is_blank());
        assert!(fig.panel_at(1, 0).unwrap().is_blank());
        assert!(fig.panel_at(1, 2).unwrap().is_blank());
        assert!(fig.panel_at(1, 3).unwrap().is_blank());
    }

    #[test]
    fn compare_report_uses_full_flow_labels() {
        let inputs = Inputs::default()
            .with(Input::Throughput, throughput())
            .with(
                Input::FlowStats,
                table("FlowID,TxPkts,Jitter(ms)\n7,900,1.5\n1,900,0.2\n"),
            );
        let fig = compare_delay_report(&inputs, &FlowRoleMap::default());
        let jitter = fig.panel_at(1, 1).and_then(Panel::as_bars).unwrap();
        assert_eq!(jitter.bars[1].label, "UE 2 (Mobile)\nFlow 7");
        assert_eq!(jitter.value_format.format(1.5), "1.50ms");

        let c = fig.panel_at(1, 0).and_then(Panel::as_lines).unwrap();
        assert_eq!(c.traces[2].label, "UE 2 (Mobile - Handover)");
    }

    #[test]
    fn handover_report_spans_the_top_row() {
        let inputs = Inputs::default()
            .with(
                Input::Rsrp,
                table("Time,IMSI,CellId,RSRP\n1,2,1,-80\n1,2,2,-90\n2,2,1,-85\n2,2,2,-84\n"),
            )
            .with(Input::HandoverQuality, handovers());
        let fig = handover_report(&inputs);
        let top = fig.panel_at(0, 1).and_then(Panel::as_lines).unwrap();
        assert_eq!(top.traces.len(), 2);
        assert_eq!(top.style.legend.as_ref().unwrap().title.as_deref(), Some("Cell ID"));
        let times: Vec<f64> = top.markers.iter().map(|m| m.time).collect();
        assert_eq!(times, [2.0, 8.0]);
        let note = top.markers[0].annotation.as_ref().unwrap();
        assert_eq!(note.text, "HO Event");
        assert_eq!(note.time_offset, -2.0);
        assert!(note.vertical);
    }

    #[test]
    fn sinr_report_drops_artifacts() {
        let inputs = Inputs::default().with(
            Input::Sinr,
            table("Time,IMSI,SINR\n1,2,20.5\n2,2,75.0\n3,2,-3.0\n4,1,10.0\n"),
        );
        let fig = sinr_report(&inputs);
        let panel = fig.panel_at(0, 0).and_then(Panel::as_lines).unwrap();
        let values: Vec<f64> = panel.traces[0].points.iter().map(|p| p.value).collect();
        assert_eq!(values, [20.5, -3.0]);
        assert!(panel.markers.is_empty());
    }

    #[test]
    fn missing_inputs_blank_every_panel() {
        let inputs = Inputs::default();
        for kind in [
            ReportKind::Combined,
            ReportKind::CompareDelay,
            ReportKind::Handover,
            ReportKind::Sinr,
        ] {
            let fig = kind.build(&inputs, &FlowRoleMap::default());
            assert_eq!(fig.populated().count(), 0, "{kind:?}");
        }
    }

    #[test]
    fn report_sizes_follow_their_layout() {
        let base = RenderConfig::default();
        assert_eq!(ReportKind::Sinr.render_config(&base).pixel_size(), (3600, 1800));
        assert_eq!(
            ReportKind::CompareDelay.render_config(&base).font_size,
            11.0
        );
        assert_eq!(ReportKind::Handover.render_config(&base).line_width, 2.5);
    }
}
