//! Event-annotated time-series panels.
//!
//! [`TimeSeriesEventPlotter`] turns subject-filtered tables into a
//! [`LinePanel`]: one connected line per series, plus a vertical line or a
//! shaded band at every event time of the same subject. A panel whose
//! series are all empty comes out as [`Panel::Blank`], events included.

use log::debug;
use plotters::style::RGBColor;

use crate::color::ColorMap;
use crate::data::filter::{filter_below, numeric_column, pivot_mean, project_series};
use crate::data::model::{SeriesPoint, TabularDataset};
use crate::figure::{
    Annotation, AnnotationPlacement, EventMarker, HorizontalRule, LinePanel, MarkerShape, Panel,
    PanelStyle, Trace,
};

/// Which columns to plot and how the line looks.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub time_column: String,
    pub value_column: String,
    pub label: String,
    pub color: RGBColor,
    pub alpha: f64,
    /// Stroke width in points; `None` uses the figure default.
    pub width: Option<f64>,
    pub marker: Option<f64>,
    /// Multiplier applied to every value (e.g. 1000 for s → ms).
    pub scale: f64,
    /// Drop rows whose raw value is not strictly below this bound.
    pub below: Option<f64>,
}

impl SeriesSpec {
    pub fn new(time_column: &str, value_column: &str, label: &str, color: RGBColor) -> Self {
        Self {
            time_column: time_column.into(),
            value_column: value_column.into(),
            label: label.into(),
            color,
            alpha: 1.0,
            width: None,
            marker: None,
            scale: 1.0,
            below: None,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn width(mut self, pt: f64) -> Self {
        self.width = Some(pt);
        self
    }

    pub fn marker(mut self, radius_pt: f64) -> Self {
        self.marker = Some(radius_pt);
        self
    }

    pub fn scale(mut self, factor: f64) -> Self {
        self.scale = factor;
        self
    }

    pub fn below(mut self, limit: f64) -> Self {
        self.below = Some(limit);
        self
    }
}

/// One line per distinct value of `column_key` (e.g. RSRP per cell).
#[derive(Debug, Clone)]
pub struct PivotSpec {
    pub index: String,
    pub column_key: String,
    pub values: String,
    pub alpha: f64,
    pub marker: Option<f64>,
}

impl PivotSpec {
    pub fn new(index: &str, column_key: &str, values: &str) -> Self {
        Self {
            index: index.into(),
            column_key: column_key.into(),
            values: values.into(),
            alpha: 1.0,
            marker: None,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn marker(mut self, radius_pt: f64) -> Self {
        self.marker = Some(radius_pt);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerStyle {
    VerticalLine { dashed: bool },
    /// Shaded `[t - half_width, t + half_width]` impact window.
    Band { half_width: f64 },
}

/// How event timestamps are turned into markers.
#[derive(Debug, Clone)]
pub struct EventSpec {
    pub time_column: String,
    pub style: MarkerStyle,
    pub color: RGBColor,
    pub alpha: f64,
    pub width: f64,
    pub label: Option<String>,
    pub annotation: Option<Annotation>,
}

impl EventSpec {
    pub fn vertical_line(time_column: &str, color: RGBColor) -> Self {
        Self {
            time_column: time_column.into(),
            style: MarkerStyle::VerticalLine { dashed: true },
            color,
            alpha: 1.0,
            width: 1.2,
            label: None,
            annotation: None,
        }
    }

    pub fn band(time_column: &str, half_width: f64, color: RGBColor) -> Self {
        Self {
            time_column: time_column.into(),
            style: MarkerStyle::Band { half_width },
            color,
            alpha: 0.15,
            width: 0.0,
            label: None,
            annotation: None,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn width(mut self, pt: f64) -> Self {
        self.width = pt;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn annotate(mut self, text: &str, placement: AnnotationPlacement) -> Self {
        self.annotation = Some(Annotation {
            text: text.into(),
            placement,
            time_offset: 0.0,
            vertical: false,
        });
        self
    }

    /// Shift the annotation along the time axis and optionally rotate it.
    pub fn annotation_offset(mut self, seconds: f64, vertical: bool) -> Self {
        if let Some(a) = self.annotation.as_mut() {
            a.time_offset = seconds;
            a.vertical = vertical;
        }
        self
    }

    fn marker_at(&self, time: f64) -> EventMarker {
        let (shape, dashed) = match self.style {
            MarkerStyle::VerticalLine { dashed } => (MarkerShape::Line, dashed),
            MarkerStyle::Band { half_width } => (
                MarkerShape::Band {
                    start: time - half_width,
                    end: time + half_width,
                },
                false,
            ),
        };
        EventMarker {
            time,
            shape,
            color: self.color,
            alpha: self.alpha,
            width: self.width,
            dashed,
            label: self.label.clone(),
            annotation: self.annotation.clone(),
        }
    }
}

/// Builds one line panel from subject-filtered tables.
#[derive(Debug, Clone)]
pub struct TimeSeriesEventPlotter {
    style: PanelStyle,
    traces: Vec<Trace>,
    markers: Vec<EventMarker>,
    rules: Vec<HorizontalRule>,
}

impl TimeSeriesEventPlotter {
    pub fn new(style: PanelStyle) -> Self {
        Self {
            style,
            traces: Vec::new(),
            markers: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Add `value` vs `time` from rows already filtered to one subject.
    /// Empty input adds nothing.
    pub fn series(mut self, rows: &TabularDataset, spec: &SeriesSpec) -> Self {
        let rows = match spec.below {
            Some(limit) => filter_below(rows, &spec.value_column, limit),
            None => rows.clone(),
        };
        let points: Vec<SeriesPoint> = project_series(&rows, &spec.time_column, &spec.value_column)
            .into_iter()
            .map(|p| SeriesPoint::new(p.time, p.value * spec.scale))
            .collect();
        if points.is_empty() {
            debug!("'{}': no points for '{}'", self.style.title, spec.label);
            return self;
        }
        self.traces.push(Trace {
            label: spec.label.clone(),
            color: spec.color,
            alpha: spec.alpha,
            width: spec.width,
            marker: spec.marker,
            points,
        });
        self
    }

    /// Add one trace per pivot key, coloured from an evenly spaced palette.
    pub fn pivot(mut self, rows: &TabularDataset, spec: &PivotSpec) -> Self {
        let colors = ColorMap::new(&spec.column_key, &rows.unique_values(&spec.column_key));
        for series in pivot_mean(rows, &spec.index, &spec.column_key, &spec.values) {
            if series.points.is_empty() {
                continue;
            }
            self.traces.push(Trace {
                label: series.key.to_string(),
                color: colors.color_for(&series.key),
                alpha: spec.alpha,
                width: None,
                marker: spec.marker,
                points: series.points,
            });
        }
        self
    }

    /// Add a marker at every event time. `None` (missing event table) adds
    /// nothing.
    pub fn events(mut self, rows: Option<&TabularDataset>, spec: &EventSpec) -> Self {
        if let Some(rows) = rows {
            self.markers.extend(
                numeric_column(rows, &spec.time_column)
                    .into_iter()
                    .map(|t| spec.marker_at(t)),
            );
        }
        self
    }

    /// Add a horizontal reference line.
    pub fn threshold(mut self, y: f64, color: RGBColor, alpha: f64, label: Option<&str>) -> Self {
        self.rules.push(HorizontalRule {
            y,
            color,
            alpha,
            label: label.map(str::to_string),
        });
        self
    }

    /// Finish the panel. Without any non-empty series nothing is drawn.
    pub fn build(self) -> Panel {
        if self.traces.is_empty() {
            debug!("'{}': no data, leaving panel blank", self.style.title);
            return Panel::Blank;
        }
        Panel::Lines(LinePanel {
            style: self.style,
            traces: self.traces,
            markers: self.markers,
            rules: self.rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_by_subject;
    use crate::data::loader::read_csv;

    const RED: RGBColor = RGBColor(255, 0, 0);
    const GREEN: RGBColor = RGBColor(44, 160, 44);

    fn table(text: &str) -> TabularDataset {
        read_csv(text.as_bytes()).unwrap()
    }

    #[test]
    fn empty_subject_renders_nothing() {
        let thpt = table("Time,UE_ID,Throughput_Mbps\n0.1,1,3.0\n");
        let ho = table("Time,IMSI\n5.0,9\n");
        let panel = TimeSeriesEventPlotter::new(PanelStyle::titled("UE 9"))
            .series(
                &filter_by_subject(&thpt, "UE_ID", 9),
                &SeriesSpec::new("Time", "Throughput_Mbps", "Throughput", GREEN),
            )
            .events(
                Some(&filter_by_subject(&ho, "IMSI", 9)),
                &EventSpec::vertical_line("Time", RED),
            )
            .build();
        assert!(panel.is_blank());
    }

    #[test]
    fn markers_sit_at_event_times() {
        let thpt = table("Time,UE_ID,Throughput_Mbps\n1,2,2.5\n2,2,2.4\n3,2,0.9\n");
        let ho = table("Time,IMSI,Source,Target\n12.5,2,1,2\n30,1,2,3\n41.25,2,2,3\n");
        let panel = TimeSeriesEventPlotter::new(PanelStyle::titled("UE 2"))
            .series(
                &filter_by_subject(&thpt, "UE_ID", 2),
                &SeriesSpec::new("Time", "Throughput_Mbps", "Throughput", GREEN),
            )
            .events(
                Some(&filter_by_subject(&ho, "IMSI", 2)),
                &EventSpec::vertical_line("Time", RED),
            )
            .build();
        let lines = panel.as_lines().unwrap();
        let times: Vec<f64> = lines.markers.iter().map(|m| m.time).collect();
        assert_eq!(times, [12.5, 41.25]);
        assert!(lines.markers.iter().all(|m| m.shape == MarkerShape::Line));
    }

    #[test]
    fn band_spans_half_width_each_side() {
        let thpt = table("Time,UE_ID,Throughput_Mbps\n1,2,2.5\n");
        let ho = table("Time,IMSI\n10,2\n");
        let panel = TimeSeriesEventPlotter::new(PanelStyle::titled("impact"))
            .series(
                &thpt,
                &SeriesSpec::new("Time", "Throughput_Mbps", "Throughput", GREEN),
            )
            .events(Some(&ho), &EventSpec::band("Time", 2.0, RED))
            .build();
        let marker = &panel.as_lines().unwrap().markers[0];
        assert_eq!(marker.time, 10.0);
        assert_eq!(
            marker.shape,
            MarkerShape::Band {
                start: 8.0,
                end: 12.0
            }
        );
    }

    #[test]
    fn missing_events_still_draw_series() {
        let thpt = table("Time,UE_ID,Throughput_Mbps\n1,2,2.5\n2,2,2.0\n");
        let panel = TimeSeriesEventPlotter::new(PanelStyle::titled("no events"))
            .series(
                &thpt,
                &SeriesSpec::new("Time", "Throughput_Mbps", "Throughput", GREEN),
            )
            .events(None, &EventSpec::vertical_line("Time", RED))
            .build();
        let lines = panel.as_lines().unwrap();
        assert_eq!(lines.traces[0].points.len(), 2);
        assert!(lines.markers.is_empty());
    }

    #[test]
    fn scale_and_upper_cut_apply_to_values() {
        let mec = table("Time,UE_ID,Latency\n1,2,0.012\n2,2,0.020\n");
        let panel = TimeSeriesEventPlotter::new(PanelStyle::titled("MEC"))
            .series(&mec, &SeriesSpec::new("Time", "Latency", "Latency", GREEN).scale(1000.0))
            .build();
        let pts = &panel.as_lines().unwrap().traces[0].points;
        assert!((pts[0].value - 12.0).abs() < 1e-9);
        assert!((pts[1].value - 20.0).abs() < 1e-9);

        let sinr = table("Time,IMSI,SINR\n1,2,15\n2,2,80\n3,2,-4\n");
        let panel = TimeSeriesEventPlotter::new(PanelStyle::titled("SINR"))
            .series(&sinr, &SeriesSpec::new("Time", "SINR", "SINR", GREEN).below(60.0))
            .build();
        let times: Vec<f64> = panel.as_lines().unwrap().traces[0]
            .points
            .iter()
            .map(|p| p.time)
            .collect();
        assert_eq!(times, [1.0, 3.0]);
    }

    #[test]
    fn pivot_gives_one_trace_per_cell() {
        let rsrp = table("Time,IMSI,CellId,RSRP\n0.2,2,1,-80\n0.2,2,2,-90\n0.4,2,1,-81\n");
        let panel = TimeSeriesEventPlotter::new(PanelStyle::titled("RSRP"))
            .pivot(&rsrp, &PivotSpec::new("Time", "CellId", "RSRP"))
            .build();
        let traces = &panel.as_lines().unwrap().traces;
        let labels: Vec<&str> = traces.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["1", "2"]);
        assert_ne!(traces[0].color, traces[1].color);
    }
}
