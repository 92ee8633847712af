use plotters::style::RGBColor;

use crate::data::model::SeriesPoint;

// ---------------------------------------------------------------------------
// Figure – the in-memory scene every panel draws into
// ---------------------------------------------------------------------------

/// A grid of panels, independent of rendering.
#[derive(Debug, Clone)]
pub struct Figure {
    pub rows: usize,
    pub cols: usize,
    pub slots: Vec<PanelSlot>,
}

/// Position of a panel in the grid. Spans let one panel cover a full row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl GridCell {
    pub fn at(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
        }
    }

    pub fn spanning(mut self, rows: usize, cols: usize) -> Self {
        self.row_span = rows.max(1);
        self.col_span = cols.max(1);
        self
    }

    fn contains(&self, row: usize, col: usize) -> bool {
        (self.row..self.row + self.row_span).contains(&row)
            && (self.col..self.col + self.col_span).contains(&col)
    }
}

#[derive(Debug, Clone)]
pub struct PanelSlot {
    pub cell: GridCell,
    pub panel: Panel,
}

impl Figure {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
            slots: Vec::new(),
        }
    }

    /// Put a panel into the grid. A later panel covering the same cell
    /// replaces the earlier one.
    pub fn place(&mut self, cell: GridCell, panel: Panel) {
        self.slots.retain(|s| s.cell != cell);
        self.slots.push(PanelSlot { cell, panel });
    }

    /// The panel covering `(row, col)`, if any.
    pub fn panel_at(&self, row: usize, col: usize) -> Option<&Panel> {
        self.slots
            .iter()
            .find(|s| s.cell.contains(row, col))
            .map(|s| &s.panel)
    }

    /// Panels that will draw something.
    pub fn populated(&self) -> impl Iterator<Item = &Panel> {
        self.slots.iter().map(|s| &s.panel).filter(|p| !p.is_blank())
    }
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Panel {
    /// Nothing to draw: the data it depends on is missing or empty.
    Blank,
    /// Centered message instead of a chart.
    Placeholder(String),
    Lines(LinePanel),
    Bars(BarPanel),
}

impl Panel {
    pub fn is_blank(&self) -> bool {
        matches!(self, Panel::Blank)
    }

    pub fn as_lines(&self) -> Option<&LinePanel> {
        match self {
            Panel::Lines(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_bars(&self) -> Option<&BarPanel> {
        match self {
            Panel::Bars(p) => Some(p),
            _ => None,
        }
    }
}

/// Static labeling and axis options of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStyle {
    pub title: String,
    pub title_color: RGBColor,
    /// Title size relative to the figure's base font.
    pub title_scale: f64,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub y_bounds: Option<(f64, f64)>,
    pub legend: Option<LegendStyle>,
    pub strong_grid: bool,
}

impl PanelStyle {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_color: RGBColor(0, 0, 0),
            title_scale: 1.1,
            x_label: None,
            y_label: None,
            y_bounds: None,
            legend: Some(LegendStyle::default()),
            strong_grid: false,
        }
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn y_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.y_bounds = Some((lo, hi));
        self
    }

    pub fn title_color(mut self, color: RGBColor) -> Self {
        self.title_color = color;
        self
    }

    pub fn title_scale(mut self, scale: f64) -> Self {
        self.title_scale = scale;
        self
    }

    pub fn legend(mut self, legend: LegendStyle) -> Self {
        self.legend = Some(legend);
        self
    }

    pub fn no_legend(mut self) -> Self {
        self.legend = None;
        self
    }

    pub fn strong_grid(mut self) -> Self {
        self.strong_grid = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    UpperRight,
    UpperLeft,
    LowerRight,
    LowerLeft,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendStyle {
    pub position: LegendPosition,
    pub title: Option<String>,
    /// Legend font size relative to the figure's base font.
    pub font_scale: Option<f64>,
}

impl LegendStyle {
    pub fn at(position: LegendPosition) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn font_scale(mut self, scale: f64) -> Self {
        self.font_scale = Some(scale);
        self
    }
}

/// A line chart of one or more traces with event markers.
#[derive(Debug, Clone)]
pub struct LinePanel {
    pub style: PanelStyle,
    pub traces: Vec<Trace>,
    pub markers: Vec<EventMarker>,
    pub rules: Vec<HorizontalRule>,
}

impl LinePanel {
    /// Time range covered by traces and markers.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let trace_times = self.traces.iter().flat_map(|t| t.points.iter().map(|p| p.time));
        let marker_times = self.markers.iter().flat_map(|m| match m.shape {
            MarkerShape::Line => [m.time, m.time],
            MarkerShape::Band { start, end } => [start, end],
        });
        extent(trace_times.chain(marker_times))
    }

    /// Value range covered by traces and reference rules.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        let values = self.traces.iter().flat_map(|t| t.points.iter().map(|p| p.value));
        extent(values.chain(self.rules.iter().map(|r| r.y)))
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// One connected line.
#[derive(Debug, Clone)]
pub struct Trace {
    pub label: String,
    pub color: RGBColor,
    pub alpha: f64,
    /// Stroke width in points; `None` uses the figure's line width.
    pub width: Option<f64>,
    /// Point marker radius in points, if points are marked.
    pub marker: Option<f64>,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerShape {
    /// Vertical line at the event time.
    Line,
    /// Shaded band `[start, end]` around the event time.
    Band { start: f64, end: f64 },
}

/// A marker drawn at one event timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMarker {
    pub time: f64,
    pub shape: MarkerShape,
    pub color: RGBColor,
    pub alpha: f64,
    /// Line width in points, ignored for bands.
    pub width: f64,
    pub dashed: bool,
    pub label: Option<String>,
    pub annotation: Option<Annotation>,
}

/// Text attached to an event marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub placement: AnnotationPlacement,
    /// Shift along the time axis, in seconds.
    pub time_offset: f64,
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnotationPlacement {
    /// At a value on the y axis.
    Data(f64),
    /// At a fraction of the plot height, 0 bottom to 1 top.
    AxesFraction(f64),
}

/// Horizontal reference line (e.g. the expected throughput).
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalRule {
    pub y: f64,
    pub color: RGBColor,
    pub alpha: f64,
    pub label: Option<String>,
}

/// A categorical bar chart with value annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPanel {
    pub style: PanelStyle,
    pub bars: Vec<Bar>,
    pub y_max: f64,
    pub value_format: ValueFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: RGBColor,
}

/// How bar values are written above each bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFormat {
    pub decimals: usize,
    pub suffix: String,
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self {
            decimals: 2,
            suffix: String::new(),
        }
    }
}

impl ValueFormat {
    pub fn with_suffix(suffix: &str) -> Self {
        Self {
            suffix: suffix.into(),
            ..Default::default()
        }
    }

    pub fn format(&self, value: f64) -> String {
        format!("{:.*}{}", self.decimals, value, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanning_panel_covers_its_row() {
        let mut fig = Figure::new(2, 2);
        fig.place(GridCell::at(0, 0).spanning(1, 2), Panel::Placeholder("top".into()));
        fig.place(GridCell::at(1, 1), Panel::Blank);
        assert!(matches!(fig.panel_at(0, 1), Some(Panel::Placeholder(_))));
        assert!(fig.panel_at(1, 0).is_none());
        assert_eq!(fig.populated().count(), 1);
    }

    #[test]
    fn extents_include_bands_and_rules() {
        let panel = LinePanel {
            style: PanelStyle::titled("t"),
            traces: vec![Trace {
                label: "x".into(),
                color: RGBColor(0, 0, 0),
                alpha: 1.0,
                width: None,
                marker: None,
                points: vec![SeriesPoint::new(5.0, 1.0), SeriesPoint::new(10.0, 2.0)],
            }],
            markers: vec![EventMarker {
                time: 11.0,
                shape: MarkerShape::Band {
                    start: 9.0,
                    end: 13.0,
                },
                color: RGBColor(255, 0, 0),
                alpha: 0.15,
                width: 1.0,
                dashed: false,
                label: None,
                annotation: None,
            }],
            rules: vec![HorizontalRule {
                y: 3.0,
                color: RGBColor(255, 0, 0),
                alpha: 0.5,
                label: None,
            }],
        };
        assert_eq!(panel.x_extent(), Some((5.0, 13.0)));
        assert_eq!(panel.y_extent(), Some((1.0, 3.0)));
    }

    #[test]
    fn value_format_appends_suffix() {
        assert_eq!(ValueFormat::default().format(0.4567), "0.46");
        assert_eq!(ValueFormat::with_suffix("ms").format(1.0), "1.00ms");
    }
}
