use std::collections::HashSet;

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};

use super::{dashes, padded_range, Area, Theme};
use crate::figure::{AnnotationPlacement, LegendPosition, LinePanel, MarkerShape};

// ---------------------------------------------------------------------------
// Line panel: traces, event markers, reference rules
// ---------------------------------------------------------------------------

/// Dashes per full axis span.
const DASHES_PER_SPAN: f64 = 40.0;

pub(crate) fn draw_line_panel(area: &Area, panel: &LinePanel, theme: &Theme) -> Result<()> {
    let style = &panel.style;
    let Some((x_lo, x_hi)) = panel.x_extent() else {
        return Ok(());
    };
    let (x_lo, x_hi) = padded_range(x_lo, x_hi);
    let (y_lo, y_hi) = match style.y_bounds {
        Some((a, b)) => (a.min(b), a.max(b)),
        None => panel
            .y_extent()
            .map(|(lo, hi)| padded_range(lo, hi))
            .unwrap_or((0.0, 1.0)),
    };

    let label_font = theme.font(0.9);
    let mut chart = ChartBuilder::on(area)
        .caption(
            &style.title,
            theme.font(style.title_scale).color(&style.title_color),
        )
        .margin(theme.px(4.0) as i32)
        .x_label_area_size(theme.px(style.x_label.as_ref().map_or(16.0, |_| 28.0)) as i32)
        .y_label_area_size(theme.px(style.y_label.as_ref().map_or(28.0, |_| 40.0)) as i32)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    let grid_alpha = if style.strong_grid { 0.35 } else { 0.15 };
    let mut mesh = chart.configure_mesh();
    mesh.label_style(label_font.clone())
        .axis_desc_style(label_font.clone())
        .bold_line_style(BLACK.mix(grid_alpha))
        .light_line_style(WHITE.mix(0.0))
        .x_labels(10)
        .y_labels(6);
    if let Some(label) = &style.x_label {
        mesh.x_desc(label.as_str());
    }
    if let Some(label) = &style.y_label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw()?;

    let legend_prefix = style
        .legend
        .as_ref()
        .and_then(|l| l.title.as_deref())
        .map(|t| format!("{t} "))
        .unwrap_or_default();
    let legend_mark = theme.px(14.0) as i32;
    let mut seen_labels: HashSet<String> = HashSet::new();
    let mut labelled = 0usize;

    // Bands go first so lines stay visible on top of them.
    for marker in &panel.markers {
        let MarkerShape::Band { start, end } = marker.shape else {
            continue;
        };
        let fill = marker.color.mix(marker.alpha).filled();
        let anno = chart.draw_series(std::iter::once(Rectangle::new(
            [(start, y_lo), (end, y_hi)],
            fill,
        )))?;
        if let Some(label) = &marker.label {
            if seen_labels.insert(label.clone()) {
                anno.label(label.as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + legend_mark, y + 5)], fill)
                });
                labelled += 1;
            }
        }
    }

    for rule in &panel.rules {
        let stroke = rule.color.mix(rule.alpha).stroke_width(theme.px(1.2));
        let dash = (x_hi - x_lo) / DASHES_PER_SPAN / 3.0;
        let anno = chart.draw_series(
            dashes(x_lo, x_hi, dash, dash)
                .into_iter()
                .map(|(a, b)| PathElement::new(vec![(a, rule.y), (b, rule.y)], stroke)),
        )?;
        if let Some(label) = &rule.label {
            if seen_labels.insert(label.clone()) {
                anno.label(label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + legend_mark, y)], stroke)
                });
                labelled += 1;
            }
        }
    }

    for trace in &panel.traces {
        let color = trace.color.mix(trace.alpha);
        let width = trace.width.unwrap_or_else(|| theme.default_line_width());
        let stroke = color.stroke_width(theme.px(width));
        // Fixed y bounds clip the data instead of spilling over the caption.
        let points = trace
            .points
            .iter()
            .map(|p| (p.time, p.value.clamp(y_lo, y_hi)));
        let mut series = LineSeries::new(points, stroke);
        if let Some(radius) = trace.marker {
            series = series.point_size(theme.px(radius));
        }
        let anno = chart.draw_series(series)?;
        let label = format!("{legend_prefix}{}", trace.label);
        if seen_labels.insert(label.clone()) {
            anno.label(label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + legend_mark, y)], stroke)
            });
            labelled += 1;
        }
    }

    let dash = (y_hi - y_lo) / DASHES_PER_SPAN;
    for marker in &panel.markers {
        if marker.shape != MarkerShape::Line {
            continue;
        }
        let stroke = marker
            .color
            .mix(marker.alpha)
            .stroke_width(theme.px(marker.width));
        let segments = if marker.dashed {
            dashes(y_lo, y_hi, dash, dash * 0.6)
        } else {
            vec![(y_lo, y_hi)]
        };
        let t = marker.time;
        let anno = chart.draw_series(
            segments
                .into_iter()
                .map(|(a, b)| PathElement::new(vec![(t, a), (t, b)], stroke)),
        )?;
        if let Some(label) = &marker.label {
            if seen_labels.insert(label.clone()) {
                anno.label(label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + legend_mark, y)], stroke)
                });
                labelled += 1;
            }
        }
    }

    let (base_x, base_y) = area.get_base_pixel();
    let pad = theme.px(2.0) as i32;
    for marker in &panel.markers {
        let Some(annotation) = &marker.annotation else {
            continue;
        };
        let y = match annotation.placement {
            AnnotationPlacement::Data(v) => v,
            AnnotationPlacement::AxesFraction(f) => y_lo + f * (y_hi - y_lo),
        };
        let (ax, ay) = chart.backend_coord(&(marker.time + annotation.time_offset, y));
        let mut text_style = theme
            .font(1.0)
            .style(FontStyle::Bold)
            .color(&marker.color);
        text_style = if annotation.vertical {
            text_style
                .transform(FontTransform::Rotate270)
                .pos(Pos::new(HPos::Right, VPos::Center))
        } else {
            text_style.pos(Pos::new(HPos::Center, VPos::Bottom))
        };
        let extent = area.estimate_text_size(&annotation.text, &text_style)?;
        let label = annotation_box((ax - base_x, ay - base_y), extent, annotation.vertical, pad);
        area.draw(&Rectangle::new(label.backing, WHITE.mix(0.85).filled()))?;
        area.draw(&Text::new(annotation.text.clone(), label.anchor, text_style))?;
    }

    if let Some(legend) = &style.legend {
        if labelled > 0 {
            let scale = legend.font_scale.unwrap_or(0.8);
            chart
                .configure_series_labels()
                .position(series_label_position(legend.position))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(theme.font(scale))
                .legend_area_size(legend_mark + theme.px(4.0) as i32)
                .draw()?;
        }
    }

    Ok(())
}

/// Where an event annotation and its backing box go, in panel pixels.
#[derive(Debug, PartialEq)]
struct AnnotationBox {
    anchor: (i32, i32),
    backing: [(i32, i32); 2],
}

/// Horizontal text sits `pad` above the point; vertical text hangs down
/// from it. `extent` is the unrotated text size.
fn annotation_box(
    point: (i32, i32),
    extent: (u32, u32),
    vertical: bool,
    pad: i32,
) -> AnnotationBox {
    let (x, y) = point;
    let (w, h) = (extent.0 as i32, extent.1 as i32);
    if vertical {
        AnnotationBox {
            anchor: (x, y),
            backing: [(x - h / 2 - pad, y - pad), (x + h / 2 + pad, y + w + pad)],
        }
    } else {
        let anchor = (x, y - pad);
        AnnotationBox {
            anchor,
            backing: [
                (x - w / 2 - pad, anchor.1 - h - pad),
                (x + w / 2 + pad, anchor.1 + pad),
            ],
        }
    }
}

fn series_label_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_annotation_clears_the_marker_point() {
        let b = annotation_box((100, 50), (40, 10), false, 2);
        assert_eq!(b.anchor, (100, 48));
        assert_eq!(b.backing, [(78, 36), (122, 50)]);
        // The text baseline sits above the point the marker line passes through.
        assert!(b.anchor.1 < 50);
    }

    #[test]
    fn vertical_annotation_hangs_below_its_point() {
        let b = annotation_box((100, 20), (40, 10), true, 2);
        assert_eq!(b.anchor, (100, 20));
        assert_eq!(b.backing, [(93, 18), (107, 62)]);
    }
}
