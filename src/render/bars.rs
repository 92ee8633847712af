use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use super::{Area, Theme};
use crate::figure::BarPanel;

// ---------------------------------------------------------------------------
// Bar panel: one bar per category with its value written on top
// ---------------------------------------------------------------------------

/// Half the bar width in category units.
const HALF_BAR: f64 = 0.4;

pub(crate) fn draw_bar_panel(area: &Area, panel: &BarPanel, theme: &Theme) -> Result<()> {
    if panel.bars.is_empty() {
        return Ok(());
    }
    let style = &panel.style;
    let n = panel.bars.len() as f64;
    let lines_per_label = panel
        .bars
        .iter()
        .map(|b| b.label.lines().count())
        .max()
        .unwrap_or(1) as f64;
    let label_px = theme.font_px(0.9);

    let mut chart = ChartBuilder::on(area)
        .caption(
            &style.title,
            theme.font(style.title_scale).color(&style.title_color),
        )
        .margin(theme.px(4.0) as i32)
        .x_label_area_size((label_px * (lines_per_label * 1.3 + 0.5)) as i32)
        .y_label_area_size(theme.px(40.0) as i32)
        .build_cartesian_2d(-0.5..n - 0.5, 0.0..panel.y_max)?;

    let label_font = theme.font(0.9);
    let no_tick_labels = |_: &f64| String::new();
    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .x_label_formatter(&no_tick_labels)
        .label_style(label_font.clone())
        .axis_desc_style(label_font.clone())
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(WHITE.mix(0.0))
        .y_labels(6);
    if let Some(label) = &style.y_label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw()?;

    let outline = BLACK.stroke_width(theme.px(0.8));
    for (i, bar) in panel.bars.iter().enumerate() {
        let x = i as f64;
        let corners = [(x - HALF_BAR, 0.0), (x + HALF_BAR, bar.value)];
        chart.draw_series([
            Rectangle::new(corners, bar.color.mix(0.9).filled()),
            Rectangle::new(corners, outline),
        ])?;
    }

    let value_style = theme
        .font(0.8)
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    let lift = panel.y_max * 0.01;
    chart.draw_series(panel.bars.iter().enumerate().map(|(i, bar)| {
        Text::new(
            panel.value_format.format(bar.value),
            (i as f64, bar.value + lift),
            value_style.clone(),
        )
    }))?;

    // Category labels may span several lines, which axis tick labels cannot
    // show, so they are placed under the axis by hand.
    let (base_x, base_y) = area.get_base_pixel();
    let label_style = label_font
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, bar) in panel.bars.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(i as f64, 0.0));
        for (k, line) in bar.label.lines().enumerate() {
            let dy = (label_px * (0.4 + 1.3 * k as f64)) as i32;
            area.draw(&Text::new(
                line.to_string(),
                (px - base_x, py - base_y + dy),
                label_style.clone(),
            ))?;
        }
    }

    Ok(())
}
