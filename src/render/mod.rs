/// Rendering layer: turns a [`Figure`] into a PNG.
///
/// ```text
///   Figure ──► render_png ──► BitMapBackend (RGB buffer) ──► image::RgbImage ──► .png
///                 │
///                 ├── lines::draw_line_panel
///                 └── bars::draw_bar_panel
/// ```
///
/// Pixel size is figure inches × DPI; every length in the figure model is in
/// points and goes through [`Theme`].

mod bars;
mod lines;

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::parse_color;
use crate::config::RenderConfig;
use crate::figure::{Figure, Panel};

pub(crate) type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Render the figure and write it as PNG to `path`.
pub fn render_png(figure: &Figure, cfg: &RenderConfig, path: &Path) -> Result<()> {
    let buffer = render_rgb(figure, cfg)?;
    let (w, h) = cfg.pixel_size();
    let img = image::RgbImage::from_raw(w, h, buffer).context("pixel buffer has wrong size")?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Render the figure into a packed RGB buffer of `cfg.pixel_size()`.
pub fn render_rgb(figure: &Figure, cfg: &RenderConfig) -> Result<Vec<u8>> {
    let (w, h) = cfg.pixel_size();
    let mut buffer = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        let theme = Theme::new(cfg);
        root.fill(&theme.background)?;
        draw_figure(&root, figure, &theme)?;
        root.present()?;
    }
    Ok(buffer)
}

fn draw_figure(root: &Area, figure: &Figure, theme: &Theme) -> Result<()> {
    let (w, h) = root.dim_in_pixel();
    let outer = theme.px(12.0) as i32;
    let cell_w = (w as i32 - 2 * outer).max(1) / figure.cols as i32;
    let cell_h = (h as i32 - 2 * outer).max(1) / figure.rows as i32;
    let gap = theme.px(8.0) as i32;

    for slot in &figure.slots {
        let c = slot.cell;
        let x = outer + c.col as i32 * cell_w;
        let y = outer + c.row as i32 * cell_h;
        let area = root
            .clone()
            .shrink(
                (x, y),
                (
                    (cell_w * c.col_span as i32).max(1),
                    (cell_h * c.row_span as i32).max(1),
                ),
            )
            .margin(gap, gap, gap, gap);

        match &slot.panel {
            Panel::Blank => {}
            Panel::Placeholder(msg) => draw_placeholder(&area, msg, theme)?,
            Panel::Lines(panel) => lines::draw_line_panel(&area, panel, theme)?,
            Panel::Bars(panel) => bars::draw_bar_panel(&area, panel, theme)?,
        }
        debug!("drew panel at row {} col {}", c.row, c.col);
    }
    Ok(())
}

fn draw_placeholder(area: &Area, message: &str, theme: &Theme) -> Result<()> {
    let (width, height) = area.dim_in_pixel();
    let style = theme
        .font(1.0)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        message.to_string(),
        (width as i32 / 2, height as i32 / 2),
        style,
    ))?;
    Ok(())
}

/// Figure-wide style resolved to pixels.
pub(crate) struct Theme<'a> {
    cfg: &'a RenderConfig,
    pub background: RGBColor,
}

impl<'a> Theme<'a> {
    fn new(cfg: &'a RenderConfig) -> Self {
        Self {
            cfg,
            background: parse_color(&cfg.background).unwrap_or(WHITE),
        }
    }

    /// Points to whole pixels, never below one.
    pub fn px(&self, pt: f64) -> u32 {
        self.cfg.pt_to_px(pt).round().max(1.0) as u32
    }

    /// Font at `scale` × the base font size.
    pub fn font(&self, scale: f64) -> FontDesc<'a> {
        let px = self.cfg.pt_to_px(self.cfg.font_size * scale);
        (self.cfg.font_family.as_str(), px).into_font()
    }

    pub fn font_px(&self, scale: f64) -> f64 {
        self.cfg.pt_to_px(self.cfg.font_size * scale)
    }

    pub fn default_line_width(&self) -> f64 {
        self.cfg.line_width
    }
}

/// Pad a data range the way plot libraries auto-scale: 5% each side, or
/// ±0.5 around a single value.
pub(crate) fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span.abs() < 1e-9 {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo - span * 0.05, hi + span * 0.05)
    }
}

/// Split `[from, to]` into dash segments of `dash` length separated by `gap`.
pub(crate) fn dashes(from: f64, to: f64, dash: f64, gap: f64) -> Vec<(f64, f64)> {
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    if dash <= 0.0 || hi - lo <= dash {
        return vec![(lo, hi)];
    }
    let mut out = Vec::new();
    let mut start = lo;
    while start < hi {
        out.push((start, (start + dash).min(hi)));
        start += dash + gap.max(0.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_widens_degenerate_spans() {
        assert_eq!(padded_range(2.0, 2.0), (1.5, 2.5));
        let (lo, hi) = padded_range(0.0, 100.0);
        assert!((lo + 5.0).abs() < 1e-9 && (hi - 105.0).abs() < 1e-9);
    }

    #[test]
    fn dashes_cover_the_span() {
        let d = dashes(0.0, 10.0, 2.0, 1.0);
        assert_eq!(d.first(), Some(&(0.0, 2.0)));
        assert_eq!(d.len(), 4);
        assert!(d.iter().all(|(a, b)| b > a && *b <= 10.0));
        assert_eq!(dashes(5.0, 1.0, 10.0, 1.0), vec![(1.0, 5.0)]);
    }
}
