use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Parse `#rrggbb` hex or a CSS/SVG colour name (`"skyblue"`, `"purple"`).
pub fn parse_color(spec: &str) -> Option<RGBColor> {
    let spec = spec.trim();
    let rgb: Srgb<u8> = if spec.starts_with('#') {
        Srgb::from_str(spec).ok()?
    } else {
        palette::named::from_str(&spec.to_ascii_lowercase())?
    };
    Some(RGBColor(rgb.red, rgb.green, rgb.blue))
}

/// Like [`parse_color`], falling back to black for unknown names.
pub fn color_or_black(spec: &str) -> RGBColor {
    parse_color(spec).unwrap_or_else(|| {
        log::warn!("unknown colour '{spec}', using black");
        RGBColor(0, 0, 0)
    })
}

// ---------------------------------------------------------------------------
// Color mapping: pivot key → RGBColor
// ---------------------------------------------------------------------------

/// Maps distinct values of a pivot column (e.g. cell ids) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<CellValue, RGBColor> = unique_values
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> RGBColor {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(parse_color("#1f77b4"), Some(RGBColor(0x1f, 0x77, 0xb4)));
        assert_eq!(parse_color("red"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_color("SkyBlue"), Some(RGBColor(135, 206, 235)));
        assert_eq!(parse_color("not-a-colour"), None);
    }

    #[test]
    fn unknown_keys_get_default_colour() {
        let keys: BTreeSet<_> = [CellValue::Integer(1), CellValue::Integer(2)].into();
        let map = ColorMap::new("CellId", &keys);
        assert_ne!(
            map.color_for(&CellValue::Integer(1)),
            map.color_for(&CellValue::Integer(2))
        );
        assert_eq!(
            map.color_for(&CellValue::Integer(9)),
            RGBColor(128, 128, 128)
        );
    }
}
