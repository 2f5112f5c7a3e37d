use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: categorical cell value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a chosen categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &std::collections::BTreeSet<Value>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<Value, Color32> = unique_values
            .iter()
            .zip(palette.into_iter())
            .map(|(v, c): (&Value, Color32)| (v.clone(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given cell value.
    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (value label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(v, c): (&Value, &Color32)| (v.to_string(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn palette_colors_are_distinct() {
        let colors = generate_palette(8);
        assert_eq!(colors.len(), 8);
        let unique: std::collections::HashSet<_> =
            colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn unknown_values_fall_back_to_gray() {
        let values: BTreeSet<Value> =
            [Value::Text("a".into()), Value::Text("b".into())].into();
        let cm = ColorMap::new("label", &values);
        assert_ne!(
            cm.color_for(&Value::Text("a".into())),
            cm.color_for(&Value::Text("b".into()))
        );
        assert_eq!(cm.color_for(&Value::Text("zzz".into())), Color32::GRAY);
    }
}
