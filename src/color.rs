use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` colours with evenly spaced hues at full saturation and
/// half lightness. `n == 0` is treated as one colour.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    let n = n.max(1);
    (0..n)
        .map(|i| {
            let hue = (i as f32 * (360.0 / n as f32)) % 360.0;
            let hsl = Hsl::new(hue, 1.0, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: entity → Color32
// ---------------------------------------------------------------------------

/// Assigns each entity the palette colour at its index in the given list.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(entities: &[String]) -> Self {
        let palette = generate_palette(entities.len());
        let mapping = entities.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, entity: &str) -> Color32 {
        self.mapping
            .get(entity)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size_and_first_hue() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_palette_zero_means_one() {
        assert_eq!(generate_palette(0).len(), 1);
    }

    #[test]
    fn test_color_map_unknown_is_gray() {
        let map = ColorMap::new(&["A".to_string(), "B".to_string()]);
        assert_ne!(map.color_for("A"), map.color_for("B"));
        assert_eq!(map.color_for("Z"), Color32::GRAY);
    }
}
