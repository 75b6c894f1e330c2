use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
// Series colours: one per charted column
// ---------------------------------------------------------------------------

/// Colours for the chart lines, indexed like the dataset's columns.
#[derive(Debug, Clone, Default)]
pub struct SeriesColors {
    colors: Vec<Color32>,
    /// Drawn thicker and on top so the analysed channel stands out.
    highlight: Option<usize>,
}

impl SeriesColors {
    pub fn new(n_columns: usize, highlight: Option<usize>) -> Self {
        Self {
            colors: generate_palette(n_columns),
            highlight,
        }
    }

    pub fn color_for(&self, column: usize) -> Color32 {
        self.colors.get(column).copied().unwrap_or(Color32::GRAY)
    }

    pub fn is_highlighted(&self, column: usize) -> bool {
        self.highlight == Some(column)
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
    fn out_of_range_column_is_gray() {
        let colors = SeriesColors::new(2, Some(1));
        assert_eq!(colors.color_for(5), Color32::GRAY);
        assert!(colors.is_highlighted(1));
        assert!(!colors.is_highlighted(0));
    }
}
