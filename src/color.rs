use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential palettes for ranked bars
// ---------------------------------------------------------------------------

/// Hue sweeps approximating the usual plotting colour maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Purple → green → yellow.
    Viridis,
    /// Black-purple → orange.
    Magma,
}

impl Scheme {
    /// (start hue, end hue, lightness start, lightness end)
    fn sweep(self) -> (f32, f32, f32, f32) {
        match self {
            Scheme::Viridis => (275.0, 60.0, 0.35, 0.6),
            Scheme::Magma => (290.0, 25.0, 0.25, 0.6),
        }
    }
}

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// `n` colours interpolated along `scheme`, first bar first.
pub fn sequential_palette(scheme: Scheme, n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let (h0, h1, l0, l1) = scheme.sweep();
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let hue = h0 + (h1 - h0) * t;
            let light = l0 + (l1 - l0) * t;
            hsl_to_color32(Hsl::new(hue, 0.7, light))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging colour for polarities
// ---------------------------------------------------------------------------

/// Blue for positive, red for negative, grey at 0; saturation grows with
/// the magnitude of `polarity` (clamped to `[-1, 1]`).
pub fn diverging_color(polarity: f64) -> Color32 {
    let p = polarity.clamp(-1.0, 1.0) as f32;
    let hue = if p >= 0.0 { 220.0 } else { 5.0 };
    hsl_to_color32(Hsl::new(hue, 0.1 + 0.7 * p.abs(), 0.55))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_one_colour_per_bar() {
        assert!(sequential_palette(Scheme::Viridis, 0).is_empty());
        assert_eq!(sequential_palette(Scheme::Magma, 7).len(), 7);
    }

    #[test]
    fn diverging_sides_differ() {
        let pos = diverging_color(0.9);
        let neg = diverging_color(-0.9);
        assert!(pos.b() > pos.r());
        assert!(neg.r() > neg.b());
    }
}
