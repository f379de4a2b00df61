use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// `n` visually distinct colours with evenly spaced hues, low frequencies
/// towards red and high frequencies towards violet.
pub fn series_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    // Stop short of a full turn so the last series is not red again.
    let span = if n == 1 { 0.0 } else { 300.0 / (n - 1) as f32 };
    (0..n)
        .map(|i| {
            let hsl = Hsl::new(i as f32 * span, 0.75, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
                (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
                (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
            )
        })
        .collect()
}
