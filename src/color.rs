use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Number of entries in a color lookup table
pub const LUT_SIZE: usize = 256;

/// Precomputed intensity -> color table
pub type ColorLut = [Color; LUT_SIZE];

/// Palette the field is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Teal accent (100, 255, 218)
    #[default]
    Aqua,
    Amber,
    Violet,
    Mono,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Aqua => "Aqua",
            ColorScheme::Amber => "Amber",
            ColorScheme::Violet => "Violet",
            ColorScheme::Mono => "Mono",
        }
    }

    pub fn next(&self) -> ColorScheme {
        match self {
            ColorScheme::Aqua => ColorScheme::Amber,
            ColorScheme::Amber => ColorScheme::Violet,
            ColorScheme::Violet => ColorScheme::Mono,
            ColorScheme::Mono => ColorScheme::Aqua,
        }
    }

    pub fn prev(&self) -> ColorScheme {
        match self {
            ColorScheme::Aqua => ColorScheme::Mono,
            ColorScheme::Amber => ColorScheme::Aqua,
            ColorScheme::Violet => ColorScheme::Amber,
            ColorScheme::Mono => ColorScheme::Violet,
        }
    }

    /// Full-intensity accent color
    fn accent(&self) -> (u8, u8, u8) {
        match self {
            ColorScheme::Aqua => (100, 255, 218),
            ColorScheme::Amber => (255, 191, 71),
            ColorScheme::Violet => (190, 140, 255),
            ColorScheme::Mono => (235, 235, 235),
        }
    }

    /// Build a LUT fading from a dim shade of the accent up to the accent
    pub fn build_lut(&self) -> ColorLut {
        let (r, g, b) = self.accent();
        let mut lut = [Color::Reset; LUT_SIZE];
        for (i, entry) in lut.iter_mut().enumerate() {
            let t = i as f32 / (LUT_SIZE - 1) as f32;
            // Faint links stay visible against a dark terminal
            let level = 0.2 + 0.8 * t;
            *entry = Color::Rgb(
                (r as f32 * level) as u8,
                (g as f32 * level) as u8,
                (b as f32 * level) as u8,
            );
        }
        lut
    }
}

/// Look up the color for an intensity in [0, 1]
pub fn map_from_lut(lut: &ColorLut, t: f32) -> Color {
    let idx = (t.clamp(0.0, 1.0) * (LUT_SIZE - 1) as f32).round() as usize;
    lut[idx]
}
