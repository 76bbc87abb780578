//! Colors for indicators and markers

use linea_core::LineKind;

/// Color in RGB (0.0 - 1.0 range)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray() -> Self {
        Self::new(0.55, 0.55, 0.58)
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Desaturated version for an orphaned strategy
    pub fn muted(&self) -> Color {
        self.lerp(&Color::gray(), 0.7)
    }
}

/// Saturated base color for each line kind
pub fn base_color(kind: LineKind) -> Color {
    match kind {
        LineKind::StopLoss => Color::new(0.90, 0.22, 0.21),
        LineKind::Target => Color::new(0.15, 0.68, 0.38),
        LineKind::Entry => Color::new(0.25, 0.47, 0.85),
        LineKind::TrailingActivation => Color::new(0.85, 0.60, 0.13),
    }
}

/// Distinct accent used while the trailing stop is active
pub fn trailing_accent() -> Color {
    Color::new(0.62, 0.32, 0.87)
}
