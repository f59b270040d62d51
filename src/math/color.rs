use serde::{Deserialize, Serialize};

/// An RGB color with float channels, 0–255 by convention.
///
/// Channels are not clamped on construction; [`Color::to_rgb8`] clamps when
/// a byte color is needed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Creates a color from its three channels.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Returns the channels rounded and clamped to bytes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb8(self) -> [u8; 3] {
        let byte = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        [byte(self.r), byte(self.g), byte(self.b)]
    }

    /// Returns the channels as an array, in `r, g, b` order.
    #[must_use]
    pub fn channels(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb8_rounds_and_clamps() {
        assert_eq!(Color::new(12.4, 300.0, -3.0).to_rgb8(), [12, 255, 0]);
    }
}
