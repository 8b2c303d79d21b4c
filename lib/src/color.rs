use serde::{Deserialize, Serialize};

/// An 8-bit RGB triple as sent to the gondola LED.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Perceptual brightness in [0, 1] using the Rec. 601 luma weights.
    pub fn luma(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }

    pub fn inverted(&self) -> Self {
        Rgb::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Scale all channels by a factor, clamped to the valid range.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |c: u8| (c as f64 * factor).clamp(0.0, 255.0) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Squared distance in RGB space, the quantizer's similarity metric.
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        dr * dr + dg * dg + db * db
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}
