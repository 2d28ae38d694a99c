use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Add;

/// An 8-bit-per-channel RGB color.
///
/// Every arithmetic helper saturates into `0..=255`; a channel never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::gray(0);
    pub const WHITE: Color = Color::gray(255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Deterministic pseudo-random color for a seed.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(rng.random(), rng.random(), rng.random())
    }

    /// Channel-wise product in normalized `[0, 1]` space, rescaled to `0..=255`.
    pub fn modulate(self, other: Color) -> Color {
        let a = self.to_unit();
        let b = other.to_unit();
        Color::from_vector(a.component_mul(&b) * 255.0)
    }

    /// Scales every channel by `factor` (negative factors count as zero).
    pub fn scale(self, factor: f32) -> Color {
        Color::from_vector(self.to_vector() * factor.max(0.0))
    }

    /// Channels as floats in `0.0..=255.0`.
    #[inline]
    pub fn to_vector(self) -> Vector3<f32> {
        Vector3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    /// Channels as floats in `0.0..=1.0`.
    #[inline]
    pub fn to_unit(self) -> Vector3<f32> {
        self.to_vector() / 255.0
    }

    /// Builds a color from `0..255`-scaled floats, rounding and clamping each
    /// channel. NaN channels become 0.
    #[inline]
    pub fn from_vector(v: Vector3<f32>) -> Color {
        let channel = |c: f32| if c.is_nan() { 0 } else { c.round().clamp(0.0, 255.0) as u8 };
        Color::new(channel(v.x), channel(v.y), channel(v.z))
    }

    /// Byte order used by TGA pixel data.
    #[inline]
    pub fn to_bgr(self) -> [u8; 3] {
        [self.b, self.g, self.r]
    }
}

impl Add for Color {
    type Output = Color;

    /// Saturating channel-wise sum.
    fn add(self, other: Color) -> Color {
        Color::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Color::new(rgb[0], rgb[1], rgb[2])
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulate_normalized_product() {
        let c = Color::new(255, 128, 0).modulate(Color::new(255, 255, 255));
        assert_eq!(c, Color::new(255, 128, 0));

        let half = Color::gray(128).modulate(Color::gray(128));
        assert_eq!(half, Color::gray(64));
    }

    #[test]
    fn test_add_saturates() {
        let c = Color::new(200, 100, 255) + Color::new(100, 100, 1);
        assert_eq!(c, Color::new(255, 200, 255));
    }

    #[test]
    fn test_scale_clamps_and_ignores_negative() {
        assert_eq!(Color::gray(200).scale(2.0), Color::WHITE);
        assert_eq!(Color::gray(200).scale(-1.0), Color::BLACK);
        assert_eq!(Color::gray(100).scale(0.5), Color::gray(50));
    }

    #[test]
    fn test_from_vector_clamps() {
        let c = Color::from_vector(Vector3::new(-20.0, 300.0, f32::NAN));
        assert_eq!(c, Color::new(0, 255, 0));
    }

    #[test]
    fn test_from_seed_is_deterministic() {
        assert_eq!(Color::from_seed(42), Color::from_seed(42));
    }
}
