use crate::core::color::Color;
use crate::error::{RasterError, Result};
use log::info;
use std::path::Path;

/// A 2D RGB texture stored as a flat, row-major pixel array.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Color>,
}

impl Texture {
    /// Wraps already-decoded pixel data. Fails on empty dimensions or a pixel
    /// count that does not match `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidTexture(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if pixels.len() != width * height {
            return Err(RasterError::InvalidTexture(format!(
                "expected {} pixels for {width}x{height}, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decodes an image file into RGB8. Missing or unreadable files are errors.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|source| RasterError::TextureLoad {
                path: path_ref.to_path_buf(),
                source,
            })?
            .to_rgb8();

        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| Color::new(p[0], p[1], p[2])).collect();

        info!("Loaded texture: {:?} ({}x{})", path_ref, width, height);
        Self::new(width as usize, height as usize, pixels)
    }

    /// Nearest-neighbor lookup with wraparound addressing.
    ///
    /// `u` and `v` wrap through `coord - floor(coord)`; the scaled coordinate is
    /// truncated and clamped so that `1.0` maps to the last texel.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let u = wrap(u);
        let v = wrap(v);

        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);

        self.pixels[y * self.width + x]
    }
}

/// `coord - floor(coord)`; non-finite input maps to 0.
#[inline]
fn wrap(coord: f32) -> f32 {
    if coord.is_finite() { coord - coord.floor() } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 checker: (0,0)=red (1,0)=green (0,1)=blue (1,1)=white.
    fn checker() -> Texture {
        Texture::new(
            2,
            2,
            vec![
                Color::new(255, 0, 0),
                Color::new(0, 255, 0),
                Color::new(0, 0, 255),
                Color::WHITE,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_sample_nearest() {
        let tex = checker();
        assert_eq!(tex.sample(0.25, 0.25), Color::new(255, 0, 0));
        assert_eq!(tex.sample(0.75, 0.25), Color::new(0, 255, 0));
        assert_eq!(tex.sample(0.25, 0.75), Color::new(0, 0, 255));
        assert_eq!(tex.sample(0.75, 0.75), Color::WHITE);
    }

    #[test]
    fn test_sample_wraps() {
        let tex = checker();
        assert_eq!(tex.sample(1.25, 0.25), tex.sample(0.25, 0.25));
        assert_eq!(tex.sample(-0.25, 0.25), tex.sample(0.75, 0.25));
        assert_eq!(tex.sample(0.25, -1.75), tex.sample(0.25, 0.25));
    }

    #[test]
    fn test_sample_upper_boundary_maps_to_last_texel() {
        let tex = checker();
        // the largest float below 1.0 still lands in the last column
        let almost_one = 1.0_f32 - f32::EPSILON;
        assert_eq!(tex.sample(almost_one, 0.0), Color::new(0, 255, 0));
        // 1.0 itself wraps to 0.0
        assert_eq!(tex.sample(1.0, 0.0), Color::new(255, 0, 0));
    }

    #[test]
    fn test_sample_non_finite_does_not_panic() {
        let tex = checker();
        assert_eq!(tex.sample(f32::NAN, f32::INFINITY), Color::new(255, 0, 0));
    }

    #[test]
    fn test_new_rejects_mismatched_data() {
        assert!(Texture::new(2, 2, vec![Color::BLACK; 3]).is_err());
        assert!(Texture::new(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(matches!(
            Texture::load("definitely/not/here.png"),
            Err(RasterError::TextureLoad { .. })
        ));
    }
}
