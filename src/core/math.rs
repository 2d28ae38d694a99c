pub mod interpolation;
pub mod matrix;
pub mod transform;

use nalgebra::Vector3;

/// Vectors shorter than this are treated as zero-length.
pub const NORMALIZE_EPSILON: f32 = 1e-5;

/// Normalizes `v`, returning the zero vector when `v` is (nearly) zero-length.
#[inline]
pub fn normalize_or_zero(v: &Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(NORMALIZE_EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_or_zero() {
        let n = normalize_or_zero(&Vector3::new(3.0, 0.0, 4.0));
        assert!((n.norm() - 1.0).abs() < 1e-6);
        assert_eq!(normalize_or_zero(&Vector3::new(1e-7, 0.0, 0.0)), Vector3::zeros());
    }
}
