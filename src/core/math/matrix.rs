use nalgebra::Matrix4;

/// Matrices whose determinant magnitude falls below this are treated as singular.
pub const INVERT_EPSILON: f32 = 1e-6;

/// Inverts `m`, or returns `None` when `|det(m)| < INVERT_EPSILON`.
///
/// The fixed threshold is stricter than `try_inverse` alone, which only
/// rejects an exactly zero determinant. Callers substitute their own fallback
/// instead of propagating an error.
pub fn try_invert(m: &Matrix4<f32>) -> Option<Matrix4<f32>> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() < INVERT_EPSILON {
        return None;
    }
    m.try_inverse()
}
