use crate::error::{RasterError, Result};
use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

/// `|W|` below this is treated as zero during the perspective divide.
pub const W_EPSILON: f32 = 1e-6;

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the elementary transformation matrices.
/// Right-handed, column vectors (`M * v`), camera looking down -Z.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Rotation around an arbitrary axis (Rodrigues' rotation formula).
    pub fn rotation(axis: &Vector3<f32>, angle_rad: f32) -> Matrix4<f32> {
        let axis_unit = axis.normalize();
        let x = axis_unit.x;
        let y = axis_unit.y;
        let z = axis_unit.z;
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        let t = 1.0 - c;

        Matrix4::new(
            t * x * x + c,     t * x * y - z * s, t * x * z + y * s, 0.0,
            t * x * y + z * s, t * y * y + c,     t * y * z - x * s, 0.0,
            t * x * z - y * s, t * y * z + x * s, t * z * z + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        )
    }

    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Look-at view matrix: transposed camera basis composed with a translation by `-eye`.
    ///
    /// Returns `None` when `up` is parallel to the viewing direction (or `eye == target`),
    /// since no orthonormal basis exists.
    pub fn view(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Option<Matrix4<f32>> {
        // forward points from the target back to the eye; the camera looks down -forward
        let z_axis = (eye - target).try_normalize(1e-6)?;
        let x_axis = up.cross(&z_axis).try_normalize(1e-6)?;
        let y_axis = z_axis.cross(&x_axis);

        let rotation = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, 0.0,
            y_axis.x, y_axis.y, y_axis.z, 0.0,
            z_axis.x, z_axis.y, z_axis.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        Some(rotation * Self::translation(&-eye.coords))
    }

    /// Symmetric-frustum perspective projection mapping `z = -near` to NDC -1 and
    /// `z = -far` to NDC +1.
    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Result<Matrix4<f32>> {
        if !(fov_y_rad > 0.0 && fov_y_rad < std::f32::consts::PI) {
            return Err(RasterError::invalid_argument("fov_y", format!("{fov_y_rad} rad is not in (0, pi)")));
        }
        if !(aspect_ratio > 0.0) || !aspect_ratio.is_finite() {
            return Err(RasterError::invalid_argument("aspect", format!("{aspect_ratio} must be positive")));
        }
        if !(near > 0.0) || !near.is_finite() {
            return Err(RasterError::invalid_argument("near", format!("{near} must be positive")));
        }
        if !(far > near) || !far.is_finite() {
            return Err(RasterError::invalid_argument("far", format!("{far} must exceed near ({near})")));
        }

        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let nf = 1.0 / (near - far);

        Ok(Matrix4::new(
            f / aspect_ratio, 0.0, 0.0,               0.0,
            0.0,              f,   0.0,               0.0,
            0.0,              0.0, (far + near) * nf, 2.0 * far * near * nf,
            0.0,              0.0, -1.0,              0.0,
        ))
    }
}

//=================================
// Core Transformation Functions
//=================================

/// `1 / w`, or 0 when `|w|` is too small to divide by.
#[inline]
pub fn inverse_w(w: f32) -> f32 {
    if w.abs() < W_EPSILON { 0.0 } else { 1.0 / w }
}

/// Clip space -> NDC, given the precomputed `1 / w`.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>, inv_w: f32) -> Point3<f32> {
    Point3::new(clip.x * inv_w, clip.y * inv_w, clip.z * inv_w)
}

/// NDC -> pixel coordinates. No Y flip: row 0 is the bottom of the buffer.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new((ndc_x + 1.0) * 0.5 * width, (ndc_y + 1.0) * 0.5 * height)
}

/// NDC z in `[-1, 1]` -> depth in `[0, 1]`.
#[inline]
pub fn ndc_to_depth(ndc_z: f32) -> f32 {
    (ndc_z + 1.0) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn project(m: &Matrix4<f32>, p: Vector4<f32>) -> Point3<f32> {
        let clip = m * p;
        apply_perspective_division(&clip, inverse_w(clip.w))
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        let (near, far) = (0.1, 100.0);
        let p = TransformFactory::perspective(1.0, 60.0_f32.to_radians(), near, far).unwrap();

        let at_near = project(&p, Vector4::new(0.0, 0.0, -near, 1.0));
        let at_far = project(&p, Vector4::new(0.0, 0.0, -far, 1.0));
        assert_relative_eq!(at_near.z, -1.0, epsilon = 1e-4);
        assert_relative_eq!(at_far.z, 1.0, epsilon = 1e-4);
        assert_relative_eq!(ndc_to_depth(at_near.z), 0.0, epsilon = 1e-4);
        assert_relative_eq!(ndc_to_depth(at_far.z), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_w_is_distance_in_front() {
        let p = TransformFactory::perspective(1.0, 1.0, 0.5, 10.0).unwrap();
        let clip = p * Vector4::new(0.3, 0.2, -4.0, 1.0);
        assert_relative_eq!(clip.w, 4.0);
    }

    #[test]
    fn test_perspective_rejects_invalid_parameters() {
        let fov = 1.0;
        assert!(TransformFactory::perspective(1.0, 0.0, 0.1, 10.0).is_err());
        assert!(TransformFactory::perspective(1.0, std::f32::consts::PI, 0.1, 10.0).is_err());
        assert!(TransformFactory::perspective(0.0, fov, 0.1, 10.0).is_err());
        assert!(TransformFactory::perspective(-1.0, fov, 0.1, 10.0).is_err());
        assert!(TransformFactory::perspective(1.0, fov, 0.0, 10.0).is_err());
        assert!(TransformFactory::perspective(1.0, fov, 1.0, 1.0).is_err());
        assert!(TransformFactory::perspective(1.0, fov, f32::NAN, 10.0).is_err());
    }

    #[test]
    fn test_view_moves_eye_to_origin_looking_down_neg_z() {
        let eye = Point3::new(0.0, 0.0, 3.0);
        let view = TransformFactory::view(&eye, &Point3::origin(), &Vector3::y()).unwrap();

        let eye_in_view = view * eye.to_homogeneous();
        assert_relative_eq!(eye_in_view, Vector4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-6);

        let target_in_view = view * Point3::<f32>::origin().to_homogeneous();
        assert_relative_eq!(target_in_view, Vector4::new(0.0, 0.0, -3.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_view_with_parallel_up_is_undefined() {
        let eye = Point3::new(0.0, 5.0, 0.0);
        assert!(TransformFactory::view(&eye, &Point3::origin(), &Vector3::y()).is_none());
    }

    #[test]
    fn test_rotation_matches_axis_specific_versions() {
        let angle = 0.6;
        assert_relative_eq!(
            TransformFactory::rotation(&Vector3::x(), angle),
            TransformFactory::rotation_x(angle),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            TransformFactory::rotation(&Vector3::y(), angle),
            TransformFactory::rotation_y(angle),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            TransformFactory::rotation(&Vector3::z(), angle),
            TransformFactory::rotation_z(angle),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_ndc_to_screen_has_no_flip() {
        assert_eq!(ndc_to_screen(-1.0, -1.0, 640.0, 480.0), Point2::new(0.0, 0.0));
        assert_eq!(ndc_to_screen(1.0, 1.0, 640.0, 480.0), Point2::new(640.0, 480.0));
        assert_eq!(ndc_to_screen(0.0, 0.0, 640.0, 480.0), Point2::new(320.0, 240.0));
    }

    #[test]
    fn test_inverse_w_guards_zero() {
        assert_eq!(inverse_w(0.0), 0.0);
        assert_eq!(inverse_w(2.0), 0.5);
    }
}
