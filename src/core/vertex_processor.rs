use crate::core::math::matrix::try_invert;
use crate::core::math::transform::TransformFactory;
use crate::error::Result;
use log::{debug, warn};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

/// The three transform matrices of one render context.
///
/// A plain copyable value: snapshot it with [`VertexProcessor::state`] and
/// restore it with [`VertexProcessor::set_state`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub object_to_world: Matrix4<f32>,
    pub world_to_view: Matrix4<f32>,
    pub view_to_projection: Matrix4<f32>,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            object_to_world: Matrix4::identity(),
            world_to_view: Matrix4::identity(),
            view_to_projection: Matrix4::identity(),
        }
    }
}

impl TransformState {
    /// `ViewToProjection * WorldToView * ObjectToWorld`.
    #[inline]
    pub fn model_view_projection(&self) -> Matrix4<f32> {
        self.view_to_projection * self.world_to_view * self.object_to_world
    }
}

/// The vertex transform stage: owns the camera and object transforms and
/// maps object-space positions to clip space.
#[derive(Debug, Clone, Default)]
pub struct VertexProcessor {
    state: TransformState,
}

impl VertexProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn set_state(&mut self, state: TransformState) {
        self.state = state;
    }

    pub fn object_to_world(&self) -> &Matrix4<f32> {
        &self.state.object_to_world
    }

    pub fn world_to_view(&self) -> &Matrix4<f32> {
        &self.state.world_to_view
    }

    pub fn view_to_projection(&self) -> &Matrix4<f32> {
        &self.state.view_to_projection
    }

    /// Builds a symmetric-frustum projection.
    ///
    /// Fails when `fov_y_deg` is not in `(0, 180)`, `aspect <= 0`, `near <= 0`
    /// or `far <= near`; the previous projection is kept in that case.
    pub fn set_perspective(&mut self, fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
        let projection = TransformFactory::perspective(aspect, fov_y_deg.to_radians(), near, far)?;
        debug!("Perspective set: fov={fov_y_deg} aspect={aspect:.3} near={near} far={far}");
        self.state.view_to_projection = projection;
        Ok(())
    }

    /// Builds the view matrix from an orthonormal camera basis.
    ///
    /// `up` parallel to `eye - center` is a caller error: no basis exists, a
    /// warning is logged and the previous view matrix stays in place.
    pub fn set_look_at(&mut self, eye: Point3<f32>, center: Point3<f32>, up: Vector3<f32>) {
        match TransformFactory::view(&eye, &center, &up) {
            Some(view) => self.state.world_to_view = view,
            None => warn!("Degenerate look-at basis (eye={eye:?}, center={center:?}, up={up:?}); view unchanged"),
        }
    }

    /// Appends a translation on the object side of the current transform.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.state.object_to_world *= TransformFactory::translation(&offset);
    }

    /// Appends a rotation of `angle_deg` degrees around `axis`.
    /// A zero-length axis leaves the transform untouched.
    pub fn rotate(&mut self, axis: Vector3<f32>, angle_deg: f32) {
        if axis.norm_squared() < 1e-12 {
            warn!("Ignoring rotation around a zero-length axis");
            return;
        }
        self.state.object_to_world *= TransformFactory::rotation(&axis, angle_deg.to_radians());
    }

    pub fn scale(&mut self, factors: Vector3<f32>) {
        self.state.object_to_world *= TransformFactory::scaling_nonuniform(&factors);
    }

    pub fn reset_object_transform(&mut self) {
        self.state.object_to_world = Matrix4::identity();
    }

    /// `MVP * [pos, 1]`. Pure.
    #[inline]
    pub fn transform_position_to_clip_space(&self, position: &Point3<f32>) -> Vector4<f32> {
        self.state.model_view_projection() * position.to_homogeneous()
    }

    /// Object -> world for a position.
    #[inline]
    pub fn transform_position_to_world(&self, position: &Point3<f32>) -> Point3<f32> {
        self.state.object_to_world.transform_point(position)
    }

    /// Inverse-transpose of the object -> world 3x3 block; falls back to the
    /// plain 3x3 block when the transform is singular.
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        let linear: Matrix3<f32> = self.state.object_to_world.fixed_view::<3, 3>(0, 0).into_owned();
        match try_invert(&self.state.object_to_world) {
            Some(inverse) => inverse.fixed_view::<3, 3>(0, 0).transpose(),
            None => linear,
        }
    }

    /// Camera position in world space, recovered from the inverted view matrix.
    /// Falls back to the origin when the view matrix is singular.
    pub fn camera_position(&self) -> Point3<f32> {
        match try_invert(&self.state.world_to_view) {
            Some(inv) => Point3::new(inv[(0, 3)], inv[(1, 3)], inv[(2, 3)]),
            None => Point3::origin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> VertexProcessor {
        let mut vp = VertexProcessor::new();
        vp.set_perspective(60.0, 1.0, 0.1, 100.0).unwrap();
        vp.set_look_at(Point3::new(0.0, 0.0, 3.0), Point3::origin(), Vector3::y());
        vp
    }

    #[test]
    fn test_set_perspective_validation() {
        let mut vp = VertexProcessor::new();
        assert!(vp.set_perspective(0.0, 1.0, 0.1, 10.0).is_err());
        assert!(vp.set_perspective(180.0, 1.0, 0.1, 10.0).is_err());
        assert!(vp.set_perspective(60.0, 0.0, 0.1, 10.0).is_err());
        assert!(vp.set_perspective(60.0, 1.0, -0.1, 10.0).is_err());
        assert!(vp.set_perspective(60.0, 1.0, 5.0, 5.0).is_err());
        // failed calls leave the projection untouched
        assert_eq!(*vp.view_to_projection(), Matrix4::identity());
        assert!(vp.set_perspective(179.0, 2.0, 0.01, 0.02).is_ok());
    }

    #[test]
    fn test_transforms_compose_in_object_local_order() {
        let mut vp = VertexProcessor::new();
        vp.translate(Vector3::new(10.0, 0.0, 0.0));
        vp.scale(Vector3::new(2.0, 2.0, 2.0));

        // scale applies first (closest to the object), then the translation
        let p = vp.transform_position_to_world(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(12.0, 0.0, 0.0), epsilon = 1e-6);

        let mut vp = VertexProcessor::new();
        vp.rotate(Vector3::z(), 90.0);
        vp.translate(Vector3::new(1.0, 0.0, 0.0));
        // translation first, then the rotation around Z
        let p = vp.transform_position_to_world(&Point3::origin());
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_reset_object_transform() {
        let mut vp = VertexProcessor::new();
        vp.translate(Vector3::new(1.0, 2.0, 3.0));
        vp.reset_object_transform();
        assert_eq!(*vp.object_to_world(), Matrix4::identity());
    }

    #[test]
    fn test_clip_space_matches_mvp_product() {
        let mut vp = camera();
        vp.rotate(Vector3::y(), 30.0);
        let pos = Point3::new(0.2, -0.4, 0.1);
        let expected = vp.view_to_projection() * vp.world_to_view() * vp.object_to_world() * pos.to_homogeneous();
        assert_relative_eq!(vp.transform_position_to_clip_space(&pos), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_origin_lands_at_screen_center() {
        let vp = camera();
        let clip = vp.transform_position_to_clip_space(&Point3::origin());
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(clip.w, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_camera_position_recovered_from_view() {
        let vp = camera();
        assert_relative_eq!(vp.camera_position(), Point3::new(0.0, 0.0, 3.0), epsilon = 1e-5);

        let mut singular = VertexProcessor::new();
        singular.set_state(TransformState {
            world_to_view: Matrix4::zeros(),
            ..TransformState::default()
        });
        assert_eq!(singular.camera_position(), Point3::origin());
    }

    #[test]
    fn test_degenerate_look_at_keeps_previous_view() {
        let mut vp = camera();
        let before = *vp.world_to_view();
        vp.set_look_at(Point3::new(0.0, 4.0, 0.0), Point3::origin(), Vector3::y());
        assert_eq!(*vp.world_to_view(), before);
    }

    #[test]
    fn test_normal_matrix_handles_non_uniform_scale() {
        let mut vp = VertexProcessor::new();
        vp.scale(Vector3::new(4.0, 1.0, 1.0));
        // a 45-degree surface in XY squashes towards the X axis
        let n = (vp.normal_matrix() * Vector3::new(1.0, 1.0, 0.0)).normalize();
        let tangent = Vector3::new(4.0, -1.0, 0.0);
        assert_relative_eq!(n.dot(&tangent), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_state_snapshot_round_trip() {
        let mut vp = camera();
        let saved = vp.state();
        vp.translate(Vector3::new(5.0, 0.0, 0.0));
        vp.set_state(saved);
        assert_eq!(vp.state(), saved);
    }
}
