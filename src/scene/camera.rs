use crate::core::vertex_processor::VertexProcessor;
use crate::error::Result;
use nalgebra::{Point3, Vector3};

/// A perspective camera described by its pose and frustum.
///
/// The camera holds no matrices of its own; [`Camera::apply`] writes them into
/// a [`VertexProcessor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view, in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov_y_deg: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new(position: Point3<f32>, target: Point3<f32>, up: Vector3<f32>, fov_y_deg: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target,
            up,
            fov_y_deg,
            near,
            far,
        }
    }

    /// Sets projection and view on `vp`. The projection is validated first, so
    /// an invalid frustum leaves both matrices untouched.
    pub fn apply(&self, vp: &mut VertexProcessor, aspect_ratio: f32) -> Result<()> {
        vp.set_perspective(self.fov_y_deg, aspect_ratio, self.near, self.far)?;
        vp.set_look_at(self.position, self.target, self.up);
        Ok(())
    }
}
