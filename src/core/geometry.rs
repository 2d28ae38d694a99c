use crate::core::color::Color;
use nalgebra::{Point3, Vector2, Vector3};

/// A single input vertex. Immutable once built; meshes own them and
/// draw calls copy them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexData {
    /// Position in object space.
    pub position: Point3<f32>,
    /// Normal in object space.
    pub normal: Vector3<f32>,
    /// Base color (albedo).
    pub color: Color,
    /// Texture coordinates; wrap at integer boundaries.
    pub texcoord: Vector2<f32>,
}

impl VertexData {
    pub fn new(
        position: Point3<f32>,
        normal: Vector3<f32>,
        color: Color,
        texcoord: Vector2<f32>,
    ) -> Self {
        Self {
            position,
            normal,
            color,
            texcoord,
        }
    }

    /// Vertex with an up-facing placeholder normal and zero UV; meshes built
    /// this way are expected to run `Mesh::calculate_normals`.
    pub fn with_color(position: Point3<f32>, color: Color) -> Self {
        Self::new(position, Vector3::y(), color, Vector2::zeros())
    }
}
