use crate::core::vertex_processor::VertexProcessor;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use nalgebra::Vector3;
use std::sync::Arc;

/// Placement of an object: translation, Euler rotation in degrees and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub position: Vector3<f32>,
    /// Rotation about X, then Y, then Z, in degrees.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }
}

/// A mesh instance in the scene with its own transform and optional texture.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub transform: ObjectTransform,
    pub texture: Option<Arc<Texture>>,
}

impl SceneObject {
    pub fn new(mesh: Mesh, transform: ObjectTransform) -> Self {
        Self {
            mesh,
            transform,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Rebuilds the object->world matrix of `vp`:
    /// reset, translate, rotate X, rotate Y, rotate Z, scale.
    pub fn apply_transform(&self, vp: &mut VertexProcessor) {
        let t = &self.transform;
        vp.reset_object_transform();
        vp.translate(t.position);
        for (axis, angle) in [(Vector3::x(), t.rotation.x), (Vector3::y(), t.rotation.y), (Vector3::z(), t.rotation.z)] {
            if angle != 0.0 {
                vp.rotate(axis, angle);
            }
        }
        vp.scale(t.scale);
    }
}
