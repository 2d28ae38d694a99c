use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::scene_object::SceneObject;

/// Holds all scene resources required for rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub scene_objects: Vec<SceneObject>,
}
