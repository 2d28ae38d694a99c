use crate::core::color::Color;
use crate::error::{RasterError, Result};
use crate::io::config::{Config, LightConfig, LightKind, ObjectConfig, ShapeConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::light::{Attenuation, Light, LightProperties};
use crate::scene::mesh::Mesh;
use crate::scene::scene_object::{ObjectTransform, SceneObject};
use crate::scene::texture::Texture;
use crate::scene::utils::normalize_and_center_mesh;
use log::{debug, info};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds one light from its config entry. A directional light needs a
/// direction and a point light a position.
pub fn build_light(config: &LightConfig) -> Result<Light> {
    let properties = LightProperties {
        ambient: Color::from(config.ambient),
        diffuse: Color::from(config.diffuse),
        specular: Color::from(config.specular),
        shininess: config.shininess,
        enabled: config.enabled,
    };

    let light = match config.r#type {
        LightKind::Directional => {
            let direction = config
                .direction
                .ok_or_else(|| RasterError::invalid_argument("lights.direction", "directional light needs a direction"))?;
            Light::new_directional(Vector3::from(direction))
        }
        LightKind::Point => {
            let position = config
                .position
                .ok_or_else(|| RasterError::invalid_argument("lights.position", "point light needs a position"))?;
            let mut light = Light::new_point(Point3::from(position));
            let [constant, linear, quadratic] = config.attenuation;
            light.set_attenuation(Attenuation {
                constant,
                linear,
                quadratic,
            });
            if let Some(axis) = config.spot_direction {
                light.set_spotlight(Vector3::from(axis), config.spot_cutoff, config.spot_exponent);
            }
            light
        }
    };

    Ok(light.with_properties(properties))
}

pub fn build_lights_from_config(config: &Config) -> Result<Vec<Light>> {
    config.lights.iter().map(build_light).collect()
}

/// Generates (or loads) the mesh for one object and applies its coloring.
pub fn build_mesh(object: &ObjectConfig) -> Result<Mesh> {
    let palette = object.palette_colors();
    let mut mesh = match &object.shape {
        ShapeConfig::Triangle => Mesh::triangle(),
        ShapeConfig::Plane { half_size } => Mesh::plane(*half_size, palette[0])?,
        ShapeConfig::Cone { segments, height } => Mesh::cone(*segments, *height, palette)?,
        ShapeConfig::Cylinder {
            radial_segments,
            height_segments,
            height,
        } => Mesh::cylinder(*radial_segments, *height_segments, *height, palette)?,
        ShapeConfig::Torus {
            major,
            minor,
            outer_segments,
            inner_segments,
        } => Mesh::torus(*major, *minor, *outer_segments, *inner_segments, palette)?,
        ShapeConfig::Obj { path } => {
            let mut mesh = load_obj(path)?;
            normalize_and_center_mesh(&mut mesh);
            mesh
        }
    };

    if let Some(seed) = object.color_seed {
        mesh.randomize_colors(seed);
    }
    Ok(mesh)
}

/// Initial resource loading (heavy I/O). Missing OBJ or texture files abort
/// scene construction.
pub fn init_scene_resources(config: &Config) -> Result<RenderContext> {
    let cam = &config.camera;
    let camera = Camera::new(
        Point3::from(cam.position),
        Point3::from(cam.target),
        Vector3::from(cam.up),
        cam.fov,
        cam.near,
        cam.far,
    );

    let lights = build_lights_from_config(config)?;

    // objects naming the same texture file share one decoded copy
    let mut textures: HashMap<&str, Arc<Texture>> = HashMap::new();
    let mut scene_objects = Vec::with_capacity(config.objects.len());

    for object in &config.objects {
        let mesh = build_mesh(object)?;
        debug!("Built {:?}: {} triangles", object.shape, mesh.triangle_count());

        let transform = ObjectTransform {
            position: Vector3::from(object.position),
            rotation: Vector3::from(object.rotation),
            scale: Vector3::from(object.scale),
        };
        let mut scene_object = SceneObject::new(mesh, transform);

        if let Some(path) = object.texture.as_deref() {
            let texture = match textures.get(path) {
                Some(texture) => Arc::clone(texture),
                None => {
                    let texture = Arc::new(Texture::load(path)?);
                    textures.insert(path, Arc::clone(&texture));
                    texture
                }
            };
            scene_object = scene_object.with_texture(texture);
        }

        scene_objects.push(scene_object);
    }

    info!(
        "Scene initialized with {} objects and {} lights.",
        scene_objects.len(),
        lights.len()
    );

    Ok(RenderContext {
        camera,
        lights,
        scene_objects,
    })
}
