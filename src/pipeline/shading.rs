use crate::core::color::Color;
use crate::core::math::{NORMALIZE_EPSILON, normalize_or_zero};
use crate::core::pipeline::Varying;
use crate::scene::light::Light;
use crate::scene::texture::Texture;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Where lighting is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    /// Per pixel, with one constant normal and albedo per triangle.
    Flat,
    /// Per vertex; lit colors are interpolated. Textures are ignored.
    Gouraud,
    /// Per pixel, with interpolated normals.
    #[default]
    Phong,
}

impl FromStr for ShadingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "gouraud" => Ok(Self::Gouraud),
            "phong" => Ok(Self::Phong),
            other => Err(format!("unknown shading mode '{other}' (expected flat, gouraud or phong)")),
        }
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flat => "flat",
            Self::Gouraud => "gouraud",
            Self::Phong => "phong",
        };
        f.write_str(name)
    }
}

/// Sum of every enabled light's contribution, saturating per channel.
pub fn accumulate_lights(
    lights: &[Light],
    world_pos: &Point3<f32>,
    normal: &Vector3<f32>,
    view_dir: &Vector3<f32>,
    albedo: Color,
) -> Color {
    lights
        .iter()
        .filter(|light| light.is_enabled())
        .fold(Color::BLACK, |acc, light| acc + light.calculate(world_pos, normal, view_dir, albedo))
}

/// Unit vector from `world_pos` towards the camera (zero if they coincide).
#[inline]
pub fn view_direction(camera_pos: &Point3<f32>, world_pos: &Point3<f32>) -> Vector3<f32> {
    normalize_or_zero(&(camera_pos - world_pos))
}

/// Renormalizes an interpolated normal. A (near) zero result falls back to
/// `flat_normal`, and to +Y if that is degenerate too.
#[inline]
pub fn resolve_normal(interpolated: &Vector3<f32>, flat_normal: &Vector3<f32>) -> Vector3<f32> {
    interpolated
        .try_normalize(NORMALIZE_EPSILON)
        .or_else(|| flat_normal.try_normalize(NORMALIZE_EPSILON))
        .unwrap_or_else(Vector3::y)
}

/// Everything the per-vertex and per-pixel shading of one triangle needs.
///
/// Built once per triangle and shared read-only by the row-parallel pixel loop.
pub struct TriangleShader<'a> {
    pub mode: ShadingMode,
    pub lights: &'a [Light],
    pub texture: Option<&'a Texture>,
    pub camera_pos: Point3<f32>,
    /// Unit world-space face normal.
    pub flat_normal: Vector3<f32>,
    /// Albedo of the triangle's first vertex.
    pub flat_albedo: Color,
}

impl TriangleShader<'_> {
    /// The color a vertex carries into interpolation: lit in Gouraud mode,
    /// the raw vertex color otherwise.
    pub fn vertex_color(&self, world_pos: &Point3<f32>, world_normal: &Vector3<f32>, color: Color) -> Vector3<f32> {
        match self.mode {
            ShadingMode::Gouraud => {
                let normal = resolve_normal(world_normal, &self.flat_normal);
                let view_dir = view_direction(&self.camera_pos, world_pos);
                accumulate_lights(self.lights, world_pos, &normal, &view_dir, color).to_vector()
            }
            ShadingMode::Flat | ShadingMode::Phong => color.to_vector(),
        }
    }

    /// Final color of a covered pixel.
    pub fn fragment(&self, v: &Varying) -> Color {
        match self.mode {
            ShadingMode::Gouraud => Color::from_vector(v.color),
            ShadingMode::Flat => {
                let albedo = self.sample_or(v, self.flat_albedo);
                self.light(&v.world_pos, &self.flat_normal, albedo)
            }
            ShadingMode::Phong => {
                let normal = resolve_normal(&v.normal, &self.flat_normal);
                let albedo = self.sample_or(v, Color::from_vector(v.color));
                self.light(&v.world_pos, &normal, albedo)
            }
        }
    }

    /// A bound texture replaces the vertex albedo; the two are never blended.
    #[inline]
    fn sample_or(&self, v: &Varying, fallback: Color) -> Color {
        match self.texture {
            Some(texture) => texture.sample(v.uv.x, v.uv.y),
            None => fallback,
        }
    }

    #[inline]
    fn light(&self, world_pos: &Point3<f32>, normal: &Vector3<f32>, albedo: Color) -> Color {
        let view_dir = view_direction(&self.camera_pos, world_pos);
        accumulate_lights(self.lights, world_pos, normal, &view_dir, albedo)
    }
}
