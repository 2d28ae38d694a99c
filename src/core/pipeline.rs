use crate::core::math::interpolation::Interpolatable;
use nalgebra::{Point2, Point3, Vector2, Vector3};
use std::ops::{Add, Mul};

/// Data interpolated across the triangle surface.
/// Built per vertex, blended per pixel, handed to the shading stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Varying {
    /// Vertex color (or the lit color in Gouraud mode), channels in `0..=255`.
    pub color: Vector3<f32>,
    /// Position in world space.
    pub world_pos: Point3<f32>,
    /// Normal in world space; renormalized after interpolation.
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
}

// nalgebra's Point3 has no Point + Point, so positions go through their coords.
impl Add for Varying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            color: self.color + other.color,
            world_pos: Point3::from(self.world_pos.coords + other.world_pos.coords),
            normal: self.normal + other.normal,
            uv: self.uv + other.uv,
        }
    }
}

impl Mul<f32> for Varying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            color: self.color * scalar,
            world_pos: Point3::from(self.world_pos.coords * scalar),
            normal: self.normal * scalar,
            uv: self.uv * scalar,
        }
    }
}

impl Interpolatable for Varying {}

/// A vertex after perspective divide and screen mapping. Lives for one triangle.
#[derive(Clone, Copy, Debug)]
pub struct ProjectedVertex {
    /// Pixel coordinates (y up).
    pub screen: Point2<f32>,
    /// Depth mapped to `[0, 1]`.
    pub depth: f32,
    /// `1 / W`, 0 when W was too close to zero.
    pub inv_w: f32,
    pub varying: Varying,
}
