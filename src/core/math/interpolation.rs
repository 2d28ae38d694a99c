use nalgebra::{Point2, Vector3};
use std::ops::{Add, Mul};

/// Twice-areas below this magnitude mark a triangle as degenerate.
pub const AREA_EPSILON: f32 = 1e-5;

/// Numerically stable weight sums must exceed this to divide by them.
const WEIGHT_EPSILON: f32 = 1e-12;

/// Types that can be combined linearly across a triangle's surface.
///
/// Requirements:
/// - Copy: cheap per-vertex storage.
/// - Add + Mul<f32>: the linear combination `a * wa + b * wb + c * wc`.
/// - Send + Sync: values are shared by the row-parallel pixel loop.
pub trait Interpolatable:
    Copy + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

impl Interpolatable for f32 {}

/// Edge function of the directed edge `a -> b` evaluated at `p`:
/// positive when `p` lies to the left of the edge (y-up), zero on the line.
///
/// The endpoints are evaluated in a canonical order so that
/// `edge_function(a, b, p) == -edge_function(b, a, p)` holds bit for bit;
/// two triangles sharing an edge therefore agree exactly on which side a
/// pixel center lies.
#[inline]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    if (a.x, a.y) <= (b.x, b.y) {
        raw_edge(a, b, p)
    } else {
        -raw_edge(b, a, p)
    }
}

#[inline(always)]
fn raw_edge(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Twice the signed area of the triangle (shoelace). Positive for
/// counter-clockwise vertices in y-up screen space.
#[inline]
pub fn signed_area_x2(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> f32 {
    (v1.x - v0.x) * (v2.y - v0.y) - (v1.y - v0.y) * (v2.x - v0.x)
}

/// Top-left ownership of the edge `a -> b` for a counter-clockwise (positive area)
/// triangle in y-up space: left edges run downwards, top edges run right-to-left.
#[inline]
pub fn is_top_left(a: Point2<f32>, b: Point2<f32>) -> bool {
    let d = b - a;
    d.y < 0.0 || (d.y == 0.0 && d.x < 0.0)
}

/// Inside test for one edge under the top-left rule.
#[inline(always)]
fn edge_covers(value: f32, owns_boundary: bool) -> bool {
    value > 0.0 || (value == 0.0 && owns_boundary)
}

/// Precomputed edge setup for a counter-clockwise triangle.
#[derive(Debug, Clone, Copy)]
pub struct EdgeSetup {
    vertices: [Point2<f32>; 3],
    owns: [bool; 3],
    inv_area_x2: f32,
}

impl EdgeSetup {
    /// Returns `None` for clockwise or degenerate triangles; callers reorder
    /// vertices so the signed area is positive before building the setup.
    pub fn new(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> Option<Self> {
        let area_x2 = signed_area_x2(v0, v1, v2);
        if !(area_x2 >= AREA_EPSILON) {
            return None;
        }
        Some(Self {
            vertices: [v0, v1, v2],
            // edge i is opposite vertex i
            owns: [is_top_left(v1, v2), is_top_left(v2, v0), is_top_left(v0, v1)],
            inv_area_x2: 1.0 / area_x2,
        })
    }

    /// Barycentric weights `(l0, l1, l2)` of `p`, or `None` when `p` is not
    /// covered under the top-left rule.
    #[inline]
    pub fn coverage(&self, p: Point2<f32>) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = self.vertices;
        let e0 = edge_function(v1, v2, p);
        let e1 = edge_function(v2, v0, p);
        let e2 = edge_function(v0, v1, p);

        if edge_covers(e0, self.owns[0]) && edge_covers(e1, self.owns[1]) && edge_covers(e2, self.owns[2])
        {
            Some(Vector3::new(e0, e1, e2) * self.inv_area_x2)
        } else {
            None
        }
    }
}

/// Screen-space barycentric weights of `p` regardless of coverage.
///
/// Returns `None` if the triangle is degenerate.
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let area_x2 = signed_area_x2(v0, v1, v2);
    if area_x2.abs() < AREA_EPSILON {
        return None;
    }
    let inv = 1.0 / area_x2;
    Some(Vector3::new(
        edge_function(v1, v2, p) * inv,
        edge_function(v2, v0, p) * inv,
        edge_function(v0, v1, p) * inv,
    ))
}

/// Perspective-correct weights:
///   `w'_i = l_i * invW_i / sum_j(l_j * invW_j)`
///
/// Interpolating any attribute `A` with these weights yields
/// `sum(l_i * A_i * invW_i) / sum(l_i * invW_i)`.
/// Returns `None` when the denominator is too close to zero.
pub fn perspective_correct_weights(bary: Vector3<f32>, inv_w: [f32; 3]) -> Option<Vector3<f32>> {
    let weighted = Vector3::new(bary.x * inv_w[0], bary.y * inv_w[1], bary.z * inv_w[2]);
    let sum = weighted.x + weighted.y + weighted.z;
    if !(sum.abs() > WEIGHT_EPSILON) {
        return None;
    }
    Some(weighted / sum)
}

/// Linear combination of three per-vertex values.
#[inline]
pub fn interpolate<T: Interpolatable>(values: &[T; 3], weights: Vector3<f32>) -> T {
    values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
}
