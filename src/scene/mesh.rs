use crate::core::color::Color;
use crate::core::geometry::VertexData;
use crate::error::{RasterError, Result};
use log::debug;
use nalgebra::{Point3, Vector2, Vector3};
use std::f32::consts::TAU;

/// Face normals with a squared length below this are treated as degenerate.
const DEGENERATE_NORMAL_SQ: f32 = 1e-6;

/// Generators refuse to emit more vertices than this, keeping every `u32`
/// index computation in range.
pub const MAX_GENERATED_VERTICES: usize = 1 << 24;

/// An indexed triangle list. Three consecutive indices form one triangle,
/// wound counter-clockwise when seen from the front.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<VertexData>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Validates the index list against the vertex list.
    pub fn new(vertices: Vec<VertexData>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(RasterError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RasterError::InvalidMesh(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }
        Ok(Self { vertices, indices })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates over triangles as vertex triples, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [VertexData; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Replaces every vertex normal with the normalized sum of the
    /// (area-weighted) face normals around it.
    ///
    /// Degenerate faces contribute nothing; a vertex left without any
    /// contribution points up.
    pub fn calculate_normals(&mut self) {
        let mut accum = vec![Vector3::<f32>::zeros(); self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = self.vertices[i0].position;
            let face = (self.vertices[i1].position - p0).cross(&(self.vertices[i2].position - p0));
            if face.norm_squared() < DEGENERATE_NORMAL_SQ {
                continue;
            }
            accum[i0] += face;
            accum[i1] += face;
            accum[i2] += face;
        }

        let mut orphaned = 0usize;
        for (vertex, sum) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = if sum.norm_squared() < DEGENERATE_NORMAL_SQ {
                orphaned += 1;
                Vector3::y()
            } else {
                sum.normalize()
            };
        }
        if orphaned > 0 {
            debug!("{orphaned} vertices received the fallback up normal");
        }
    }

    /// Assigns each vertex a deterministic pseudo-random color.
    pub fn randomize_colors(&mut self, seed: u64) {
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.color = Color::from_seed(seed.wrapping_add(i as u64));
        }
    }

    /// The reference triangle in the z = 0 plane, facing +Z, with red, green
    /// and blue corners.
    pub fn triangle() -> Self {
        let normal = Vector3::z();
        let vertices = vec![
            VertexData::new(
                Point3::new(-0.5, -0.5, 0.0),
                normal,
                Color::new(255, 0, 0),
                Vector2::new(0.0, 0.0),
            ),
            VertexData::new(
                Point3::new(0.5, -0.5, 0.0),
                normal,
                Color::new(0, 255, 0),
                Vector2::new(1.0, 0.0),
            ),
            VertexData::new(
                Point3::new(0.0, 0.5, 0.0),
                normal,
                Color::new(0, 0, 255),
                Vector2::new(0.5, 1.0),
            ),
        ];
        Self {
            vertices,
            indices: vec![0, 1, 2],
        }
    }

    /// A square of side `2 * half_size` in the y = 0 plane, facing +Y.
    pub fn plane(half_size: f32, color: Color) -> Result<Self> {
        if !(half_size > 0.0 && half_size.is_finite()) {
            return Err(RasterError::invalid_argument("half_size", format!("must be positive, got {half_size}")));
        }
        let s = half_size;
        let corners = [
            (Point3::new(-s, 0.0, s), Vector2::new(0.0, 0.0)),
            (Point3::new(s, 0.0, s), Vector2::new(1.0, 0.0)),
            (Point3::new(s, 0.0, -s), Vector2::new(1.0, 1.0)),
            (Point3::new(-s, 0.0, -s), Vector2::new(0.0, 1.0)),
        ];
        let vertices = corners
            .into_iter()
            .map(|(p, uv)| VertexData::new(p, Vector3::y(), color, uv))
            .collect();
        Self::new(vertices, vec![0, 1, 2, 0, 2, 3])
    }

    /// A unit-radius cone standing on the y = 0 plane with its apex at
    /// `(0, height, 0)`, closed by a base cap.
    ///
    /// The apex and base center take `palette[0]`; rim vertices alternate
    /// between `palette[1]` and `palette[2]`.
    pub fn cone(segments: u32, height: f32, palette: [Color; 3]) -> Result<Self> {
        check_segments("segments", segments)?;
        check_positive("height", height)?;
        check_vertex_count("segments", (segments as usize).checked_add(2))?;

        let mut vertices = vec![
            VertexData::new(Point3::new(0.0, height, 0.0), Vector3::y(), palette[0], Vector2::new(0.5, 1.0)),
            VertexData::new(Point3::origin(), -Vector3::y(), palette[0], Vector2::new(0.5, 0.0)),
        ];
        let (apex, base_center, rim_start) = (0u32, 1u32, 2u32);

        for i in 0..segments {
            let (sin, cos) = (i as f32 * TAU / segments as f32).sin_cos();
            vertices.push(VertexData::new(
                Point3::new(cos, 0.0, sin),
                Vector3::y(),
                palette[1 + (i % 2) as usize],
                Vector2::new(i as f32 / segments as f32, 0.0),
            ));
        }

        let mut indices = Vec::with_capacity(segments as usize * 6);
        for i in 0..segments {
            let current = rim_start + i;
            let next = rim_start + (i + 1) % segments;
            indices.extend_from_slice(&[base_center, current, next]);
            indices.extend_from_slice(&[apex, next, current]);
        }

        let mut mesh = Self::new(vertices, indices)?;
        mesh.calculate_normals();
        Ok(mesh)
    }

    /// A unit-radius cylinder from y = 0 to y = `height`, capped at both ends.
    ///
    /// Cap centers take `palette[0]`; the top and bottom rings take
    /// `palette[1]`; inner rings cycle through the whole palette.
    pub fn cylinder(radial_segments: u32, height_segments: u32, height: f32, palette: [Color; 3]) -> Result<Self> {
        check_segments("radial_segments", radial_segments)?;
        if height_segments < 1 {
            return Err(RasterError::invalid_argument("height_segments", "must be at least 1"));
        }
        check_positive("height", height)?;
        let (radial, rings) = (radial_segments as usize, height_segments as usize + 1);
        check_vertex_count(
            "radial_segments * height_segments",
            radial.checked_mul(rings).and_then(|n| n.checked_add(2)),
        )?;

        let mut vertices = vec![
            VertexData::new(Point3::origin(), -Vector3::y(), palette[0], Vector2::new(0.5, 0.0)),
            VertexData::new(Point3::new(0.0, height, 0.0), Vector3::y(), palette[0], Vector2::new(0.5, 1.0)),
        ];
        let (bottom_center, top_center, side_start) = (0u32, 1u32, 2u32);

        for h in 0..=height_segments {
            let t = h as f32 / height_segments as f32;
            let is_cap_ring = h == 0 || h == height_segments;
            for i in 0..radial_segments {
                let (sin, cos) = (i as f32 * TAU / radial_segments as f32).sin_cos();
                let color = if is_cap_ring {
                    palette[1]
                } else {
                    palette[((i + h) % 3) as usize]
                };
                vertices.push(VertexData::new(
                    Point3::new(cos, t * height, sin),
                    Vector3::y(),
                    color,
                    Vector2::new(i as f32 / radial_segments as f32, t),
                ));
            }
        }

        let ring = |h: u32, i: u32| side_start + h * radial_segments + i % radial_segments;
        let mut indices = Vec::with_capacity(radial * (2 * rings) * 3);

        for i in 0..radial_segments {
            indices.extend_from_slice(&[bottom_center, ring(0, i), ring(0, i + 1)]);
            indices.extend_from_slice(&[ring(height_segments, i), top_center, ring(height_segments, i + 1)]);
        }
        for h in 0..height_segments {
            for i in 0..radial_segments {
                let (v00, v10, v11, v01) = (ring(h, i), ring(h + 1, i), ring(h + 1, i + 1), ring(h, i + 1));
                indices.extend_from_slice(&[v00, v10, v11]);
                indices.extend_from_slice(&[v00, v11, v01]);
            }
        }

        let mut mesh = Self::new(vertices, indices)?;
        mesh.calculate_normals();
        Ok(mesh)
    }

    /// A torus around the Z axis with ring radius `major` and tube radius `minor`.
    ///
    /// Vertex colors form a checker over the palette.
    pub fn torus(major: f32, minor: f32, outer_segments: u32, inner_segments: u32, palette: [Color; 3]) -> Result<Self> {
        check_positive("major", major)?;
        check_positive("minor", minor)?;
        check_segments("outer_segments", outer_segments)?;
        check_segments("inner_segments", inner_segments)?;
        let vertex_count = check_vertex_count(
            "outer_segments * inner_segments",
            (outer_segments as usize).checked_mul(inner_segments as usize),
        )?;

        let mut vertices = Vec::with_capacity(vertex_count);
        for i in 0..outer_segments {
            let (sin_theta, cos_theta) = (i as f32 * TAU / outer_segments as f32).sin_cos();
            for j in 0..inner_segments {
                let (sin_phi, cos_phi) = (j as f32 * TAU / inner_segments as f32).sin_cos();
                let ring = major + minor * cos_phi;
                vertices.push(VertexData::new(
                    Point3::new(ring * cos_theta, ring * sin_theta, minor * sin_phi),
                    Vector3::y(),
                    palette[(i % 2 + j % 2) as usize],
                    Vector2::new(i as f32 / outer_segments as f32, j as f32 / inner_segments as f32),
                ));
            }
        }

        let at = |i: u32, j: u32| (i % outer_segments) * inner_segments + j % inner_segments;
        let mut indices = Vec::with_capacity(vertex_count * 6);
        for i in 0..outer_segments {
            for j in 0..inner_segments {
                let (i00, i10, i11, i01) = (at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1));
                indices.extend_from_slice(&[i00, i10, i11]);
                indices.extend_from_slice(&[i00, i11, i01]);
            }
        }

        let mut mesh = Self::new(vertices, indices)?;
        mesh.calculate_normals();
        Ok(mesh)
    }
}

fn check_segments(name: &'static str, segments: u32) -> Result<()> {
    if segments < 3 {
        return Err(RasterError::invalid_argument(name, format!("needs at least 3 segments, got {segments}")));
    }
    Ok(())
}

fn check_vertex_count(name: &'static str, count: Option<usize>) -> Result<usize> {
    match count {
        Some(count) if count <= MAX_GENERATED_VERTICES => Ok(count),
        _ => Err(RasterError::invalid_argument(
            name,
            format!("would generate more than {MAX_GENERATED_VERTICES} vertices"),
        )),
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(RasterError::invalid_argument(name, format!("must be positive and finite, got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(tri: &[VertexData; 3]) -> Vector3<f32> {
        (tri[0].position.coords + tri[1].position.coords + tri[2].position.coords) / 3.0
    }

    fn face_normal(tri: &[VertexData; 3]) -> Vector3<f32> {
        (tri[1].position - tri[0].position).cross(&(tri[2].position - tri[0].position))
    }

    #[test]
    fn test_new_rejects_bad_indices() {
        let verts = Mesh::triangle().vertices;
        assert!(matches!(Mesh::new(verts.clone(), vec![0, 1]), Err(RasterError::InvalidMesh(_))));
        assert!(matches!(Mesh::new(verts.clone(), vec![0, 1, 3]), Err(RasterError::InvalidMesh(_))));
        assert!(Mesh::new(verts, vec![0, 1, 2, 2, 1, 0]).is_ok());
    }

    #[test]
    fn test_calculate_normals_averages_faces() {
        let mut mesh = Mesh::plane(1.0, Color::WHITE).unwrap();
        for v in &mut mesh.vertices {
            v.normal = Vector3::zeros();
        }
        mesh.calculate_normals();
        for v in &mesh.vertices {
            assert!((v.normal - Vector3::y()).norm() < 1e-6);
        }
    }

    #[test]
    fn test_calculate_normals_fallback_for_unused_vertex() {
        let mut verts = Mesh::triangle().vertices;
        verts.push(VertexData::with_color(Point3::new(5.0, 5.0, 5.0), Color::WHITE));
        verts[3].normal = Vector3::x();
        let mut mesh = Mesh::new(verts, vec![0, 1, 2]).unwrap();
        mesh.calculate_normals();
        assert_eq!(mesh.vertices[3].normal, Vector3::y());
        assert!((mesh.vertices[0].normal - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_generators_validate_parameters() {
        let palette = [Color::WHITE; 3];
        assert!(Mesh::cone(2, 1.0, palette).is_err());
        assert!(Mesh::cone(8, 0.0, palette).is_err());
        assert!(Mesh::cylinder(8, 0, 1.0, palette).is_err());
        assert!(Mesh::torus(1.0, -0.2, 8, 8, palette).is_err());
        assert!(Mesh::torus(1.0, 0.2, 8, 2, palette).is_err());
        assert!(Mesh::plane(f32::NAN, Color::WHITE).is_err());
    }

    #[test]
    fn test_generators_reject_huge_segment_counts() {
        let palette = [Color::WHITE; 3];
        assert!(matches!(
            Mesh::cone(u32::MAX, 1.0, palette),
            Err(RasterError::InvalidArgument { .. })
        ));
        assert!(Mesh::cylinder(70_000, 70_000, 1.0, palette).is_err());
        assert!(Mesh::cylinder(u32::MAX, u32::MAX, 1.0, palette).is_err());
        assert!(Mesh::torus(1.0, 0.25, 100_000, 100_000, palette).is_err());
        assert!(Mesh::torus(1.0, 0.25, 64, 32, palette).is_ok());
    }

    #[test]
    fn test_generator_counts() {
        let palette = [Color::WHITE; 3];
        let cone = Mesh::cone(12, 2.0, palette).unwrap();
        assert_eq!(cone.vertices.len(), 14);
        assert_eq!(cone.triangle_count(), 24);

        let cyl = Mesh::cylinder(10, 3, 1.0, palette).unwrap();
        assert_eq!(cyl.vertices.len(), 2 + 10 * 4);
        assert_eq!(cyl.triangle_count(), 10 * 2 + 10 * 3 * 2);

        let torus = Mesh::torus(1.0, 0.3, 16, 8, palette).unwrap();
        assert_eq!(torus.vertices.len(), 128);
        assert_eq!(torus.triangle_count(), 256);
    }

    #[test]
    fn test_torus_faces_point_outward() {
        let (major, minor) = (1.0, 0.3);
        let torus = Mesh::torus(major, minor, 24, 12, [Color::WHITE; 3]).unwrap();
        for tri in torus.triangles() {
            let c = centroid(&tri);
            // nearest point on the tube's center ring
            let ring_dir = Vector3::new(c.x, c.y, 0.0).normalize();
            let outward = c - ring_dir * major;
            assert!(face_normal(&tri).dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_cylinder_side_faces_point_outward() {
        let cyl = Mesh::cylinder(16, 2, 2.0, [Color::WHITE; 3]).unwrap();
        for tri in cyl.triangles() {
            let c = centroid(&tri);
            let n = face_normal(&tri);
            let outward = if c.y.abs() < 1e-4 {
                -Vector3::y()
            } else if (c.y - 2.0).abs() < 1e-4 {
                Vector3::y()
            } else {
                Vector3::new(c.x, 0.0, c.z)
            };
            assert!(n.dot(&outward) > 0.0, "inward face at {c:?}");
        }
    }

    #[test]
    fn test_cone_faces_point_outward() {
        let cone = Mesh::cone(16, 1.5, [Color::WHITE; 3]).unwrap();
        for tri in cone.triangles() {
            let c = centroid(&tri);
            let outward = if c.y.abs() < 1e-4 {
                -Vector3::y()
            } else {
                Vector3::new(c.x, 0.0, c.z)
            };
            assert!(face_normal(&tri).dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_randomize_colors_is_deterministic() {
        let mut a = Mesh::plane(1.0, Color::BLACK).unwrap();
        let mut b = a.clone();
        a.randomize_colors(7);
        b.randomize_colors(7);
        assert_eq!(a, b);
        assert_eq!(a.vertices[0].color, Color::from_seed(7));
    }
}
