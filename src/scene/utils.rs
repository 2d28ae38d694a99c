use crate::scene::mesh::Mesh;
use nalgebra::Point3;

/// Half-extent a normalized mesh is scaled to fit into.
const FIT_HALF_EXTENT: f32 = 0.9;

/// Analyzes the mesh's bounding box and transforms all vertices
/// so that the mesh is centered at (0,0,0) and fits within `[-0.9, 0.9]`.
///
/// Returns the original center and the scaling factor used.
pub fn normalize_and_center_mesh(mesh: &mut Mesh) -> (Point3<f32>, f32) {
    if mesh.vertices.is_empty() {
        return (Point3::origin(), 1.0);
    }

    let mut min_bound = Point3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut max_bound = Point3::new(f32::MIN, f32::MIN, f32::MIN);
    for vertex in &mesh.vertices {
        min_bound = min_bound.inf(&vertex.position);
        max_bound = max_bound.sup(&vertex.position);
    }

    let center = nalgebra::center(&min_bound, &max_bound);
    let extent = max_bound - min_bound;
    let max_dimension = extent.x.max(extent.y).max(extent.z);

    let scale_factor = if max_dimension > 1e-6 {
        2.0 * FIT_HALF_EXTENT / max_dimension
    } else {
        1.0
    };

    for vertex in &mut mesh.vertices {
        vertex.position = Point3::from((vertex.position - center) * scale_factor);
    }

    (center, scale_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use crate::core::geometry::VertexData;

    #[test]
    fn test_normalize_and_center_mesh() {
        let verts = vec![
            VertexData::with_color(Point3::new(10.0, 0.0, 0.0), Color::WHITE),
            VertexData::with_color(Point3::new(14.0, 2.0, 0.0), Color::WHITE),
            VertexData::with_color(Point3::new(10.0, 2.0, 1.0), Color::WHITE),
        ];
        let mut mesh = Mesh::new(verts, vec![0, 1, 2]).unwrap();
        let (center, scale) = normalize_and_center_mesh(&mut mesh);

        assert_eq!(center, Point3::new(12.0, 1.0, 0.5));
        assert!((scale - 0.45).abs() < 1e-6);
        let xs: Vec<f32> = mesh.vertices.iter().map(|v| v.position.x).collect();
        assert!((xs[0] + 0.9).abs() < 1e-5);
        assert!((xs[1] - 0.9).abs() < 1e-5);
    }
}
