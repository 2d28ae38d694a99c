use crate::core::color::Color;
use crate::core::geometry::VertexData;
use crate::error::{RasterError, Result};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file and merges all of its models into one white mesh.
///
/// Faces are triangulated and position/normal/UV indices unified. Models
/// without normals get smooth normals from face connectivity.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading OBJ file: {:?}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    // materials are ignored; objects are colored by palette or texture
    let (models, _materials) = tobj::load_obj(path, &load_options).map_err(|source| RasterError::ObjLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut missing_normals = false;

    for model in models {
        let mesh = &model.mesh;
        let index_offset = vertices.len() as u32;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_texcoords = mesh.texcoords.len() / 2 == num_vertices;

        if !has_normals {
            warn!("Mesh '{}' is missing normals; recomputing them.", model.name);
            missing_normals = true;
        }

        for i in 0..num_vertices {
            let position = Point3::new(mesh.positions[i * 3], mesh.positions[i * 3 + 1], mesh.positions[i * 3 + 2]);
            let normal = if has_normals {
                Vector3::new(mesh.normals[i * 3], mesh.normals[i * 3 + 1], mesh.normals[i * 3 + 2])
            } else {
                Vector3::y()
            };
            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(VertexData::new(position, normal, Color::WHITE, texcoord));
        }

        indices.extend(mesh.indices.iter().map(|index| index + index_offset));
    }

    let mut mesh = Mesh::new(vertices, indices)?;
    if missing_normals {
        mesh.calculate_normals();
    }

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total triangles: {}",
        mesh.vertices.len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_obj_without_normals() {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        writeln!(
            file,
            "v -1 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 -1\nvt 0 0\nvt 1 0\nvt 0.5 1\nvt 0.5 0.5\nf 1/1 2/2 3/3\nf 1/1 3/3 4/4"
        )
        .unwrap();

        let mesh = load_obj(file.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.color == Color::WHITE));
        // the first face points along +Z
        assert!(mesh.vertices[1].normal.z > 0.99);
    }

    #[test]
    fn test_load_obj_quad_is_triangulated() {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        writeln!(file, "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1").unwrap();

        let mesh = load_obj(file.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.normal == Vector3::z()));
    }

    #[test]
    fn test_load_missing_obj() {
        assert!(matches!(load_obj("missing/model.obj"), Err(RasterError::ObjLoad { .. })));
    }
}
