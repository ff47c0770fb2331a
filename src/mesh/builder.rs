//! Mesh construction utilities.
//!
//! This module provides functions for building polygon meshes from
//! face-vertex lists as commonly found in mesh file formats.

use nalgebra::Point3;

use super::index::MeshIndex;
use super::polygon::Polygon;
use super::polymesh::PolyMesh;
use crate::error::{MeshError, Result};

/// Build a polygon mesh from vertices and triangle faces.
///
/// # Example
/// ```
/// use uvseam::mesh::{build_from_triangles, PolyMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: PolyMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_polygons(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<PolyMesh<I>> {
    build(vertices, faces.iter().map(|f| &f[..]), faces.len())
}

/// Build a polygon mesh from vertices and quad faces (counter-clockwise).
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<PolyMesh<I>> {
    build(vertices, faces.iter().map(|f| &f[..]), faces.len())
}

/// Build a polygon mesh from vertices and a mix of triangles and quads.
///
/// Each face lists 3 or 4 vertex indices; any other count is rejected with
/// [`MeshError::UnsupportedPolygon`].
///
/// # Example
/// ```
/// use uvseam::mesh::{build_from_polygons, PolyMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(2.0, 0.5, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
///
/// let mesh: PolyMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_quads(), 1);
/// assert_eq!(mesh.num_triangles(), 1);
/// ```
pub fn build_from_polygons<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
) -> Result<PolyMesh<I>> {
    build(vertices, faces.iter().map(Vec::as_slice), faces.len())
}

fn build<'a, I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: impl Iterator<Item = &'a [usize]>,
    num_faces: usize,
) -> Result<PolyMesh<I>> {
    if num_faces == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let mut mesh = PolyMesh::with_capacity(vertices.len(), num_faces);
    for &pos in vertices {
        mesh.add_vertex(pos);
    }

    for (fi, face) in faces.enumerate() {
        // Validate before the indices are narrowed to the mesh index type
        if let Some(&vi) = face.iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { polygon: fi, vertex: vi });
        }
        let polygon = Polygon::from_indices(face).ok_or(MeshError::UnsupportedPolygon {
            polygon: fi,
            corners: face.len(),
        })?;
        mesh.add_polygon(polygon)?;
    }

    Ok(mesh)
}

/// Convert a polygon mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) where each face has 3 or 4 indices.
pub fn to_face_vertex<I: MeshIndex>(mesh: &PolyMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let faces = mesh
        .polygons()
        .map(|(_, p)| p.vertices().iter().map(|v| v.index()).collect())
        .collect();

    (mesh.positions.clone(), faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_quads() -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
        // Two quads sharing an edge (1-2)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2, 3], [1, 4, 5, 2]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh: PolyMesh<u32> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_polygons(), 1);
        assert!(mesh.is_triangle_mesh());
    }

    #[test]
    fn test_two_quads() {
        let (vertices, faces) = two_quads();
        let mesh: PolyMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_polygons(), 2);
        assert!(mesh.is_quad_mesh());
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_quads();
        let mesh: PolyMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices, out_verts);
        assert_eq!(out_faces, vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]]);
    }

    #[test]
    fn test_empty_faces() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let result: Result<PolyMesh<u32>> = build_from_triangles(&vertices, &[]);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]]; // Indices 1 and 2 are invalid

        let result: Result<PolyMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { polygon: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_quad_degenerate_face() {
        let (vertices, _) = two_quads();
        // Degenerate: v0 == v2 (diagonal vertices the same)
        let faces = vec![[0, 1, 0, 3]];

        let result: Result<PolyMesh<u32>> = build_from_quads(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::DegenerateFace { polygon: 0 })));
    }

    #[test]
    fn test_ngon_rejected() {
        let (vertices, _) = two_quads();
        let faces = vec![vec![0, 1, 4, 5, 2]];

        let result: Result<PolyMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedPolygon { polygon: 0, corners: 5 })
        ));
    }
}
