//! Polygon mesh storage.
//!
//! A [`PolyMesh`] is a flat list of vertex positions plus a flat list of
//! triangles and quads. It carries no adjacency of its own; build a
//! [`TopologyIndex`](crate::topology::TopologyIndex) for that.

use nalgebra::{Point3, Vector3};

use super::index::{MeshIndex, PolygonId, VertexId};
use super::polygon::Polygon;
use crate::error::{MeshError, Result};

/// A mesh of triangles and quads.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyMesh<I: MeshIndex = u32> {
    /// All vertex positions.
    pub(crate) positions: Vec<Point3<f64>>,

    /// All polygons.
    pub(crate) polygons: Vec<Polygon<I>>,
}

impl<I: MeshIndex> Default for PolyMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> PolyMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            polygons: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_polygons: usize) -> Self {
        Self {
            positions: Vec::with_capacity(num_vertices),
            polygons: Vec::with_capacity(num_polygons),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of polygons.
    #[inline]
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// Get the number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.polygons.iter().filter(|p| p.is_triangle()).count()
    }

    /// Get the number of quads.
    pub fn num_quads(&self) -> usize {
        self.num_polygons() - self.num_triangles()
    }

    /// Whether the mesh is empty of polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Whether every polygon is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.polygons.iter().all(|p| p.is_triangle())
    }

    /// Whether every polygon is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.polygons.iter().all(|p| !p.is_triangle())
    }

    /// Get a polygon by ID.
    #[inline]
    pub fn polygon(&self, id: PolygonId<I>) -> &Polygon<I> {
        &self.polygons[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.positions[v.index()] = pos;
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.positions.len()).map(VertexId::new)
    }

    /// Iterate over all polygon IDs.
    pub fn polygon_ids(&self) -> impl Iterator<Item = PolygonId<I>> + '_ {
        (0..self.polygons.len()).map(PolygonId::new)
    }

    /// Iterate over all polygons with their IDs.
    pub fn polygons(&self) -> impl Iterator<Item = (PolygonId<I>, &Polygon<I>)> + '_ {
        self.polygons
            .iter()
            .enumerate()
            .map(|(i, p)| (PolygonId::new(i), p))
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a polygon.
    ///
    /// Uses Newell's method, which handles non-planar quads. Returns the zero
    /// vector for zero-area polygons.
    pub fn polygon_normal(&self, p: PolygonId<I>) -> Vector3<f64> {
        let n = self.polygon_area_vector(p);
        let len = n.norm();
        if len > 1e-12 {
            n / len
        } else {
            Vector3::zeros()
        }
    }

    /// Compute the area of a polygon.
    pub fn polygon_area(&self, p: PolygonId<I>) -> f64 {
        self.polygon_area_vector(p).norm()
    }

    /// Area-weighted normal: direction is the normal, length is the area.
    pub fn polygon_area_vector(&self, p: PolygonId<I>) -> Vector3<f64> {
        let verts = self.polygon(p).vertices();
        let mut n = Vector3::zeros();
        for i in 0..verts.len() {
            let a = self.position(verts[i]);
            let b = self.position(verts[(i + 1) % verts.len()]);
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        n * 0.5
    }

    /// Compute the centroid of a polygon.
    pub fn polygon_centroid(&self, p: PolygonId<I>) -> Point3<f64> {
        let verts = self.polygon(p).vertices();
        let sum = verts
            .iter()
            .fold(Vector3::zeros(), |acc, &v| acc + self.position(v).coords);
        Point3::from(sum / verts.len() as f64)
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.positions.len());
        self.positions.push(position);
        id
    }

    /// Add a polygon after checking its vertex indices.
    pub fn add_polygon(&mut self, polygon: Polygon<I>) -> Result<PolygonId<I>> {
        let id = PolygonId::new(self.polygons.len());
        for &v in polygon.vertices() {
            if v.index() >= self.positions.len() {
                return Err(MeshError::InvalidVertexIndex {
                    polygon: id.index(),
                    vertex: v.index(),
                });
            }
        }
        if polygon.is_degenerate() {
            return Err(MeshError::DegenerateFace { polygon: id.index() });
        }
        self.polygons.push(polygon);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> PolyMesh<u32> {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_polygon(Polygon::quad(a, b, c, d)).unwrap();
        mesh
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = PolyMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_polygons(), 0);
        assert!(mesh.is_empty());
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_quad_geometry() {
        let mesh = unit_quad();
        let p = PolygonId::new(0);

        assert!((mesh.polygon_area(p) - 1.0).abs() < 1e-10);

        let normal = mesh.polygon_normal(p);
        assert!((normal.z - 1.0).abs() < 1e-10);

        let centroid = mesh.polygon_centroid(p);
        assert!((centroid.x - 0.5).abs() < 1e-10);
        assert!((centroid.y - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_counts() {
        let mut mesh = unit_quad();
        let e = mesh.add_vertex(Point3::new(2.0, 0.5, 0.0));
        mesh.add_polygon(Polygon::triangle(VertexId::new(1), e, VertexId::new(2)))
            .unwrap();

        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.num_quads(), 1);
        assert!(!mesh.is_triangle_mesh());
        assert!(!mesh.is_quad_mesh());
    }

    #[test]
    fn test_add_polygon_rejects_bad_input() {
        let mut mesh = unit_quad();
        let bad = Polygon::triangle(VertexId::new(0), VertexId::new(1), VertexId::new(17));
        assert!(matches!(
            mesh.add_polygon(bad),
            Err(MeshError::InvalidVertexIndex { vertex: 17, .. })
        ));

        let degenerate = Polygon::quad(
            VertexId::new(0),
            VertexId::new(1),
            VertexId::new(1),
            VertexId::new(2),
        );
        assert!(matches!(
            mesh.add_polygon(degenerate),
            Err(MeshError::DegenerateFace { polygon: 1 })
        ));
        assert_eq!(mesh.num_polygons(), 1);
    }
}
