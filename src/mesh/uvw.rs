//! Per-corner UVW coordinate storage.
//!
//! UVs live on polygon corners, not on vertices: the same vertex can carry a
//! different coordinate in each polygon that references it. That is exactly
//! what makes an interior edge a UV seam.

use std::marker::PhantomData;

use nalgebra::{Point2, Point3};

use super::index::{MeshIndex, PolygonId, SLOTS_PER_POLYGON};
use super::polymesh::PolyMesh;
use crate::error::{MeshError, Result};

/// A UVW coordinate. `w` is normally zero.
pub type Uvw = Point3<f64>;

/// UVW coordinates for every corner of every polygon.
///
/// Each polygon owns four slots matching its corner slots; a triangle's
/// fourth slot mirrors the third.
#[derive(Debug, Clone, PartialEq)]
pub struct UvTag<I: MeshIndex = u32> {
    corners: Vec<[Uvw; SLOTS_PER_POLYGON]>,
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> UvTag<I> {
    /// Create a tag from per-polygon corner coordinates.
    pub fn new(corners: Vec<[Uvw; SLOTS_PER_POLYGON]>) -> Self {
        Self {
            corners,
            _marker: PhantomData,
        }
    }

    /// Create a tag with every corner at the origin.
    pub fn zeros(num_polygons: usize) -> Self {
        Self::new(vec![[Uvw::origin(); SLOTS_PER_POLYGON]; num_polygons])
    }

    /// Create a tag from one UV per vertex.
    ///
    /// Every corner referencing a vertex gets that vertex's UV, so the result
    /// has no seams. Useful as a starting point before cutting seams by hand.
    pub fn from_vertex_uvs(mesh: &PolyMesh<I>, uvs: &[Point2<f64>]) -> Result<Self> {
        if uvs.len() != mesh.num_vertices() {
            return Err(MeshError::invalid_param(
                "uvs",
                uvs.len(),
                "need exactly one UV per vertex",
            ));
        }

        let corners = mesh
            .polygons()
            .map(|(_, p)| {
                p.slots().map(|v| {
                    let uv = uvs[v.index()];
                    Uvw::new(uv.x, uv.y, 0.0)
                })
            })
            .collect();

        Ok(Self::new(corners))
    }

    /// Get the number of polygons covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Get the coordinate at a polygon corner slot.
    #[inline]
    pub fn get(&self, p: PolygonId<I>, corner: usize) -> Uvw {
        self.corners[p.index()][corner]
    }

    /// Get all four corner slots of a polygon.
    #[inline]
    pub fn polygon(&self, p: PolygonId<I>) -> &[Uvw; SLOTS_PER_POLYGON] {
        &self.corners[p.index()]
    }

    /// Set the coordinate at a polygon corner slot.
    #[inline]
    pub fn set(&mut self, p: PolygonId<I>, corner: usize, uvw: Uvw) {
        self.corners[p.index()][corner] = uvw;
    }

    /// Set a polygon's corners from 3 (triangle) or 4 (quad) coordinates.
    ///
    /// For three coordinates the fourth slot mirrors the third.
    pub fn set_polygon(&mut self, p: PolygonId<I>, uvws: &[Uvw]) -> Result<()> {
        let slots = match *uvws {
            [a, b, c] => [a, b, c, c],
            [a, b, c, d] => [a, b, c, d],
            _ => {
                return Err(MeshError::invalid_param(
                    "uvws",
                    uvws.len(),
                    "expected 3 or 4 coordinates",
                ))
            }
        };
        self.corners[p.index()] = slots;
        Ok(())
    }

    /// Check that this tag covers `mesh` one polygon to one entry.
    pub fn check_covers(&self, mesh: &PolyMesh<I>) -> Result<()> {
        if self.len() != mesh.num_polygons() {
            return Err(MeshError::UvCountMismatch {
                polygons: mesh.num_polygons(),
                uvs: self.len(),
            });
        }
        Ok(())
    }

    /// Compute the bounding box of the UV (not W) coordinates.
    ///
    /// Returns `None` if the tag is empty.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let mut iter = self.corners.iter().flatten();
        let first = iter.next()?;
        let mut min = Point2::new(first.x, first.y);
        let mut max = min;

        for uvw in iter {
            min.x = min.x.min(uvw.x);
            min.y = min.y.min(uvw.y);
            max.x = max.x.max(uvw.x);
            max.y = max.y.max(uvw.y);
        }

        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;

    fn quad_and_triangle() -> PolyMesh<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        build_from_polygons(&vertices, &[vec![0, 1, 2, 3], vec![1, 4, 2]]).unwrap()
    }

    #[test]
    fn test_from_vertex_uvs() {
        let mesh = quad_and_triangle();
        let uvs: Vec<Point2<f64>> = mesh
            .vertex_ids()
            .map(|v| Point2::new(v.index() as f64, 0.5))
            .collect();
        let tag = UvTag::from_vertex_uvs(&mesh, &uvs).unwrap();

        assert_eq!(tag.len(), 2);
        let tri = PolygonId::new(1);
        assert_eq!(tag.get(tri, 1), Uvw::new(4.0, 0.5, 0.0));
        // Triangle's fourth slot mirrors its third
        assert_eq!(tag.get(tri, 3), tag.get(tri, 2));
    }

    #[test]
    fn test_from_vertex_uvs_wrong_length() {
        let mesh = quad_and_triangle();
        let result = UvTag::from_vertex_uvs(&mesh, &[Point2::origin()]);
        assert!(matches!(result, Err(MeshError::InvalidParameter { .. })));
    }

    #[test]
    fn test_set_polygon() {
        let mut tag: UvTag<u32> = UvTag::zeros(1);
        let p = PolygonId::new(0);
        let a = Uvw::new(0.0, 0.0, 0.0);
        let b = Uvw::new(1.0, 0.0, 0.0);
        let c = Uvw::new(0.0, 1.0, 0.0);

        tag.set_polygon(p, &[a, b, c]).unwrap();
        assert_eq!(tag.polygon(p), &[a, b, c, c]);
        assert!(tag.set_polygon(p, &[a, b]).is_err());
    }

    #[test]
    fn test_check_covers() {
        let mesh = quad_and_triangle();
        assert!(UvTag::zeros(2).check_covers(&mesh).is_ok());
        assert!(matches!(
            UvTag::zeros(1).check_covers(&mesh),
            Err(MeshError::UvCountMismatch { polygons: 2, uvs: 1 })
        ));
    }

    #[test]
    fn test_bounding_box() {
        let mut tag: UvTag<u32> = UvTag::zeros(1);
        tag.set(PolygonId::new(0), 1, Uvw::new(2.0, -1.0, 5.0));
        let (min, max) = tag.bounding_box().unwrap();
        assert_eq!(min, Point2::new(0.0, -1.0));
        assert_eq!(max, Point2::new(2.0, 0.0));
        assert!(UvTag::<u32>::zeros(0).bounding_box().is_none());
    }
}
