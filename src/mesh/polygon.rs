//! Triangle and quad polygons with fixed corner slots.

use super::index::{MeshIndex, VertexId, SLOTS_PER_POLYGON};

/// A triangle or quad stored as four corner slots `a b c d`.
///
/// Triangles repeat their third vertex in the fourth slot (`d == c`), the
/// convention used by polygon-modelling hosts. Corner order is the winding
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Polygon<I: MeshIndex = u32> {
    corners: [VertexId<I>; SLOTS_PER_POLYGON],
}

impl<I: MeshIndex> Polygon<I> {
    /// Create a triangle.
    pub fn triangle(a: VertexId<I>, b: VertexId<I>, c: VertexId<I>) -> Self {
        Self {
            corners: [a, b, c, c],
        }
    }

    /// Create a quad.
    pub fn quad(a: VertexId<I>, b: VertexId<I>, c: VertexId<I>, d: VertexId<I>) -> Self {
        Self {
            corners: [a, b, c, d],
        }
    }

    /// Create a polygon from raw vertex indices (3 or 4 of them).
    ///
    /// Returns `None` for any other corner count.
    pub fn from_indices(indices: &[usize]) -> Option<Self> {
        match *indices {
            [a, b, c] => Some(Self::triangle(a.into(), b.into(), c.into())),
            [a, b, c, d] => Some(Self::quad(a.into(), b.into(), c.into(), d.into())),
            _ => None,
        }
    }

    /// Whether this polygon is a triangle (third and fourth slots coincide).
    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.corners[2] == self.corners[3]
    }

    /// Number of distinct corners: 3 or 4.
    #[inline]
    pub fn corner_count(&self) -> usize {
        if self.is_triangle() {
            3
        } else {
            4
        }
    }

    /// The vertex in corner slot `i`.
    #[inline]
    pub fn corner(&self, i: usize) -> VertexId<I> {
        self.corners[i]
    }

    /// All four corner slots, including the duplicate slot of a triangle.
    #[inline]
    pub fn slots(&self) -> [VertexId<I>; SLOTS_PER_POLYGON] {
        self.corners
    }

    /// The distinct corners in winding order.
    #[inline]
    pub fn vertices(&self) -> &[VertexId<I>] {
        &self.corners[..self.corner_count()]
    }

    /// Slot of the first corner referencing `v`, scanning `a b c d`.
    pub fn find(&self, v: VertexId<I>) -> Option<usize> {
        self.corners.iter().position(|&c| c == v)
    }

    /// Local corner index of `v`, safe to use for per-corner attribute lookup.
    ///
    /// A triangle has no fourth corner of its own, so a hit on slot 3 is
    /// remapped to slot 2.
    pub fn local_corner(&self, v: VertexId<I>) -> Option<usize> {
        match self.find(v) {
            Some(3) if self.is_triangle() => Some(2),
            found => found,
        }
    }

    /// Number of logical edges: 3 or 4.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.corner_count()
    }

    /// The two vertices of edge `slot`, in winding order.
    ///
    /// For triangles slot 2 is the closing `c -> a` edge and slot 3 aliases it.
    pub fn edge(&self, slot: usize) -> (VertexId<I>, VertexId<I>) {
        debug_assert!(slot < SLOTS_PER_POLYGON);
        if self.is_triangle() && slot >= 2 {
            (self.corners[2], self.corners[0])
        } else {
            (self.corners[slot], self.corners[(slot + 1) % SLOTS_PER_POLYGON])
        }
    }

    /// Iterate over the logical edges as `(slot, v0, v1)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, VertexId<I>, VertexId<I>)> + '_ {
        (0..self.edge_count()).map(move |slot| {
            let (v0, v1) = self.edge(slot);
            (slot, v0, v1)
        })
    }

    /// Slot of the edge joining `v0` and `v1`, in either direction.
    pub fn find_edge(&self, v0: VertexId<I>, v1: VertexId<I>) -> Option<usize> {
        self.edges()
            .find(|&(_, a, b)| (a == v0 && b == v1) || (a == v1 && b == v0))
            .map(|(slot, _, _)| slot)
    }

    /// Whether any two distinct corners share a vertex.
    pub fn is_degenerate(&self) -> bool {
        let verts = self.vertices();
        (0..verts.len()).any(|i| verts[i + 1..].contains(&verts[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VertexId<u32> {
        VertexId::new(i)
    }

    #[test]
    fn test_triangle_duplicates_last_corner() {
        let tri = Polygon::triangle(v(4), v(5), v(6));
        assert!(tri.is_triangle());
        assert_eq!(tri.corner_count(), 3);
        assert_eq!(tri.corner(3), v(6));
        assert_eq!(tri.vertices(), &[v(4), v(5), v(6)]);
    }

    #[test]
    fn test_quad_corners() {
        let quad = Polygon::quad(v(0), v(1), v(2), v(3));
        assert!(!quad.is_triangle());
        assert_eq!(quad.corner_count(), 4);
        assert_eq!(quad.find(v(3)), Some(3));
        assert_eq!(quad.local_corner(v(3)), Some(3));
        assert_eq!(quad.find(v(9)), None);
    }

    #[test]
    fn test_triangle_local_corner_never_exceeds_two() {
        let tri = Polygon::triangle(v(0), v(1), v(2));
        for vertex in [v(0), v(1), v(2)] {
            let corner = tri.local_corner(vertex).unwrap();
            assert!(corner <= 2);
        }
        assert_eq!(tri.local_corner(v(2)), Some(2));
    }

    #[test]
    fn test_triangle_edges() {
        let tri = Polygon::triangle(v(0), v(1), v(2));
        let edges: Vec<_> = tri.edges().collect();
        assert_eq!(edges, vec![(0, v(0), v(1)), (1, v(1), v(2)), (2, v(2), v(0))]);
        // Slot 3 aliases the closing edge
        assert_eq!(tri.edge(3), tri.edge(2));
    }

    #[test]
    fn test_quad_edges() {
        let quad = Polygon::quad(v(0), v(1), v(2), v(3));
        assert_eq!(quad.edge(3), (v(3), v(0)));
        assert_eq!(quad.find_edge(v(0), v(3)), Some(3));
        assert_eq!(quad.find_edge(v(2), v(1)), Some(1));
        assert_eq!(quad.find_edge(v(0), v(2)), None);
    }

    #[test]
    fn test_from_indices() {
        assert!(Polygon::<u32>::from_indices(&[0, 1, 2]).unwrap().is_triangle());
        assert!(!Polygon::<u32>::from_indices(&[0, 1, 2, 3]).unwrap().is_triangle());
        assert!(Polygon::<u32>::from_indices(&[0, 1]).is_none());
        assert!(Polygon::<u32>::from_indices(&[0, 1, 2, 3, 4]).is_none());
    }

    #[test]
    fn test_degenerate() {
        assert!(Polygon::quad(v(0), v(1), v(0), v(3)).is_degenerate());
        assert!(Polygon::triangle(v(0), v(0), v(1)).is_degenerate());
        assert!(!Polygon::triangle(v(0), v(1), v(2)).is_degenerate());
    }
}
