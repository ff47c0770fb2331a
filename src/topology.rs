//! Edge-to-polygon adjacency.
//!
//! [`TopologyIndex`] is a read-only view over a [`PolyMesh`] snapshot that
//! answers "which polygons share edge (v0, v1)?" in O(1) amortized time.
//! Rebuild it whenever the mesh topology changes.

use std::collections::HashMap;

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeAddress, EdgeKey, MeshIndex, PolyMesh, PolygonId, VertexId};

/// The polygons incident to an edge of a manifold mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePolygons<I: MeshIndex = u32> {
    /// The first polygon (in mesh order) that uses the edge.
    pub first: PolygonId<I>,
    /// The second polygon, or `None` for a boundary edge.
    pub second: Option<PolygonId<I>>,
}

impl<I: MeshIndex> EdgePolygons<I> {
    /// Whether the edge has a single incident polygon.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.second.is_none()
    }
}

#[derive(Debug, Clone)]
struct EdgeRecord<I: MeshIndex> {
    key: EdgeKey<I>,
    /// One address per incident polygon, in mesh order.
    uses: Vec<EdgeAddress<I>>,
}

/// Adjacency from canonical edge keys to incident polygons.
///
/// Non-manifold edges (more than two incident polygons) are kept; queries on
/// them return [`MeshError::NonManifoldEdge`] instead of picking two.
///
/// # Example
///
/// ```
/// use uvseam::mesh::{build_from_quads, PolyMesh, VertexId};
/// use uvseam::topology::TopologyIndex;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(2.0, 1.0, 0.0),
/// ];
/// let mesh: PolyMesh = build_from_quads(&vertices, &[[0, 1, 2, 3], [1, 4, 5, 2]]).unwrap();
/// let topology = TopologyIndex::build(&mesh);
///
/// assert_eq!(topology.edge_count(), 7);
/// let shared = topology.incident_polygons(VertexId::new(2), VertexId::new(1)).unwrap();
/// assert!(!shared.is_boundary());
/// ```
#[derive(Debug, Clone)]
pub struct TopologyIndex<I: MeshIndex = u32> {
    /// Distinct edges in first-seen order.
    edges: Vec<EdgeRecord<I>>,
    lookup: HashMap<EdgeKey<I>, usize>,
}

impl<I: MeshIndex> TopologyIndex<I> {
    /// Build the index by scanning every logical edge of every polygon.
    pub fn build(mesh: &PolyMesh<I>) -> Self {
        // Closed quad meshes have about two edges per polygon
        let capacity = mesh.num_polygons() * 2 + 4;
        let mut edges: Vec<EdgeRecord<I>> = Vec::with_capacity(capacity);
        let mut lookup: HashMap<EdgeKey<I>, usize> = HashMap::with_capacity(capacity);

        for (pid, polygon) in mesh.polygons() {
            for (slot, v0, v1) in polygon.edges() {
                let key = EdgeKey::new(v0, v1);
                let address = EdgeAddress::new(pid, slot);
                let idx = *lookup.entry(key).or_insert_with(|| {
                    edges.push(EdgeRecord {
                        key,
                        uses: Vec::with_capacity(2),
                    });
                    edges.len() - 1
                });
                edges[idx].uses.push(address);
            }
        }

        Self { edges, lookup }
    }

    /// Get the polygons incident to the edge between `v0` and `v1`.
    pub fn incident_polygons(&self, v0: VertexId<I>, v1: VertexId<I>) -> Result<EdgePolygons<I>> {
        self.incident(EdgeKey::new(v0, v1))
    }

    /// Get the polygons incident to an edge.
    ///
    /// Fails with [`MeshError::UnknownEdge`] if the key is not an edge of the
    /// mesh and [`MeshError::NonManifoldEdge`] if more than two polygons
    /// share it.
    pub fn incident(&self, key: EdgeKey<I>) -> Result<EdgePolygons<I>> {
        let uses = self.addresses(key).ok_or(MeshError::UnknownEdge {
            v0: key.lo().index(),
            v1: key.hi().index(),
        })?;

        match *uses {
            [a] => Ok(EdgePolygons {
                first: a.polygon(),
                second: None,
            }),
            [a, b] => Ok(EdgePolygons {
                first: a.polygon(),
                second: Some(b.polygon()),
            }),
            _ => Err(MeshError::NonManifoldEdge {
                v0: key.lo().index(),
                v1: key.hi().index(),
                count: uses.len(),
            }),
        }
    }

    /// Edge addresses of `key` on each incident polygon, in mesh order.
    pub fn addresses(&self, key: EdgeKey<I>) -> Option<&[EdgeAddress<I>]> {
        self.lookup
            .get(&key)
            .map(|&idx| self.edges[idx].uses.as_slice())
    }

    /// Whether `key` is an edge of the mesh.
    pub fn contains(&self, key: EdgeKey<I>) -> bool {
        self.lookup.contains_key(&key)
    }

    /// Iterate over every distinct edge once, in first-seen order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey<I>> + '_ {
        self.edges.iter().map(|e| e.key)
    }

    /// Get the total number of distinct edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all boundary edges (exactly one incident polygon).
    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeKey<I>> + '_ {
        self.edges
            .iter()
            .filter(|e| e.uses.len() == 1)
            .map(|e| e.key)
    }

    /// Count the boundary edges.
    pub fn boundary_edge_count(&self) -> usize {
        self.boundary_edges().count()
    }

    /// Iterate over all non-manifold edges (more than two incident polygons).
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = EdgeKey<I>> + '_ {
        self.edges
            .iter()
            .filter(|e| e.uses.len() > 2)
            .map(|e| e.key)
    }

    /// Check if every edge has at most two incident polygons.
    pub fn is_manifold(&self) -> bool {
        self.edges.iter().all(|e| e.uses.len() <= 2)
    }

    /// Check if the mesh has no boundary edges.
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|e| e.uses.len() >= 2)
    }
}
