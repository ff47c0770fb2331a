//! UV border classification.
//!
//! Every distinct edge of a mesh falls into one of three classes:
//!
//! - [`EdgeClass::Border`]: a single incident polygon (geometric boundary)
//! - [`EdgeClass::Seam`]: two incident polygons that disagree on the UV of at
//!   least one shared vertex
//! - [`EdgeClass::Continuous`]: two incident polygons with identical UVs at
//!   both shared vertices
//!
//! Borders and seams are *break* edges: Phong shading should not be smoothed
//! across them.
//!
//! # Exact comparison
//!
//! UVs are compared with exact floating-point equality. Two coordinates that
//! differ by rounding noise are different coordinates and force a break.
//!
//! # Example
//!
//! ```
//! use uvseam::prelude::*;
//! use uvseam::algo::classify::{classify, ClassifyOptions};
//! use nalgebra::{Point2, Point3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: PolyMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//! let uvs: Vec<Point2<f64>> = vertices.iter().map(|p| Point2::new(p.x, p.y)).collect();
//! let tag = UvTag::from_vertex_uvs(&mesh, &uvs).unwrap();
//! let topology = TopologyIndex::build(&mesh);
//!
//! let result = classify(&mesh, &topology, &tag, &ClassifyOptions::default()).unwrap();
//! assert_eq!(result.len(), 4); // every edge of a lone quad is a border
//! ```

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeAddress, EdgeKey, MeshIndex, PolyMesh, PolygonId, UvTag, Uvw, VertexId};
use crate::topology::TopologyIndex;

use super::Progress;

/// Edge count above which classification logs an advisory warning.
pub const DEFAULT_LARGE_MESH_WARNING: usize = 4000;

/// How often the sequential path reports progress, in edges.
const PROGRESS_STRIDE: usize = 1024;

/// Classification of a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// Geometric boundary: one incident polygon.
    Border,
    /// Interior edge whose UVs differ across the two polygons.
    Seam,
    /// Interior edge with matching UVs on both sides.
    Continuous,
}

impl EdgeClass {
    /// Whether shading should be broken along this edge.
    #[inline]
    pub fn is_break(self) -> bool {
        !matches!(self, EdgeClass::Continuous)
    }
}

/// Options for edge classification.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Whether to classify edges on the rayon thread pool (default: false).
    ///
    /// The result is identical either way.
    pub parallel: bool,

    /// Edge count above which an advisory warning is logged.
    pub large_mesh_warning: usize,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            large_mesh_warning: DEFAULT_LARGE_MESH_WARNING,
        }
    }
}

impl ClassifyOptions {
    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the large-mesh warning threshold.
    pub fn with_large_mesh_warning(mut self, edges: usize) -> Self {
        self.large_mesh_warning = edges;
        self
    }

    /// Check if classifying `edges` edges triggers the large-mesh advisory.
    #[inline]
    pub fn is_large_mesh(&self, edges: usize) -> bool {
        edges > self.large_mesh_warning
    }
}

/// The outcome of classifying every edge of a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<I: MeshIndex = u32> {
    break_edges: BTreeSet<EdgeKey<I>>,
    borders: usize,
    seams: usize,
    continuous: usize,
    non_manifold: Vec<EdgeKey<I>>,
}

impl<I: MeshIndex> Default for Classification<I> {
    fn default() -> Self {
        Self {
            break_edges: BTreeSet::new(),
            borders: 0,
            seams: 0,
            continuous: 0,
            non_manifold: Vec::new(),
        }
    }
}

impl<I: MeshIndex> Classification<I> {
    /// The set of break edges (borders and seams).
    pub fn break_edges(&self) -> &BTreeSet<EdgeKey<I>> {
        &self.break_edges
    }

    /// Whether `key` is a break edge.
    pub fn is_break(&self, key: EdgeKey<I>) -> bool {
        self.break_edges.contains(&key)
    }

    /// Number of break edges.
    pub fn len(&self) -> usize {
        self.break_edges.len()
    }

    /// Whether there are no break edges.
    pub fn is_empty(&self) -> bool {
        self.break_edges.is_empty()
    }

    /// Number of border edges.
    pub fn border_count(&self) -> usize {
        self.borders
    }

    /// Number of UV seam edges.
    pub fn seam_count(&self) -> usize {
        self.seams
    }

    /// Number of interior edges with continuous UVs.
    pub fn continuous_count(&self) -> usize {
        self.continuous
    }

    /// Edges left unclassified because more than two polygons share them.
    pub fn non_manifold(&self) -> &[EdgeKey<I>] {
        &self.non_manifold
    }

    /// Addresses of every break edge on every polygon that uses it, sorted.
    ///
    /// A seam yields two addresses (one per side), a border one.
    pub fn break_addresses(&self, topology: &TopologyIndex<I>) -> Vec<EdgeAddress<I>> {
        let mut addresses: Vec<EdgeAddress<I>> = self
            .break_edges
            .iter()
            .filter_map(|&key| topology.addresses(key))
            .flatten()
            .copied()
            .collect();
        addresses.sort_unstable();
        addresses
    }

    fn record(&mut self, key: EdgeKey<I>, class: EdgeClass) {
        match class {
            EdgeClass::Border => self.borders += 1,
            EdgeClass::Seam => self.seams += 1,
            EdgeClass::Continuous => self.continuous += 1,
        }
        if class.is_break() {
            self.break_edges.insert(key);
        }
    }
}

/// Classify a single edge.
///
/// `topology` must be built from `mesh`. Fails with
/// [`MeshError::NonManifoldEdge`] if more than two polygons share the edge,
/// [`MeshError::UnknownEdge`] if it is not an edge of the mesh the topology
/// was built from, and [`MeshError::InvalidPolygonIndex`] if the topology
/// names a polygon `mesh` does not have.
pub fn classify_edge<I: MeshIndex>(
    mesh: &PolyMesh<I>,
    topology: &TopologyIndex<I>,
    uvs: &UvTag<I>,
    key: EdgeKey<I>,
) -> Result<EdgeClass> {
    let incident = topology.incident(key)?;
    let Some(second) = incident.second else {
        return Ok(EdgeClass::Border);
    };

    let (v0, v1) = key.vertices();
    let [uv_a0, uv_a1] = corner_uvs(mesh, uvs, incident.first, key, [v0, v1])?;
    let [uv_b0, uv_b1] = corner_uvs(mesh, uvs, second, key, [v0, v1])?;

    if uv_a0 != uv_b0 || uv_a1 != uv_b1 {
        Ok(EdgeClass::Seam)
    } else {
        Ok(EdgeClass::Continuous)
    }
}

/// UVs of the edge's two vertices as seen from polygon `p`.
fn corner_uvs<I: MeshIndex>(
    mesh: &PolyMesh<I>,
    uvs: &UvTag<I>,
    p: PolygonId<I>,
    key: EdgeKey<I>,
    vertices: [VertexId<I>; 2],
) -> Result<[Uvw; 2]> {
    if p.index() >= mesh.num_polygons() {
        return Err(MeshError::InvalidPolygonIndex {
            polygon: p.index(),
            count: mesh.num_polygons(),
        });
    }
    let polygon = mesh.polygon(p);
    let mut out = [Uvw::origin(); 2];
    for (slot, v) in out.iter_mut().zip(vertices) {
        let corner = polygon.local_corner(v).ok_or(MeshError::UnknownEdge {
            v0: key.lo().index(),
            v1: key.hi().index(),
        })?;
        *slot = uvs.get(p, corner);
    }
    Ok(out)
}

/// Classify every edge of a mesh and collect the break edges.
///
/// `topology` must be built from `mesh`; a mismatch fails instead of
/// panicking. Non-manifold edges are logged and excluded from the break set;
/// they are listed in [`Classification::non_manifold`]. An empty mesh yields
/// an empty classification.
pub fn classify<I: MeshIndex>(
    mesh: &PolyMesh<I>,
    topology: &TopologyIndex<I>,
    uvs: &UvTag<I>,
    options: &ClassifyOptions,
) -> Result<Classification<I>> {
    classify_with_progress(mesh, topology, uvs, options, &Progress::none())
}

/// Classify every edge of a mesh, reporting progress.
pub fn classify_with_progress<I: MeshIndex>(
    mesh: &PolyMesh<I>,
    topology: &TopologyIndex<I>,
    uvs: &UvTag<I>,
    options: &ClassifyOptions,
    progress: &Progress,
) -> Result<Classification<I>> {
    uvs.check_covers(mesh)?;

    let total = topology.edge_count();
    if options.is_large_mesh(total) {
        log::warn!(
            "classifying {} edges (more than {}), this may take a while",
            total,
            options.large_mesh_warning
        );
    }

    let mut result = Classification::default();
    if total == 0 {
        return Ok(result);
    }

    progress.report(0, total, "Classifying edges");

    if options.parallel {
        let keys: Vec<EdgeKey<I>> = topology.edges().collect();
        let classes: Vec<Result<EdgeClass>> = keys
            .par_iter()
            .map(|&key| classify_edge(mesh, topology, uvs, key))
            .collect();
        for (key, class) in keys.into_iter().zip(classes) {
            accumulate(&mut result, key, class)?;
        }
    } else {
        for (i, key) in topology.edges().enumerate() {
            accumulate(&mut result, key, classify_edge(mesh, topology, uvs, key))?;
            if i % PROGRESS_STRIDE == 0 {
                progress.report(i, total, "Classifying edges");
            }
        }
    }

    progress.report(total, total, "Classifying edges");

    log::debug!(
        "{} edges: {} borders, {} seams, {} continuous, {} non-manifold",
        total,
        result.borders,
        result.seams,
        result.continuous,
        result.non_manifold.len()
    );

    Ok(result)
}

fn accumulate<I: MeshIndex>(
    result: &mut Classification<I>,
    key: EdgeKey<I>,
    class: Result<EdgeClass>,
) -> Result<()> {
    match class {
        Ok(class) => result.record(key, class),
        Err(MeshError::NonManifoldEdge { count, .. }) => {
            log::warn!("skipping non-manifold edge {:?} shared by {} polygons", key, count);
            result.non_manifold.push(key);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
