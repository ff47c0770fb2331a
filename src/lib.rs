//! # uvseam
//!
//! Find the edges of a polygon mesh that lie on UV-island boundaries and
//! break Phong shading along exactly those edges.
//!
//! An edge is a *break edge* when it is a geometric border (one incident
//! polygon) or a UV seam (two incident polygons whose UVW coordinates at the
//! edge's endpoints differ). Everything else stays smooth.
//!
//! ## Features
//!
//! - **Triangles and quads**: four corner slots per polygon, triangles repeat
//!   their third corner
//! - **Per-corner UVs**: seams are detected from exact UVW comparison
//! - **Edge map**: [`topology::TopologyIndex`] answers edge adjacency in O(1)
//! - **Host abstraction**: [`algo::shading::ShadingHost`] applies the break
//!   to any application object; [`scene`] provides an in-memory one with undo
//! - **OBJ I/O** with per-corner `vt` and `vn`
//!
//! ## Quick Start
//!
//! ```
//! use uvseam::prelude::*;
//! use nalgebra::{Point2, Point3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//! ];
//! let mesh: PolyMesh = build_from_quads(&vertices, &[[0, 1, 2, 3], [1, 4, 5, 2]]).unwrap();
//! let uvs: Vec<Point2<f64>> = vertices.iter().map(|p| Point2::new(p.x, p.y)).collect();
//! let tag = UvTag::from_vertex_uvs(&mesh, &uvs).unwrap();
//!
//! let topology = TopologyIndex::build(&mesh);
//! let breaks = classify(&mesh, &topology, &tag, &ClassifyOptions::default()).unwrap();
//!
//! // Six border edges; the shared edge has continuous UVs
//! assert_eq!(breaks.len(), 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod scene;
pub mod topology;

/// Prelude module for convenient imports.
///
/// ```
/// use uvseam::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::classify::{classify, Classification, ClassifyOptions, EdgeClass};
    pub use crate::algo::shading::{apply_shading_break, PhongSettings, ShadingHost};
    pub use crate::error::{MeshError, Result, SkipReason};
    pub use crate::mesh::{
        build_from_polygons, build_from_quads, build_from_triangles, EdgeAddress, EdgeKey,
        MeshIndex, PolyMesh, Polygon, PolygonId, UvTag, Uvw, VertexId,
    };
    pub use crate::topology::TopologyIndex;
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_mixed_mesh_end_to_end() {
        // A quad with a triangle fan on its right side
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let mesh: PolyMesh =
            build_from_polygons(&vertices, &[vec![0, 1, 2, 3], vec![1, 4, 2]]).unwrap();
        let uvs: Vec<_> = vertices
            .iter()
            .map(|p| nalgebra::Point2::new(p.x, p.y))
            .collect();
        let tag = UvTag::from_vertex_uvs(&mesh, &uvs).unwrap();

        let topology = TopologyIndex::build(&mesh);
        assert_eq!(topology.edge_count(), 6);
        assert!(topology.is_manifold());

        let breaks = classify(&mesh, &topology, &tag, &ClassifyOptions::default()).unwrap();
        assert_eq!(breaks.border_count(), 5);
        assert_eq!(breaks.seam_count(), 0);
        assert!(!breaks.is_break(EdgeKey::from_indices(1, 2)));
    }
}
