//! Core mesh data structures.
//!
//! This module provides the polygon mesh representation and related types
//! for meshes made of triangles and quads with per-corner UV coordinates.
//!
//! # Overview
//!
//! - [`PolyMesh`] stores vertex positions and [`Polygon`]s. Every polygon has
//!   four corner slots; triangles repeat their last vertex in the fourth.
//! - [`UvTag`] stores one UVW coordinate per polygon corner.
//!
//! # Index Types
//!
//! - [`VertexId`] and [`PolygonId`] identify vertices and polygons, generic
//!   over the underlying integer type ([`MeshIndex`]).
//! - [`EdgeKey`] names an undirected edge by its sorted vertex pair.
//! - [`EdgeAddress`] names an edge by `(polygon, slot)`, the numbering used
//!   for host edge selections.
//!
//! # Construction
//!
//! ```
//! use uvseam::mesh::{PolyMesh, build_from_quads};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2, 3]];
//!
//! let mesh: PolyMesh = build_from_quads(&vertices, &faces).unwrap();
//! ```

mod builder;
mod index;
mod polygon;
mod polymesh;
mod uvw;

pub use builder::{build_from_polygons, build_from_quads, build_from_triangles, to_face_vertex};
pub use index::{EdgeAddress, EdgeKey, MeshIndex, PolygonId, VertexId, SLOTS_PER_POLYGON};
pub use polygon::Polygon;
pub use polymesh::PolyMesh;
pub use uvw::{UvTag, Uvw};
