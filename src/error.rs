//! Error types for uvseam.
//!
//! [`MeshError`] covers failures while building or querying a mesh.
//! [`SkipReason`] is not an error: it records why the batch driver left an
//! object untouched and carries on with the next one.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no polygons.
    #[error("mesh has no polygons")]
    EmptyMesh,

    /// A polygon references an invalid vertex index.
    #[error("polygon {polygon} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The polygon index.
        polygon: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A polygon has duplicate vertex indices.
    #[error("polygon {polygon} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The polygon index.
        polygon: usize,
    },

    /// A polygon has a corner count other than three or four.
    #[error("polygon {polygon} has {corners} corners, only triangles and quads are supported")]
    UnsupportedPolygon {
        /// The polygon index.
        polygon: usize,
        /// Number of corners found.
        corners: usize,
    },

    /// An edge has more than two incident polygons.
    #[error("edge ({v0}, {v1}) has {count} incident polygons")]
    NonManifoldEdge {
        /// Smaller vertex of the edge.
        v0: usize,
        /// Larger vertex of the edge.
        v1: usize,
        /// Number of incident polygons.
        count: usize,
    },

    /// The queried vertex pair is not an edge of the mesh.
    #[error("({v0}, {v1}) is not an edge of the mesh")]
    UnknownEdge {
        /// First vertex.
        v0: usize,
        /// Second vertex.
        v1: usize,
    },

    /// A polygon index is out of range for the mesh.
    #[error("polygon index {polygon} out of range for a mesh with {count} polygons")]
    InvalidPolygonIndex {
        /// The offending polygon index.
        polygon: usize,
        /// Number of polygons in the mesh.
        count: usize,
    },

    /// The UV tag does not cover the mesh polygons one to one.
    #[error("UV tag has {uvs} entries but the mesh has {polygons} polygons")]
    UvCountMismatch {
        /// Number of polygons in the mesh.
        polygons: usize,
        /// Number of polygon entries in the UV tag.
        uvs: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Why an object was left out of a shading-break batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The object is not a polygon object.
    NotAPolygonMesh,
    /// The polygon object carries no UVW tag.
    MissingUvTag,
    /// Nothing was selected, so the batch had no targets.
    EmptySelection,
    /// The polygon object has no polygons, so there is nothing to break.
    NoPolygons,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAPolygonMesh => write!(f, "is not a polygon object"),
            SkipReason::MissingUvTag => write!(f, "has no UVW tag"),
            SkipReason::EmptySelection => write!(f, "nothing selected"),
            SkipReason::NoPolygons => write!(f, "has no polygons"),
        }
    }
}
