//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Per-corner UVs and normals |
//!
//! # Usage
//!
//! ```no_run
//! use uvseam::io::{load_with_uvs, save_with_uvs};
//! use uvseam::mesh::{PolyMesh, UvTag};
//!
//! let (mesh, uvs): (PolyMesh, Option<UvTag>) = load_with_uvs("model.obj").unwrap();
//! save_with_uvs(&mesh, uvs.as_ref(), None, "output.obj").unwrap();
//! ```

pub mod obj;

use std::path::Path;

use crate::algo::normals::CornerNormals;
use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, PolyMesh, UvTag};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh with automatic format detection.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolyMesh<I>> {
    load_with_uvs(path).map(|(mesh, _)| mesh)
}

/// Load a mesh and its UVW tag, if the file has one.
pub fn load_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    path: P,
) -> Result<(PolyMesh<I>, Option<UvTag<I>>)> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load_with_uvs(path),
    }
}

/// Save a mesh with automatic format detection.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolyMesh<I>, path: P) -> Result<()> {
    save_with_uvs(mesh, None, None, path)
}

/// Save a mesh with optional UVWs and per-corner normals.
pub fn save_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    mesh: &PolyMesh<I>,
    uvs: Option<&UvTag<I>>,
    normals: Option<&CornerNormals<I>>,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save_with_uvs(mesh, uvs, normals, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("mesh.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("mesh.stl"), None);
        assert!(matches!(
            load::<_, u32>("mesh.fbx"),
            Err(MeshError::UnsupportedFormat { extension }) if extension == "fbx"
        ));
        assert!(matches!(
            load::<_, u32>("mesh"),
            Err(MeshError::UnsupportedFormat { extension }) if extension == "(none)"
        ));
    }
}
