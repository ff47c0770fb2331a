//! Wavefront OBJ format support.
//!
//! Texture coordinates are kept per polygon corner, the way OBJ stores them
//! (`f v/vt`), so UV seams survive a load/save cycle. Faces must be
//! triangles or quads.
//!
//! Only `v`, `vt` and `f` statements are interpreted. `vn` is accepted but
//! ignored on load since normals are derived from hard edges; other
//! statements (`o`, `g`, `s`, `usemtl`, ...) are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::algo::normals::CornerNormals;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, MeshIndex, PolyMesh, UvTag, Uvw, SLOTS_PER_POLYGON};

/// One face corner: vertex index and optional texture index, both 0-based.
#[derive(Debug, Clone, Copy)]
struct Corner {
    vertex: usize,
    texture: Option<usize>,
}

/// Load a mesh from an OBJ file, discarding texture coordinates.
///
/// # Example
///
/// ```no_run
/// use uvseam::io::obj;
/// use uvseam::mesh::PolyMesh;
///
/// let mesh: PolyMesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolyMesh<I>> {
    load_with_uvs(path).map(|(mesh, _)| mesh)
}

/// Load a mesh and its per-corner UVW tag from an OBJ file.
///
/// The tag is `None` when no face references a `vt`.
pub fn load_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    path: P,
) -> Result<(PolyMesh<I>, Option<UvTag<I>>)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file), path)
}

/// Parse OBJ text from a reader. `source` is only used in error messages.
pub fn read<R: BufRead, I: MeshIndex>(
    reader: R,
    source: &Path,
) -> Result<(PolyMesh<I>, Option<UvTag<I>>)> {
    let fail = |line: usize, message: String| MeshError::LoadError {
        path: source.to_path_buf(),
        message: format!("line {}: {}", line, message),
    };

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut texcoords: Vec<Uvw> = Vec::new();
    let mut faces: Vec<Vec<Corner>> = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = n + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let xyz = parse_floats(tokens, 3, 3).map_err(|m| fail(line_no, m))?;
                positions.push(Point3::new(xyz[0], xyz[1], xyz[2]));
            }
            Some("vt") => {
                let uvw = parse_floats(tokens, 1, 3).map_err(|m| fail(line_no, m))?;
                texcoords.push(Uvw::new(
                    uvw[0],
                    uvw.get(1).copied().unwrap_or(0.0),
                    uvw.get(2).copied().unwrap_or(0.0),
                ));
            }
            Some("f") => {
                let corners = tokens
                    .map(|t| parse_corner(t, positions.len(), texcoords.len()))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|m| fail(line_no, m))?;
                match corners.len() {
                    3 | 4 => faces.push(corners),
                    0..=2 => {
                        return Err(fail(
                            line_no,
                            format!("face has only {} corners", corners.len()),
                        ))
                    }
                    count => {
                        return Err(MeshError::UnsupportedPolygon {
                            polygon: faces.len(),
                            corners: count,
                        })
                    }
                }
            }
            _ => {}
        }
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: source.to_path_buf(),
            message: "OBJ file contains no faces".to_string(),
        });
    }

    let indices: Vec<Vec<usize>> = faces
        .iter()
        .map(|f| f.iter().map(|c| c.vertex).collect())
        .collect();
    let mesh = build_from_polygons(&positions, &indices)?;

    let textured = faces
        .iter()
        .filter(|f| f.iter().all(|c| c.texture.is_some()))
        .count();
    let uvs = if textured == 0 {
        None
    } else {
        if textured < faces.len() {
            log::warn!(
                "{}: {} of {} faces have no texture coordinates, using (0, 0)",
                source.display(),
                faces.len() - textured,
                faces.len()
            );
        }
        Some(UvTag::new(
            faces.iter().map(|f| corner_uvws(f, &texcoords)).collect(),
        ))
    };

    log::debug!(
        "{}: {} vertices, {} polygons, {} texture coordinates",
        source.display(),
        mesh.num_vertices(),
        mesh.num_polygons(),
        texcoords.len()
    );
    Ok((mesh, uvs))
}

fn corner_uvws(face: &[Corner], texcoords: &[Uvw]) -> [Uvw; SLOTS_PER_POLYGON] {
    let all = face.iter().all(|c| c.texture.is_some());
    let uvw = |c: &Corner| match c.texture {
        Some(t) if all => texcoords[t],
        _ => Uvw::origin(),
    };
    let mut out = [Uvw::origin(); SLOTS_PER_POLYGON];
    for (slot, corner) in face.iter().enumerate() {
        out[slot] = uvw(corner);
    }
    if face.len() == 3 {
        out[3] = out[2];
    }
    out
}

fn parse_floats<'a>(
    tokens: impl Iterator<Item = &'a str>,
    min: usize,
    max: usize,
) -> std::result::Result<Vec<f64>, String> {
    let values = tokens
        .take(max)
        .map(|t| t.parse::<f64>().map_err(|_| format!("invalid number '{}'", t)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if values.len() < min {
        return Err(format!("expected at least {} values", min));
    }
    Ok(values)
}

/// Resolve a 1-based or negative (relative) OBJ index.
fn resolve_index(token: &str, count: usize, what: &str) -> std::result::Result<usize, String> {
    let raw: i64 = token
        .parse()
        .map_err(|_| format!("invalid {} index '{}'", what, token))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => count.checked_sub(r.unsigned_abs() as usize),
    };
    match resolved {
        Some(i) if i < count => Ok(i),
        _ => Err(format!("{} index {} out of range", what, raw)),
    }
}

/// Parse `v`, `v/vt`, `v/vt/vn` or `v//vn`.
fn parse_corner(
    token: &str,
    num_positions: usize,
    num_texcoords: usize,
) -> std::result::Result<Corner, String> {
    let mut parts = token.split('/');
    let vertex = resolve_index(parts.next().unwrap_or(""), num_positions, "vertex")?;
    let texture = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, num_texcoords, "texture")?),
        _ => None,
    };
    Ok(Corner { vertex, texture })
}

/// Save a mesh to an OBJ file with positions and faces only.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolyMesh<I>, path: P) -> Result<()> {
    save_with_uvs(mesh, None, None, path)
}

/// Save a mesh with optional per-corner UVWs and normals.
///
/// # Example
///
/// ```no_run
/// use uvseam::io::obj;
/// use uvseam::mesh::{PolyMesh, UvTag};
///
/// let (mesh, uvs): (PolyMesh, Option<UvTag>) = obj::load_with_uvs("in.obj").unwrap();
/// obj::save_with_uvs(&mesh, uvs.as_ref(), None, "out.obj").unwrap();
/// ```
pub fn save_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    mesh: &PolyMesh<I>,
    uvs: Option<&UvTag<I>>,
    normals: Option<&CornerNormals<I>>,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, uvs, normals, &mut writer).map_err(|e| match e {
        MeshError::Io(io) => MeshError::SaveError {
            path: path.to_path_buf(),
            message: io.to_string(),
        },
        other => other,
    })?;
    writer.flush()?;
    Ok(())
}

/// Write OBJ text to a writer.
///
/// `vt` and `vn` are written once per polygon corner and share numbering.
pub fn write<W: Write, I: MeshIndex>(
    mesh: &PolyMesh<I>,
    uvs: Option<&UvTag<I>>,
    normals: Option<&CornerNormals<I>>,
    writer: &mut W,
) -> Result<()> {
    if let Some(uvs) = uvs {
        uvs.check_covers(mesh)?;
    }
    if let Some(normals) = normals {
        if normals.len() != mesh.num_polygons() {
            return Err(MeshError::invalid_param(
                "normals",
                normals.len(),
                "must have one entry per polygon",
            ));
        }
    }

    writeln!(writer, "# uvseam")?;
    writeln!(
        writer,
        "# {} vertices, {} polygons",
        mesh.num_vertices(),
        mesh.num_polygons()
    )?;

    for v in mesh.vertex_ids() {
        let p = mesh.position(v);
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    if let Some(uvs) = uvs {
        for (pid, polygon) in mesh.polygons() {
            for corner in 0..polygon.corner_count() {
                let t = uvs.get(pid, corner);
                if t.z == 0.0 {
                    writeln!(writer, "vt {} {}", t.x, t.y)?;
                } else {
                    writeln!(writer, "vt {} {} {}", t.x, t.y, t.z)?;
                }
            }
        }
    }

    if let Some(normals) = normals {
        for (pid, polygon) in mesh.polygons() {
            for corner in 0..polygon.corner_count() {
                let n = normals.get(pid, corner);
                writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
            }
        }
    }

    let mut attribute = 1;
    for (_, polygon) in mesh.polygons() {
        write!(writer, "f")?;
        for &v in polygon.vertices() {
            let vi = v.index() + 1;
            match (uvs.is_some(), normals.is_some()) {
                (true, true) => write!(writer, " {}/{}/{}", vi, attribute, attribute)?,
                (true, false) => write!(writer, " {}/{}", vi, attribute)?,
                (false, true) => write!(writer, " {}//{}", vi, attribute)?,
                (false, false) => write!(writer, " {}", vi)?,
            }
            attribute += 1;
        }
        writeln!(writer)?;
    }

    Ok(())
}
