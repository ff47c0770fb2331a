//! Per-corner Phong normals.
//!
//! Around every vertex, the incident polygons are split into smoothing
//! groups. Two polygons land in the same group when they share an edge at
//! that vertex which is not hard and whose dihedral angle is within the
//! Phong angle limit. Each corner gets the area-weighted normal of its group.
//!
//! Non-manifold edges never join groups.

use nalgebra::Vector3;

use crate::mesh::{EdgeKey, MeshIndex, PolyMesh, PolygonId, VertexId, SLOTS_PER_POLYGON};
use crate::topology::TopologyIndex;

use super::shading::PhongSettings;

/// One unit normal per polygon corner slot.
///
/// Triangles carry the normal of corner `c` in the fourth slot too.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerNormals<I: MeshIndex = u32> {
    normals: Vec<[Vector3<f64>; SLOTS_PER_POLYGON]>,
    _marker: std::marker::PhantomData<I>,
}

impl<I: MeshIndex> CornerNormals<I> {
    /// Number of polygons covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.normals.len()
    }

    /// Check if no polygon is covered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    /// Normal of a corner slot.
    #[inline]
    pub fn get(&self, p: PolygonId<I>, corner: usize) -> Vector3<f64> {
        self.normals[p.index()][corner]
    }

    /// All four slot normals of a polygon.
    #[inline]
    pub fn polygon(&self, p: PolygonId<I>) -> &[Vector3<f64>; SLOTS_PER_POLYGON] {
        &self.normals[p.index()]
    }
}

/// Compute per-corner normals for a mesh.
///
/// `is_hard` reports whether an edge breaks shading; it is ignored when
/// `settings.respect_breaks` is false.
///
/// # Example
///
/// ```
/// use uvseam::algo::normals::phong_normals;
/// use uvseam::algo::shading::PhongSettings;
/// use uvseam::mesh::{build_from_quads, PolyMesh, PolygonId};
/// use uvseam::topology::TopologyIndex;
/// use nalgebra::{Point3, Vector3};
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: PolyMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
/// let topology = TopologyIndex::build(&mesh);
/// let normals = phong_normals(&mesh, &topology, |_| false, &PhongSettings::default());
///
/// assert!((normals.get(PolygonId::new(0), 0) - Vector3::z()).norm() < 1e-12);
/// ```
pub fn phong_normals<I, F>(
    mesh: &PolyMesh<I>,
    topology: &TopologyIndex<I>,
    is_hard: F,
    settings: &PhongSettings,
) -> CornerNormals<I>
where
    I: MeshIndex,
    F: Fn(EdgeKey<I>) -> bool,
{
    let face_normals: Vec<Vector3<f64>> = mesh
        .polygon_ids()
        .map(|p| mesh.polygon_normal(p))
        .collect();
    let area_vectors: Vec<Vector3<f64>> = mesh
        .polygon_ids()
        .map(|p| mesh.polygon_area_vector(p))
        .collect();

    let mut normals: Vec<[Vector3<f64>; SLOTS_PER_POLYGON]> = face_normals
        .iter()
        .map(|&n| [n; SLOTS_PER_POLYGON])
        .collect();

    let min_cos = settings.angle_limit_degrees.to_radians().cos();
    let smooth_across = |a: PolygonId<I>, b: PolygonId<I>, key: EdgeKey<I>| -> bool {
        if settings.respect_breaks && is_hard(key) {
            return false;
        }
        settings.ignores_angle()
            || face_normals[a.index()].dot(&face_normals[b.index()]) >= min_cos
    };

    let fans = vertex_fans(mesh);
    let mut parent: Vec<usize> = Vec::new();

    for (vi, fan) in fans.iter().enumerate() {
        if fan.is_empty() {
            continue;
        }
        let v = VertexId::<I>::new(vi);

        parent.clear();
        parent.extend(0..fan.len());

        for (i, &p) in fan.iter().enumerate() {
            let polygon = mesh.polygon(p);
            let Some(corner) = polygon.local_corner(v) else {
                continue;
            };
            let n = polygon.corner_count();
            let prev = polygon.corner((corner + n - 1) % n);
            let next = polygon.corner((corner + 1) % n);

            for w in [prev, next] {
                let key = EdgeKey::new(v, w);
                let Some(&[a, b]) = topology.addresses(key) else {
                    continue;
                };
                let other = if a.polygon() == p { b.polygon() } else { a.polygon() };
                if other == p || !smooth_across(p, other, key) {
                    continue;
                }
                if let Some(j) = fan.iter().position(|&q| q == other) {
                    union(&mut parent, i, j);
                }
            }
        }

        let mut sums = vec![Vector3::zeros(); fan.len()];
        for (i, &p) in fan.iter().enumerate() {
            let root = find(&mut parent, i);
            sums[root] += area_vectors[p.index()];
        }

        for (i, &p) in fan.iter().enumerate() {
            let root = find(&mut parent, i);
            let sum = sums[root];
            let len = sum.norm();
            let normal = if len > 1e-12 {
                sum / len
            } else {
                face_normals[p.index()]
            };

            let polygon = mesh.polygon(p);
            if let Some(corner) = polygon.local_corner(v) {
                normals[p.index()][corner] = normal;
                if polygon.is_triangle() && corner == 2 {
                    normals[p.index()][3] = normal;
                }
            }
        }
    }

    CornerNormals {
        normals,
        _marker: std::marker::PhantomData,
    }
}

/// Incident polygons of every vertex, in mesh order.
fn vertex_fans<I: MeshIndex>(mesh: &PolyMesh<I>) -> Vec<Vec<PolygonId<I>>> {
    let mut fans = vec![Vec::new(); mesh.num_vertices()];
    for (pid, polygon) in mesh.polygons() {
        for &v in polygon.vertices() {
            fans[v.index()].push(pid);
        }
    }
    fans
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[rb] = ra;
    }
}
