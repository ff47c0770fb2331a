//! Index types for mesh elements.
//!
//! Vertices and polygons are addressed by type-safe wrappers that are generic
//! over the underlying integer type (u16 for small meshes, u32 for typical
//! meshes, u64 for massive meshes). Edges are addressed two ways: by their
//! canonical vertex pair ([`EdgeKey`]) and by a polygon-local slot
//! ([`EdgeAddress`]), which is how host applications number edges.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for types that can be used as mesh indices.
pub trait MeshIndex: Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static {
    /// The maximum valid index value.
    const MAX: Self;

    /// Convert from usize to this index type.
    ///
    /// # Panics
    /// Panics in debug builds if the value is too large for this index type.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(v as u128 <= Self::MAX as u128, "index {} too large for {}", v, stringify!($ty));
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A type-safe polygon index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PolygonId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Get the raw value of the underlying type.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.index())
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(PolygonId, "P");

/// Canonical key of an undirected edge.
///
/// The two vertices are stored sorted ascending, so `(a, b)` and `(b, a)`
/// produce the same key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeKey<I: MeshIndex = u32> {
    lo: VertexId<I>,
    hi: VertexId<I>,
}

impl<I: MeshIndex> EdgeKey<I> {
    /// Create the canonical key for the edge between `v0` and `v1`.
    #[inline]
    pub fn new(v0: VertexId<I>, v1: VertexId<I>) -> Self {
        if v0 <= v1 {
            Self { lo: v0, hi: v1 }
        } else {
            Self { lo: v1, hi: v0 }
        }
    }

    /// Create a key from raw vertex indices.
    #[inline]
    pub fn from_indices(v0: usize, v1: usize) -> Self {
        Self::new(VertexId::new(v0), VertexId::new(v1))
    }

    /// The smaller vertex.
    #[inline]
    pub fn lo(self) -> VertexId<I> {
        self.lo
    }

    /// The larger vertex.
    #[inline]
    pub fn hi(self) -> VertexId<I> {
        self.hi
    }

    /// Both vertices, smaller first.
    #[inline]
    pub fn vertices(self) -> (VertexId<I>, VertexId<I>) {
        (self.lo, self.hi)
    }
}

impl<I: MeshIndex> Debug for EdgeKey<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E({}, {})", self.lo.index(), self.hi.index())
    }
}

/// Number of edge slots reserved per polygon in the address space.
pub const SLOTS_PER_POLYGON: usize = 4;

/// Polygon-local address of an edge.
///
/// Slot `i` is the edge from corner `i` to corner `(i + 1) % 4`. Triangles
/// only use slots 0 to 2; slot 3 of a triangle aliases slot 2. The address
/// encodes to `polygon * 4 + slot`, the numbering host edge selections use.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeAddress<I: MeshIndex = u32> {
    polygon: PolygonId<I>,
    slot: u8,
}

impl<I: MeshIndex> EdgeAddress<I> {
    /// Create an address.
    ///
    /// # Panics
    /// Panics if `slot` is not in `0..4`.
    #[inline]
    pub fn new(polygon: PolygonId<I>, slot: usize) -> Self {
        assert!(slot < SLOTS_PER_POLYGON, "edge slot {} out of range", slot);
        Self {
            polygon,
            slot: slot as u8,
        }
    }

    /// The polygon this address belongs to.
    #[inline]
    pub fn polygon(self) -> PolygonId<I> {
        self.polygon
    }

    /// The edge slot within the polygon.
    #[inline]
    pub fn slot(self) -> usize {
        self.slot as usize
    }

    /// Encode as a flat edge index.
    #[inline]
    pub fn encode(self) -> usize {
        self.polygon.index() * SLOTS_PER_POLYGON + self.slot()
    }

    /// Decode a flat edge index.
    #[inline]
    pub fn decode(index: usize) -> Self {
        Self::new(
            PolygonId::new(index / SLOTS_PER_POLYGON),
            index % SLOTS_PER_POLYGON,
        )
    }
}

impl<I: MeshIndex> Debug for EdgeAddress<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P({}).{}", self.polygon.index(), self.slot)
    }
}
