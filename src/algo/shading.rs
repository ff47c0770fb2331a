//! Breaking Phong shading along classified edges.
//!
//! The mesh itself never changes here. All mutation goes through a
//! [`ShadingHost`], the application object that owns the hard-edge flags,
//! the Phong tag and the edge selection.

use std::collections::BTreeSet;

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeAddress, MeshIndex};
use crate::topology::TopologyIndex;

use super::classify::Classification;

/// A set of encoded edge addresses (`polygon * 4 + slot`).
pub type EdgeSelection = BTreeSet<usize>;

/// Phong tag configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongSettings {
    /// Maximum angle between adjacent polygons that is still smoothed.
    /// 180 means smoothing is governed only by hard edges.
    pub angle_limit_degrees: f64,

    /// Whether hard (broken) edges stop smoothing.
    pub respect_breaks: bool,
}

impl Default for PhongSettings {
    fn default() -> Self {
        Self {
            angle_limit_degrees: 180.0,
            respect_breaks: true,
        }
    }
}

impl PhongSettings {
    /// Set the angle limit, in degrees.
    pub fn with_angle_limit(mut self, degrees: f64) -> Result<Self> {
        if !(0.0..=180.0).contains(&degrees) {
            return Err(MeshError::invalid_param(
                "angle_limit_degrees",
                degrees,
                "must be between 0 and 180",
            ));
        }
        self.angle_limit_degrees = degrees;
        Ok(self)
    }

    /// Set whether hard edges stop smoothing.
    pub fn with_respect_breaks(mut self, respect: bool) -> Self {
        self.respect_breaks = respect;
        self
    }

    /// Whether the angle limit can never reject a pair of polygons.
    #[inline]
    pub fn ignores_angle(&self) -> bool {
        self.angle_limit_degrees >= 180.0
    }
}

/// Edge selection state that a host keeps per object.
pub trait EdgeSelectionState {
    /// Snapshot of the current edge selection.
    fn edge_selection(&self) -> EdgeSelection;

    /// Replace the edge selection.
    fn restore_edge_selection(&mut self, selection: EdgeSelection);
}

/// The mesh-editing collaborator that owns shading state.
///
/// Hosts may implement [`mark_edges_hard`](Self::mark_edges_hard) by
/// selecting the edges and running a "break on selection" command; the
/// selection they clobber is restored by [`with_preserved_selection`].
pub trait ShadingHost<I: MeshIndex = u32>: EdgeSelectionState {
    /// Clear every hard-edge flag.
    fn set_all_edges_smooth(&mut self) -> Result<()>;

    /// Flag exactly the given edges as hard, in addition to existing flags.
    fn mark_edges_hard(&mut self, edges: &[EdgeAddress<I>]) -> Result<()>;

    /// Create the Phong tag if missing and configure it.
    fn ensure_phong_tag(&mut self, settings: &PhongSettings) -> Result<()>;
}

/// Run `f` and put the host's edge selection back afterwards, even on error.
pub fn with_preserved_selection<H, T, F>(host: &mut H, f: F) -> Result<T>
where
    H: EdgeSelectionState + ?Sized,
    F: FnOnce(&mut H) -> Result<T>,
{
    let saved = host.edge_selection();
    let result = f(host);
    host.restore_edge_selection(saved);
    result
}

/// Make shading break along exactly the classified break edges.
///
/// Resets every edge to smooth, marks every address of every break edge as
/// hard, and configures the Phong tag. The host's edge selection is left as
/// it was found.
pub fn apply_shading_break<I, H>(
    host: &mut H,
    topology: &TopologyIndex<I>,
    classification: &Classification<I>,
    settings: &PhongSettings,
) -> Result<()>
where
    I: MeshIndex,
    H: ShadingHost<I> + ?Sized,
{
    let addresses = classification.break_addresses(topology);
    log::debug!(
        "breaking shading on {} edges ({} addresses)",
        classification.len(),
        addresses.len()
    );

    with_preserved_selection(host, |host| {
        host.set_all_edges_smooth()?;
        host.mark_edges_hard(&addresses)?;
        host.ensure_phong_tag(settings)
    })
}
