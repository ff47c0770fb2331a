//! Undo groups for batch edits.

use crate::mesh::MeshIndex;

use super::{NodePath, ObjectData, PolygonObject, Scene};

#[derive(Debug, Clone)]
struct Snapshot<I: MeshIndex> {
    path: NodePath,
    object: PolygonObject<I>,
}

#[derive(Debug, Clone)]
struct UndoGroup<I: MeshIndex> {
    label: String,
    snapshots: Vec<Snapshot<I>>,
}

/// Linear undo history over polygon objects in a [`Scene`].
///
/// A group is opened with [`begin`](Self::begin), objects are recorded
/// before they are first changed, and [`commit`](Self::commit) closes it.
/// [`undo`](Self::undo) reverts a whole group at once.
#[derive(Debug, Clone)]
pub struct History<I: MeshIndex = u32> {
    open: Option<UndoGroup<I>>,
    done: Vec<UndoGroup<I>>,
}

impl<I: MeshIndex> Default for History<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> History<I> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            open: None,
            done: Vec::new(),
        }
    }

    /// Open a new group. Does nothing if a group is already open.
    pub fn begin(&mut self, label: impl Into<String>) {
        if self.open.is_some() {
            log::debug!("undo group already open, nesting ignored");
            return;
        }
        self.open = Some(UndoGroup {
            label: label.into(),
            snapshots: Vec::new(),
        });
    }

    /// Check if a group is open.
    #[inline]
    pub fn is_recording(&self) -> bool {
        self.open.is_some()
    }

    /// Snapshot `object` at `path` before it changes.
    ///
    /// Only the first snapshot per path in a group is kept. Returns `false`
    /// if no group is open or the path was already recorded.
    pub fn record(&mut self, path: &[usize], object: &PolygonObject<I>) -> bool {
        let Some(group) = self.open.as_mut() else {
            return false;
        };
        if group.snapshots.iter().any(|s| s.path == path) {
            return false;
        }
        group.snapshots.push(Snapshot {
            path: path.to_vec(),
            object: object.clone(),
        });
        true
    }

    /// Close the open group.
    ///
    /// A group without snapshots is discarded. Returns `true` if a group was
    /// added to the history.
    pub fn commit(&mut self) -> bool {
        match self.open.take() {
            Some(group) if !group.snapshots.is_empty() => {
                log::debug!(
                    "committed undo group '{}' ({} objects)",
                    group.label,
                    group.snapshots.len()
                );
                self.done.push(group);
                true
            }
            _ => false,
        }
    }

    /// Number of committed groups.
    #[inline]
    pub fn depth(&self) -> usize {
        self.done.len()
    }

    /// Label of the most recent committed group.
    pub fn last_label(&self) -> Option<&str> {
        self.done.last().map(|g| g.label.as_str())
    }

    /// Revert the most recent committed group.
    ///
    /// Returns `false` if there was nothing to undo. Snapshots whose path no
    /// longer names a polygon object are dropped with a warning.
    pub fn undo(&mut self, scene: &mut Scene<I>) -> bool {
        let Some(group) = self.done.pop() else {
            return false;
        };

        for snapshot in group.snapshots.into_iter().rev() {
            match scene.node_mut(&snapshot.path).map(|n| &mut n.data) {
                Some(ObjectData::Polygon(object)) => *object = snapshot.object,
                _ => log::warn!(
                    "undo '{}': no polygon object at {:?}",
                    group.label,
                    snapshot.path
                ),
            }
        }
        true
    }
}
