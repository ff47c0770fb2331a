//! In-memory scene host.
//!
//! A [`Scene`] is a tree of named objects. Polygon objects carry the state a
//! modeling application keeps next to the mesh: the UV tag, the Phong tag,
//! hard-edge flags and the edge selection. [`PolygonObject`] implements
//! [`ShadingHost`], and [`break_selected`] runs the whole batch over the
//! selected objects as a single undo group.
//!
//! # Example
//!
//! ```
//! use uvseam::mesh::{build_from_quads, PolyMesh, UvTag};
//! use uvseam::scene::{break_selected, BreakOptions, History, PolygonObject, Scene, SceneNode};
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
//!
//! let mut scene = Scene::new();
//! scene.add_root(SceneNode::polygon("Plane", PolygonObject::new(mesh).with_uvs(tag)).selected(true));
//!
//! let mut history = History::new();
//! let report = break_selected(&mut scene, &mut history, &BreakOptions::default());
//! assert_eq!(report.processed.len(), 1);
//! assert_eq!(report.processed[0].borders, 4);
//! ```

mod history;

pub use history::History;

use std::time::{Duration, Instant};

use crate::algo::classify::{classify, ClassifyOptions};
use crate::algo::shading::{
    apply_shading_break, EdgeSelection, EdgeSelectionState, PhongSettings, ShadingHost,
};
use crate::algo::Progress;
use crate::error::{MeshError, Result, SkipReason};
use crate::mesh::{EdgeAddress, EdgeKey, MeshIndex, PolyMesh, UvTag};
use crate::topology::TopologyIndex;

/// Label of the undo group created by [`break_selected`].
pub const BREAK_UNDO_LABEL: &str = "Break Phong shading on UV borders";

/// Index path from a root to a node.
pub type NodePath = Vec<usize>;

/// A polygon mesh and its tags.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonObject<I: MeshIndex = u32> {
    /// Geometry and topology.
    pub mesh: PolyMesh<I>,
    /// UVW tag, if the object has one.
    pub uvs: Option<UvTag<I>>,
    /// Phong tag, if the object has one.
    pub phong: Option<PhongSettings>,
    /// Encoded addresses of hard (broken) edges.
    pub hard_edges: EdgeSelection,
    /// Encoded addresses of selected edges.
    pub edge_selection: EdgeSelection,
}

impl<I: MeshIndex> PolygonObject<I> {
    /// Create an object with no tags and nothing selected.
    pub fn new(mesh: PolyMesh<I>) -> Self {
        Self {
            mesh,
            uvs: None,
            phong: None,
            hard_edges: EdgeSelection::new(),
            edge_selection: EdgeSelection::new(),
        }
    }

    /// Attach a UVW tag.
    pub fn with_uvs(mut self, uvs: UvTag<I>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Check whether any address of `key` is flagged hard.
    pub fn is_hard_edge(&self, key: EdgeKey<I>, topology: &TopologyIndex<I>) -> bool {
        topology
            .addresses(key)
            .is_some_and(|addrs| addrs.iter().any(|a| self.hard_edges.contains(&a.encode())))
    }
}

impl<I: MeshIndex> EdgeSelectionState for PolygonObject<I> {
    fn edge_selection(&self) -> EdgeSelection {
        self.edge_selection.clone()
    }

    fn restore_edge_selection(&mut self, selection: EdgeSelection) {
        self.edge_selection = selection;
    }
}

impl<I: MeshIndex> ShadingHost<I> for PolygonObject<I> {
    fn set_all_edges_smooth(&mut self) -> Result<()> {
        self.hard_edges.clear();
        Ok(())
    }

    /// Selects the edges, then breaks shading on the selection.
    fn mark_edges_hard(&mut self, edges: &[EdgeAddress<I>]) -> Result<()> {
        let polygons = self.mesh.num_polygons();
        if let Some(bad) = edges.iter().find(|a| a.polygon().index() >= polygons) {
            return Err(MeshError::invalid_param(
                "edges",
                bad.encode(),
                "edge address outside the mesh",
            ));
        }
        self.edge_selection = edges.iter().map(|a| a.encode()).collect();
        self.hard_edges.extend(self.edge_selection.iter().copied());
        Ok(())
    }

    fn ensure_phong_tag(&mut self, settings: &PhongSettings) -> Result<()> {
        self.phong = Some(*settings);
        Ok(())
    }
}

/// What a scene node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData<I: MeshIndex = u32> {
    /// An editable polygon mesh.
    Polygon(PolygonObject<I>),
    /// An empty grouping object.
    Null,
    /// Any other object type, by name (spline, generator, light, ...).
    Other(String),
}

/// A named object in the scene tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode<I: MeshIndex = u32> {
    /// Display name.
    pub name: String,
    /// Object payload.
    pub data: ObjectData<I>,
    /// Whether the object is selected.
    pub selected: bool,
    /// Child objects.
    pub children: Vec<SceneNode<I>>,
}

impl<I: MeshIndex> SceneNode<I> {
    /// Create an unselected node without children.
    pub fn new(name: impl Into<String>, data: ObjectData<I>) -> Self {
        Self {
            name: name.into(),
            data,
            selected: false,
            children: Vec::new(),
        }
    }

    /// Create a polygon object node.
    pub fn polygon(name: impl Into<String>, object: PolygonObject<I>) -> Self {
        Self::new(name, ObjectData::Polygon(object))
    }

    /// Create a null node.
    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, ObjectData::Null)
    }

    /// Set the selection flag.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: SceneNode<I>) -> Self {
        self.children.push(child);
        self
    }
}

/// A forest of scene nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene<I: MeshIndex = u32> {
    /// Top-level objects.
    pub roots: Vec<SceneNode<I>>,
}

impl<I: MeshIndex> Default for Scene<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> Scene<I> {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Add a top-level node and return its path.
    pub fn add_root(&mut self, node: SceneNode<I>) -> NodePath {
        self.roots.push(node);
        vec![self.roots.len() - 1]
    }

    /// Get the node at `path`.
    pub fn node(&self, path: &[usize]) -> Option<&SceneNode<I>> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for &i in rest {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    /// Get the node at `path` mutably.
    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut SceneNode<I>> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for &i in rest {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    /// Get the polygon object at `path`, if that node is one.
    pub fn polygon_object(&self, path: &[usize]) -> Option<&PolygonObject<I>> {
        match &self.node(path)?.data {
            ObjectData::Polygon(object) => Some(object),
            _ => None,
        }
    }

    /// Paths of selected nodes in depth-first order.
    ///
    /// With `include_children`, every descendant of a selected node is
    /// included too. Each path appears once.
    pub fn selected_paths(&self, include_children: bool) -> Vec<NodePath> {
        fn walk<I: MeshIndex>(
            nodes: &[SceneNode<I>],
            inherited: bool,
            include_children: bool,
            prefix: &mut NodePath,
            out: &mut Vec<NodePath>,
        ) {
            for (i, node) in nodes.iter().enumerate() {
                prefix.push(i);
                let picked = node.selected || inherited;
                if picked {
                    out.push(prefix.clone());
                }
                walk(
                    &node.children,
                    picked && include_children,
                    include_children,
                    prefix,
                    out,
                );
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.roots, false, include_children, &mut Vec::new(), &mut out);
        out
    }
}

/// Options for [`break_selected`].
#[derive(Debug, Clone, Default)]
pub struct BreakOptions {
    /// Edge classification options.
    pub classify: ClassifyOptions,
    /// Phong tag written to every processed object.
    pub phong: PhongSettings,
    /// Also process descendants of selected objects.
    pub include_children: bool,
}

impl BreakOptions {
    /// Set the classification options.
    pub fn with_classify(mut self, classify: ClassifyOptions) -> Self {
        self.classify = classify;
        self
    }

    /// Set the Phong tag settings.
    pub fn with_phong(mut self, phong: PhongSettings) -> Self {
        self.phong = phong;
        self
    }

    /// Set whether descendants of selected objects are processed.
    pub fn with_include_children(mut self, include: bool) -> Self {
        self.include_children = include;
        self
    }
}

/// Outcome for one processed object.
#[derive(Debug, Clone)]
pub struct ObjectReport {
    /// Object name.
    pub name: String,
    /// Scene path of the object.
    pub path: NodePath,
    /// Number of geometric border edges.
    pub borders: usize,
    /// Number of UV seam edges.
    pub seams: usize,
    /// Number of non-manifold edges left untouched.
    pub non_manifold: usize,
    /// Number of edge addresses flagged hard.
    pub hard_addresses: usize,
    /// Time spent on the object.
    pub elapsed: Duration,
}

/// An object left untouched, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedObject {
    /// Object name; `None` for the empty selection entry.
    pub name: Option<String>,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// An object whose processing failed.
#[derive(Debug)]
pub struct FailedObject {
    /// Object name.
    pub name: String,
    /// The error.
    pub error: MeshError,
}

/// Summary of a [`break_selected`] batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Objects whose shading was broken.
    pub processed: Vec<ObjectReport>,
    /// Objects that were skipped.
    pub skipped: Vec<SkippedObject>,
    /// Objects that failed.
    pub failed: Vec<FailedObject>,
    /// Wall time of the whole batch.
    pub elapsed: Duration,
}

impl BatchReport {
    /// Check if any object was changed.
    pub fn changed_anything(&self) -> bool {
        !self.processed.is_empty()
    }
}

/// Break Phong shading along UV borders on every selected polygon object.
///
/// See [`break_selected_with_progress`].
pub fn break_selected<I: MeshIndex>(
    scene: &mut Scene<I>,
    history: &mut History<I>,
    options: &BreakOptions,
) -> BatchReport {
    break_selected_with_progress(scene, history, options, &Progress::none())
}

/// Break Phong shading along UV borders on every selected polygon object,
/// reporting progress as a percentage of objects.
///
/// Objects that are not polygon objects, have no UVW tag or have no polygons
/// are skipped and left untouched. An
/// object whose classification fails is reported and left unchanged; the
/// batch continues. All changes form one undo group labelled
/// [`BREAK_UNDO_LABEL`]; if `history` already has a group open, the changes
/// join it and the caller commits it.
pub fn break_selected_with_progress<I: MeshIndex>(
    scene: &mut Scene<I>,
    history: &mut History<I>,
    options: &BreakOptions,
    progress: &Progress,
) -> BatchReport {
    let start = Instant::now();
    let mut report = BatchReport::default();

    let paths = scene.selected_paths(options.include_children);
    if paths.is_empty() {
        log::info!("{}", SkipReason::EmptySelection);
        report.skipped.push(SkippedObject {
            name: None,
            reason: SkipReason::EmptySelection,
        });
        return report;
    }

    // A group the caller already opened stays theirs to commit
    let owns_group = !history.is_recording();
    history.begin(BREAK_UNDO_LABEL);
    let total = paths.len();

    for (i, path) in paths.iter().enumerate() {
        progress.report_percent(i, total, "Breaking shading");

        let Some(node) = scene.node_mut(path) else {
            continue;
        };
        let name = node.name.clone();

        let ObjectData::Polygon(object) = &mut node.data else {
            log::info!("`{}` {}", name, SkipReason::NotAPolygonMesh);
            report.skipped.push(SkippedObject {
                name: Some(name),
                reason: SkipReason::NotAPolygonMesh,
            });
            continue;
        };
        let Some(uvs) = object.uvs.as_ref() else {
            log::info!("`{}` {}", name, SkipReason::MissingUvTag);
            report.skipped.push(SkippedObject {
                name: Some(name),
                reason: SkipReason::MissingUvTag,
            });
            continue;
        };

        let object_start = Instant::now();
        let topology = TopologyIndex::build(&object.mesh);
        let classification = match classify(&object.mesh, &topology, uvs, &options.classify) {
            Ok(c) => c,
            Err(error) => {
                log::warn!("`{}` failed: {}", name, error);
                report.failed.push(FailedObject { name, error });
                continue;
            }
        };

        if object.mesh.is_empty() {
            log::info!("`{}` {}", name, SkipReason::NoPolygons);
            report.skipped.push(SkippedObject {
                name: Some(name),
                reason: SkipReason::NoPolygons,
            });
            continue;
        }

        history.record(path, object);
        let hard_addresses = classification.break_addresses(&topology).len();
        if let Err(error) =
            apply_shading_break(&mut *object, &topology, &classification, &options.phong)
        {
            log::warn!("`{}` failed: {}", name, error);
            report.failed.push(FailedObject { name, error });
            continue;
        }

        let elapsed = object_start.elapsed();
        log::info!(
            "`{}`: {} border and {} seam edges broken in {:.2?}",
            name,
            classification.border_count(),
            classification.seam_count(),
            elapsed
        );
        report.processed.push(ObjectReport {
            name,
            path: path.clone(),
            borders: classification.border_count(),
            seams: classification.seam_count(),
            non_manifold: classification.non_manifold().len(),
            hard_addresses,
            elapsed,
        });
    }

    progress.report_percent(total, total, "Breaking shading");
    if owns_group {
        history.commit();
    }

    report.elapsed = start.elapsed();
    log::info!(
        "processed {} objects, skipped {}, failed {} in {:.2?}",
        report.processed.len(),
        report.skipped.len(),
        report.failed.len(),
        report.elapsed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_quads, Uvw};
    use nalgebra::{Point2, Point3};
    use std::sync::{Arc, Mutex};

    fn two_quads(seam: bool) -> PolygonObject<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let mesh: PolyMesh = build_from_quads(&vertices, &[[0, 1, 2, 3], [1, 4, 5, 2]]).unwrap();
        let uvs: Vec<Point2<f64>> = vertices.iter().map(|p| Point2::new(p.x, p.y)).collect();
        let mut tag = UvTag::from_vertex_uvs(&mesh, &uvs).unwrap();
        if seam {
            // Move polygon 1's copy of vertex 1 to another island
            tag.set(crate::mesh::PolygonId::new(1), 0, Uvw::new(5.0, 0.0, 0.0));
        }
        PolygonObject::new(mesh).with_uvs(tag)
    }

    #[test]
    fn test_empty_selection() {
        let mut scene = Scene::new();
        scene.add_root(SceneNode::polygon("A", two_quads(false)));
        let mut history = History::new();

        let report = break_selected(&mut scene, &mut history, &BreakOptions::default());

        assert_eq!(
            report.skipped,
            vec![SkippedObject {
                name: None,
                reason: SkipReason::EmptySelection
            }]
        );
        assert!(!report.changed_anything());
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn test_breaks_continuous_and_seamed_objects() {
        let mut scene = Scene::new();
        let a = scene.add_root(SceneNode::polygon("Flat", two_quads(false)).selected(true));
        let b = scene.add_root(SceneNode::polygon("Seamed", two_quads(true)).selected(true));
        let mut history = History::new();

        let report = break_selected(&mut scene, &mut history, &BreakOptions::default());

        assert_eq!(report.processed.len(), 2);
        assert_eq!(report.processed[0].borders, 6);
        assert_eq!(report.processed[0].seams, 0);
        assert_eq!(report.processed[1].seams, 1);

        let flat = scene.polygon_object(&a).unwrap();
        assert_eq!(flat.hard_edges, [0, 2, 3, 4, 5, 6].into_iter().collect::<EdgeSelection>());
        assert_eq!(flat.phong, Some(PhongSettings::default()));

        let seamed = scene.polygon_object(&b).unwrap();
        assert_eq!(seamed.hard_edges.len(), 8);
        assert_eq!(history.depth(), 1);
        assert_eq!(history.last_label(), Some(BREAK_UNDO_LABEL));
    }

    #[test]
    fn test_object_without_uv_tag_is_skipped_untouched() {
        let mut object = two_quads(false);
        object.uvs = None;
        object.hard_edges.insert(1);
        let before = object.clone();

        let mut scene = Scene::new();
        let path = scene.add_root(SceneNode::polygon("NoUV", object).selected(true));
        let mut history = History::new();

        let report = break_selected(&mut scene, &mut history, &BreakOptions::default());

        assert!(report.processed.is_empty());
        assert_eq!(
            report.skipped,
            vec![SkippedObject {
                name: Some("NoUV".to_string()),
                reason: SkipReason::MissingUvTag
            }]
        );
        assert_eq!(scene.polygon_object(&path), Some(&before));
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn test_object_without_polygons_is_untouched() {
        let object = PolygonObject::new(PolyMesh::<u32>::new()).with_uvs(UvTag::zeros(0));
        let before = object.clone();

        let mut scene = Scene::new();
        let path = scene.add_root(SceneNode::polygon("Empty", object).selected(true));
        let mut history = History::new();

        let report = break_selected(&mut scene, &mut history, &BreakOptions::default());

        assert!(report.processed.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(
            report.skipped,
            vec![SkippedObject {
                name: Some("Empty".to_string()),
                reason: SkipReason::NoPolygons
            }]
        );
        assert!(!report.changed_anything());
        assert_eq!(scene.polygon_object(&path), Some(&before));
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn test_caller_undo_group_left_open() {
        let mut scene = Scene::new();
        scene.add_root(SceneNode::polygon("A", two_quads(true)).selected(true));
        let before = scene.clone();
        let mut history = History::new();

        history.begin("Outer");
        break_selected(&mut scene, &mut history, &BreakOptions::default());

        assert!(history.is_recording());
        assert_eq!(history.depth(), 0);

        assert!(history.commit());
        assert_eq!(history.last_label(), Some("Outer"));
        assert!(history.undo(&mut scene));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_non_polygon_objects_are_skipped() {
        let mut scene: Scene = Scene::new();
        scene.add_root(SceneNode::null("Group").selected(true));
        scene.add_root(SceneNode::new("Path", ObjectData::Other("spline".into())).selected(true));
        let mut history = History::new();

        let report = break_selected(&mut scene, &mut history, &BreakOptions::default());

        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::NotAPolygonMesh));
    }

    #[test]
    fn test_include_children() {
        let group = SceneNode::null("Group")
            .selected(true)
            .with_child(SceneNode::polygon("Child", two_quads(false)));
        let mut scene = Scene::new();
        scene.add_root(group);

        assert_eq!(scene.selected_paths(false), vec![vec![0]]);
        assert_eq!(scene.selected_paths(true), vec![vec![0], vec![0, 0]]);

        let mut history = History::new();
        let options = BreakOptions::default().with_include_children(true);
        let report = break_selected(&mut scene, &mut history, &options);

        assert_eq!(report.processed.len(), 1);
        assert_eq!(report.processed[0].path, vec![0, 0]);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_failed_object_does_not_stop_batch() {
        let mut broken = two_quads(false);
        broken.uvs = Some(UvTag::zeros(1));

        let mut scene = Scene::new();
        let bad = scene.add_root(SceneNode::polygon("Bad", broken.clone()).selected(true));
        scene.add_root(SceneNode::polygon("Good", two_quads(false)).selected(true));
        let mut history = History::new();

        let report = break_selected(&mut scene, &mut history, &BreakOptions::default());

        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0].error, MeshError::UvCountMismatch { .. }));
        assert_eq!(report.processed.len(), 1);
        assert_eq!(scene.polygon_object(&bad), Some(&broken));
    }

    #[test]
    fn test_undo_reverts_whole_batch() {
        let mut scene = Scene::new();
        scene.add_root(SceneNode::polygon("A", two_quads(false)).selected(true));
        scene.add_root(SceneNode::polygon("B", two_quads(true)).selected(true));
        let before = scene.clone();
        let mut history = History::new();

        break_selected(&mut scene, &mut history, &BreakOptions::default());
        assert_ne!(scene, before);

        assert!(history.undo(&mut scene));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_edge_selection_preserved() {
        let mut object = two_quads(false);
        object.edge_selection = [1, 2].into_iter().collect();

        let mut scene = Scene::new();
        let path = scene.add_root(SceneNode::polygon("A", object).selected(true));
        let mut history = History::new();
        break_selected(&mut scene, &mut history, &BreakOptions::default());

        let object = scene.polygon_object(&path).unwrap();
        assert_eq!(object.edge_selection, [1, 2].into_iter().collect::<EdgeSelection>());
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut scene = Scene::new();
        let path = scene.add_root(SceneNode::polygon("A", two_quads(true)).selected(true));
        let mut history = History::new();

        break_selected(&mut scene, &mut history, &BreakOptions::default());
        let first = scene.polygon_object(&path).cloned();
        break_selected(&mut scene, &mut history, &BreakOptions::default());

        assert_eq!(scene.polygon_object(&path).cloned(), first);
        assert_eq!(history.depth(), 2);
    }

    #[test]
    fn test_progress_reaches_hundred() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, _, _| sink.lock().unwrap().push(current));

        let mut scene = Scene::new();
        scene.add_root(SceneNode::polygon("A", two_quads(false)).selected(true));
        scene.add_root(SceneNode::polygon("B", two_quads(false)).selected(true));
        let mut history = History::new();
        break_selected_with_progress(&mut scene, &mut history, &BreakOptions::default(), &progress);

        assert_eq!(*seen.lock().unwrap(), vec![0, 50, 100]);
    }
}
