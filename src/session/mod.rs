//! Demand-driven computation graph from a tree source to a styled,
//! positioned graph.
//!
//! A [TreeSession] holds the current [Source] and [TreeProps] snapshot and
//! one [Memo] slot per stage ("selector"). Every getter first pulls its
//! upstream getters and then consults its own slot, so only stages whose
//! inputs actually changed are recomputed:
//!
//! ```text
//! parsed ─ rotated ─ collapsed ─ graph_without_layout ─┬─ graph_before_layout ─┬─ branch_scale ─┐
//!                                                      │                       └────────────────┤
//!                                                      └─ step_scale ───────────────────────────┴─ graph_after_layout ─ graph_with_styles
//! ```
//!
//! Changing a style never re-parses or re-lays-out; changing the zoom only
//! rescales.
//!
//! # Example
//! ```
//! use phylograph::layout::Projection;
//! use phylograph::session::{SelectorId, TreeProps, TreeSession};
//!
//! let mut session = TreeSession::new("(A:1,B:2,(C:3,D:4):5);", TreeProps::default());
//! let graph = session.graph_with_styles().unwrap();
//! assert_eq!(graph.leaves().len(), 4);
//!
//! session.update_props(|props| props.with_fill_colour("red"));
//! session.graph_with_styles().unwrap();
//! assert_eq!(session.evaluations(SelectorId::GraphBeforeLayout), 1);
//! assert_eq!(session.evaluations(SelectorId::GraphWithStyles), 2);
//!
//! session.update_props(|props| props.with_projection(Projection::Circular));
//! session.graph_with_styles().unwrap();
//! assert_eq!(session.evaluations(SelectorId::Parsed), 1);
//! assert_eq!(session.evaluations(SelectorId::GraphBeforeLayout), 2);
//! ```

pub mod colour;
pub mod graph;
pub mod props;
pub mod source;
pub mod styles;

pub use colour::{ColourCache, Rgba, parse_colour};
pub use graph::{GraphWithoutLayout, PositionedGraph};
pub use props::{DEFAULT_FILL_COLOUR, LeafStyle, TreeProps};
pub use source::Source;
pub use styles::{StyledGraph, StyledLeaf, apply_styles};

use crate::edit::{self, NodeOrder};
use crate::error::PhyloError;
use crate::indexer;
use crate::layout::{self, DrawingArea, Projection};
use crate::memo::Memo;
use crate::model::{PhyloTree, RawTree};
use crate::newick::{self, NewickOptions};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

// =#========================================================================#=
// SELECTOR ID
// =#========================================================================$=
/// Names of the pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorId {
    /// Source parsed and indexed.
    Parsed,
    /// Parsed tree with `rotated_ids` applied.
    Rotated,
    /// Rotated tree with `collapsed_ids` applied.
    Collapsed,
    /// Collapsed tree with the view root set and its visible leaves listed.
    GraphWithoutLayout,
    /// Laid out in tree units for the current projection.
    GraphBeforeLayout,
    /// Drawing units per unit of branch length.
    BranchScale,
    /// Drawing units (or radians) per leaf step.
    StepScale,
    /// Laid out graph scaled to drawing units.
    GraphAfterLayout,
    /// Scaled graph with leaf labels and fill colours resolved.
    GraphWithStyles,
}

impl SelectorId {
    /// All selectors in pipeline order.
    pub const ALL: [SelectorId; 9] = [
        SelectorId::Parsed,
        SelectorId::Rotated,
        SelectorId::Collapsed,
        SelectorId::GraphWithoutLayout,
        SelectorId::GraphBeforeLayout,
        SelectorId::BranchScale,
        SelectorId::StepScale,
        SelectorId::GraphAfterLayout,
        SelectorId::GraphWithStyles,
    ];

    /// Name used in log records.
    pub fn name(self) -> &'static str {
        match self {
            SelectorId::Parsed => "parsed",
            SelectorId::Rotated => "rotated",
            SelectorId::Collapsed => "collapsed",
            SelectorId::GraphWithoutLayout => "graph-without-layout",
            SelectorId::GraphBeforeLayout => "graph-before-layout",
            SelectorId::BranchScale => "branch-scale",
            SelectorId::StepScale => "step-scale",
            SelectorId::GraphAfterLayout => "graph-after-layout",
            SelectorId::GraphWithStyles => "graph-with-styles",
        }
    }
}

impl fmt::Display for SelectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Styles = Rc<HashMap<String, LeafStyle>>;

// =$========================================================================$=
// TREE SESSION
// =$========================================================================$=
/// Memoised pipeline for one tree source and one configuration at a time.
///
/// Not thread-safe; outputs are shared as `Rc`s and stay valid (but stale)
/// after the session moves on.
#[derive(Debug)]
pub struct TreeSession {
    source: Rc<Source>,
    props: Rc<TreeProps>,
    colour_cache: ColourCache,

    parsed: Memo<(Rc<Source>,), Result<Rc<PhyloTree>, PhyloError>>,
    rotated: Memo<(Rc<PhyloTree>, Rc<[String]>), Rc<PhyloTree>>,
    collapsed: Memo<(Rc<PhyloTree>, Rc<[String]>), Result<Rc<PhyloTree>, PhyloError>>,
    graph_without_layout: Memo<(Rc<PhyloTree>, Option<String>), Rc<GraphWithoutLayout>>,
    graph_before_layout: Memo<(Rc<GraphWithoutLayout>, Projection, bool), Rc<PositionedGraph>>,
    branch_scale: Memo<(Rc<PositionedGraph>, Projection, DrawingArea, f64), f64>,
    step_scale: Memo<(Rc<GraphWithoutLayout>, Projection, DrawingArea, f64), f64>,
    graph_after_layout: Memo<(Rc<PositionedGraph>, Projection, f64, f64), Rc<PositionedGraph>>,
    graph_with_styles: Memo<(Rc<PositionedGraph>, Styles, String), Rc<StyledGraph>>,
}

// ============================================================================
// New, Getters / Setters (pub)
// ============================================================================
impl TreeSession {
    /// Creates a session; nothing is computed until a getter is called.
    pub fn new(source: impl Into<Source>, props: TreeProps) -> Self {
        Self {
            source: Rc::new(source.into()),
            props: Rc::new(props),
            colour_cache: ColourCache::default(),
            parsed: Memo::new(SelectorId::Parsed),
            rotated: Memo::new(SelectorId::Rotated),
            collapsed: Memo::new(SelectorId::Collapsed),
            graph_without_layout: Memo::new(SelectorId::GraphWithoutLayout),
            graph_before_layout: Memo::new(SelectorId::GraphBeforeLayout),
            branch_scale: Memo::new(SelectorId::BranchScale),
            step_scale: Memo::new(SelectorId::StepScale),
            graph_after_layout: Memo::new(SelectorId::GraphAfterLayout),
            graph_with_styles: Memo::new(SelectorId::GraphWithStyles),
        }
    }

    /// Replaces the colour cache, e.g. with one of a different capacity.
    pub fn with_colour_cache(mut self, cache: ColourCache) -> Self {
        self.colour_cache = cache;
        self
    }

    /// Current tree source.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Replaces the source; everything downstream is recomputed on demand.
    pub fn set_source(&mut self, source: impl Into<Source>) {
        self.source = Rc::new(source.into());
    }

    /// Current configuration snapshot.
    pub fn props(&self) -> &TreeProps {
        &self.props
    }

    /// Replaces the configuration snapshot.
    pub fn set_props(&mut self, props: TreeProps) {
        self.props = Rc::new(props);
    }

    /// Derives a new configuration snapshot from the current one.
    ///
    /// # Example
    /// ```
    /// use phylograph::session::{TreeProps, TreeSession};
    ///
    /// let mut session = TreeSession::new("(A,B);", TreeProps::default());
    /// session.update_props(|props| props.with_step_zoom(1.0));
    /// assert_eq!(session.props().step_zoom, 1.0);
    /// ```
    pub fn update_props(&mut self, update: impl FnOnce(TreeProps) -> TreeProps) {
        let props = (*self.props).clone();
        self.props = Rc::new(update(props));
    }

    /// Cache of parsed fill colours, shared across styling passes.
    pub fn colour_cache(&self) -> &ColourCache {
        &self.colour_cache
    }

    /// Number of times the given stage has been computed.
    pub fn evaluations(&self, selector: SelectorId) -> usize {
        match selector {
            SelectorId::Parsed => self.parsed.evaluations(),
            SelectorId::Rotated => self.rotated.evaluations(),
            SelectorId::Collapsed => self.collapsed.evaluations(),
            SelectorId::GraphWithoutLayout => self.graph_without_layout.evaluations(),
            SelectorId::GraphBeforeLayout => self.graph_before_layout.evaluations(),
            SelectorId::BranchScale => self.branch_scale.evaluations(),
            SelectorId::StepScale => self.step_scale.evaluations(),
            SelectorId::GraphAfterLayout => self.graph_after_layout.evaluations(),
            SelectorId::GraphWithStyles => self.graph_with_styles.evaluations(),
        }
    }
}

// ============================================================================
// Pipeline stages (pub)
// ============================================================================
impl TreeSession {
    /// The indexed source tree.
    ///
    /// # Errors
    /// [PhyloError::Parse] if the Newick source is invalid. The error is
    /// cached until the source changes.
    pub fn parsed(&mut self) -> Result<Rc<PhyloTree>, PhyloError> {
        let deps = (self.source.clone(),);
        self.parsed.get_or_compute(deps, |(source,)| {
            let raw = source.to_raw()?;
            Ok(Rc::new(indexer::index(raw)))
        })
    }

    /// The parsed tree with the subtrees of `rotated_ids` rotated, in order.
    /// Unknown ids are skipped.
    pub fn rotated(&mut self) -> Result<Rc<PhyloTree>, PhyloError> {
        let parsed = self.parsed()?;
        let deps = (parsed, self.props.rotated_ids.clone());
        Ok(self.rotated.get_or_compute(deps, |(tree, ids)| {
            let mut tree = PhyloTree::clone(tree);
            for id in ids.iter() {
                match tree.find(id) {
                    Some(index) => edit::rotate_subtree(&mut tree, index),
                    None => warn!(id = %id, "ignoring unknown rotated id"),
                }
            }
            Rc::new(tree)
        }))
    }

    /// The rotated tree with exactly the known `collapsed_ids` collapsed.
    pub fn collapsed(&mut self) -> Result<Rc<PhyloTree>, PhyloError> {
        let rotated = self.rotated()?;
        let deps = (rotated, self.props.collapsed_ids.clone());
        self.collapsed.get_or_compute(deps, |(tree, ids)| {
            let known = known_ids(tree, ids, "collapsed");
            let mut tree = PhyloTree::clone(tree);
            edit::set_collapsed(&mut tree, &known)?;
            Ok(Rc::new(tree))
        })
    }

    /// The collapsed tree viewed from `root_id` (the tree root if unset or
    /// unknown), with its visible leaves.
    pub fn graph_without_layout(&mut self) -> Result<Rc<GraphWithoutLayout>, PhyloError> {
        let collapsed = self.collapsed()?;
        let deps = (collapsed, self.props.root_id.clone());
        Ok(self.graph_without_layout.get_or_compute(deps, |(tree, root_id)| {
            let mut tree = PhyloTree::clone(tree);
            let view_root = match root_id.as_deref() {
                Some(id) => tree.find(id).unwrap_or_else(|| {
                    warn!(id, "unknown root id, showing the whole tree");
                    tree.root_index()
                }),
                None => tree.root_index(),
            };
            tree.set_view_root(view_root);
            let leaves = tree.visible_leaves_list();
            Rc::new(GraphWithoutLayout { tree, leaves })
        }))
    }

    /// The laid out graph in tree units.
    pub fn graph_before_layout(&mut self) -> Result<Rc<PositionedGraph>, PhyloError> {
        let without_layout = self.graph_without_layout()?;
        let deps = (without_layout, self.props.projection, self.props.align_labels);
        Ok(self.graph_before_layout.get_or_compute(deps, |(graph, projection, align_labels)| {
            let mut tree = graph.tree.clone();
            let bounds = layout::layout(&mut tree, *projection, *align_labels);
            Rc::new(PositionedGraph::new(tree, graph.leaves.clone(), bounds))
        }))
    }

    /// Drawing units per branch-length unit: default ratio times
    /// `2^branch_zoom`.
    pub fn branch_scale(&mut self) -> Result<f64, PhyloError> {
        let before_layout = self.graph_before_layout()?;
        let props = &self.props;
        let deps = (before_layout, props.projection, props.drawing_area, props.branch_zoom);
        Ok(self.branch_scale.get_or_compute(deps, |(graph, projection, area, zoom)| {
            let ratio = layout::branch_ratio(graph.tree(), *projection, graph.width, graph.height, area);
            ratio * layout::zoom_to_scale(*zoom)
        }))
    }

    /// Drawing units per visible leaf: default ratio times `2^step_zoom`.
    pub fn step_scale(&mut self) -> Result<f64, PhyloError> {
        let without_layout = self.graph_without_layout()?;
        let props = &self.props;
        let deps = (without_layout, props.projection, props.drawing_area, props.step_zoom);
        Ok(self.step_scale.get_or_compute(deps, |(graph, projection, area, zoom)| {
            layout::step_ratio(graph.tree(), *projection, area) * layout::zoom_to_scale(*zoom)
        }))
    }

    /// The laid out graph in drawing units.
    pub fn graph_after_layout(&mut self) -> Result<Rc<PositionedGraph>, PhyloError> {
        let before_layout = self.graph_before_layout()?;
        let branch_scale = self.branch_scale()?;
        let step_scale = self.step_scale()?;
        let deps = (before_layout, self.props.projection, branch_scale, step_scale);
        Ok(self.graph_after_layout.get_or_compute(deps, |(graph, projection, branch_scale, step_scale)| {
            let mut tree = graph.tree.clone();
            let bounds = layout::apply_scale(&mut tree, *projection, *branch_scale, *step_scale, &graph.bounds);
            Rc::new(PositionedGraph::new(tree, graph.leaves.clone(), bounds))
        }))
    }

    /// The scaled graph with resolved leaf styles.
    pub fn graph_with_styles(&mut self) -> Result<Rc<StyledGraph>, PhyloError> {
        let after_layout = self.graph_after_layout()?;
        let deps = (after_layout, self.props.styles.clone(), self.props.fill_colour.clone());
        let cache = &mut self.colour_cache;
        Ok(self.graph_with_styles.get_or_compute(deps, |(graph, styles, fill_colour)| {
            Rc::new(apply_styles(graph.clone(), styles, fill_colour, cache))
        }))
    }
}

// ============================================================================
// Editing (pub)
// ============================================================================
impl TreeSession {
    /// Reroots the displayed tree on the edge above `id` and makes the
    /// result the new source.
    ///
    /// Rotations, collapsed nodes and the view root refer to ids of the old
    /// topology and are reset.
    ///
    /// # Returns
    /// The Newick string of the new source.
    ///
    /// # Errors
    /// [PhyloError::Edit] if `id` is unknown; the session is unchanged.
    pub fn reroot(&mut self, id: &str) -> Result<String, PhyloError> {
        let tree = self.rotated()?;
        let raw = edit::reroot(&tree, id)?;
        Ok(self.replace_source(raw))
    }

    /// Roots the displayed tree at the midpoint of its longest leaf-to-leaf
    /// path and makes the result the new source, see [reroot](Self::reroot).
    pub fn midpoint_root(&mut self) -> Result<String, PhyloError> {
        let tree = self.rotated()?;
        let raw = edit::midpoint_root(&tree)?;
        Ok(self.replace_source(raw))
    }

    /// Sorts the children of every node by subtree size and makes the
    /// result the new source, see [reroot](Self::reroot).
    pub fn sort_children(&mut self, order: NodeOrder) -> Result<String, PhyloError> {
        let tree = self.rotated()?;
        let raw = edit::sort_children(&tree, order);
        Ok(self.replace_source(raw))
    }

    /// Toggles the rotation of the node `id`.
    ///
    /// # Returns
    /// The Newick string of the rotated tree.
    ///
    /// # Errors
    /// [PhyloError::Edit] if `id` is unknown; the session is unchanged.
    pub fn rotate(&mut self, id: &str) -> Result<String, PhyloError> {
        self.parsed()?.require(id)?;

        let mut rotated: Vec<String> = self.props.rotated_ids.to_vec();
        match rotated.iter().position(|r| r == id) {
            Some(position) => {
                rotated.remove(position);
            }
            None => rotated.push(id.to_string()),
        }
        self.update_props(|props| props.with_rotated_ids(rotated));

        let tree = self.rotated()?;
        Ok(newick::to_newick(&tree, &NewickOptions::default()))
    }

    /// Collapses the named nodes, keeping already collapsed ones.
    ///
    /// # Returns
    /// The Newick string of the full (uncollapsed) topology.
    ///
    /// # Errors
    /// [PhyloError::Edit] for the first unknown id; the session is unchanged.
    pub fn collapse<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<String, PhyloError> {
        let parsed = self.parsed()?;
        for id in ids {
            parsed.require(id.as_ref())?;
        }

        let mut collapsed: Vec<String> = self.props.collapsed_ids.to_vec();
        for id in ids {
            if !collapsed.iter().any(|c| c == id.as_ref()) {
                collapsed.push(id.as_ref().to_string());
            }
        }
        self.update_props(|props| props.with_collapsed_ids(collapsed));

        let tree = self.collapsed()?;
        Ok(newick::to_newick(&tree, &NewickOptions::default()))
    }

    /// Expands the named nodes, keeping other collapsed nodes collapsed.
    ///
    /// # Errors
    /// [PhyloError::Edit] for the first unknown id; the session is unchanged.
    pub fn expand<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<String, PhyloError> {
        let parsed = self.parsed()?;
        for id in ids {
            parsed.require(id.as_ref())?;
        }

        let collapsed: Vec<String> = self
            .props
            .collapsed_ids
            .iter()
            .filter(|c| !ids.iter().any(|id| id.as_ref() == c.as_str()))
            .cloned()
            .collect();
        self.update_props(|props| props.with_collapsed_ids(collapsed));

        let tree = self.collapsed()?;
        Ok(newick::to_newick(&tree, &NewickOptions::default()))
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
impl TreeSession {
    /// Makes `raw` the new Newick source and resets id based props.
    fn replace_source(&mut self, raw: RawTree) -> String {
        let newick = newick::raw_to_newick(&raw);
        debug!(nodes = raw.num_nodes(), "replacing source after edit");
        self.set_source(newick.clone());
        self.update_props(|props| {
            props
                .with_rotated_ids(Vec::<String>::new())
                .with_collapsed_ids(Vec::<String>::new())
                .without_root_id()
        });
        newick
    }
}

/// The ids in `ids` that exist in `tree`, warning about the others.
fn known_ids<'a>(tree: &PhyloTree, ids: &'a [String], kind: &str) -> Vec<&'a str> {
    ids.iter()
        .filter(|id| {
            let known = tree.find(id).is_some();
            if !known {
                warn!(id = %id, kind, "ignoring unknown id");
            }
            known
        })
        .map(String::as_str)
        .collect()
}
