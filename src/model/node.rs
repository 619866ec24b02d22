//! Node of an indexed phylogenetic tree.

use crate::model::NodeIndex;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// A node of a [PhyloTree](crate::model::PhyloTree).
///
/// Structural fields come from the parser, derived fields are written by the
/// [indexer](crate::indexer), collapse state by the
/// [editor](crate::edit) and the coordinates by the [layout](crate::layout)
/// engine. Consumers outside this crate only read them.
///
/// # Invariants
/// - `children` is empty iff `is_leaf`
/// - `branch_length` is non-negative and finite
/// - `total_nodes == 1 + Σ children.total_nodes`, same for `total_leaves`
/// - `is_hidden` iff a strict ancestor is collapsed or hidden
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    // Structure
    pub(crate) id: String,
    pub(crate) label: Option<String>,
    pub(crate) branch_length: f64,
    pub(crate) children: Vec<NodeIndex>,
    pub(crate) parent: Option<NodeIndex>,

    // Traversal indices and aggregates
    pub(crate) is_leaf: bool,
    pub(crate) pre_index: usize,
    pub(crate) post_index: usize,
    pub(crate) total_nodes: usize,
    pub(crate) total_leaves: usize,
    pub(crate) total_subtree_length: f64,
    pub(crate) distance_from_root: f64,

    // Collapse state
    pub(crate) is_collapsed: bool,
    pub(crate) is_hidden: bool,
    pub(crate) visible_leaves: usize,

    // Layout output
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) cx: f64,
    pub(crate) cy: f64,
    pub(crate) angle: f64,
    pub(crate) coangle: f64,
    pub(crate) angle_degrees: f64,
    pub(crate) inverted: bool,
}

impl Node {
    /// Creates a node with structural data only; everything else is
    /// filled in by the indexer.
    pub(crate) fn new(
        label: Option<String>,
        branch_length: f64,
        parent: Option<NodeIndex>,
        children: Vec<NodeIndex>,
    ) -> Self {
        Node {
            id: String::new(),
            label,
            branch_length,
            is_leaf: children.is_empty(),
            children,
            parent,
            pre_index: 0,
            post_index: 0,
            total_nodes: 1,
            total_leaves: 1,
            total_subtree_length: 0.0,
            distance_from_root: 0.0,
            is_collapsed: false,
            is_hidden: false,
            visible_leaves: 1,
            x: 0.0,
            y: 0.0,
            cx: 0.0,
            cy: 0.0,
            angle: 0.0,
            coangle: 0.0,
            angle_degrees: 0.0,
            inverted: false,
        }
    }

    /// Unique id (label of a leaf, otherwise synthesised from the pre-order index).
    ///
    /// Ids are assigned in pre-order and the first claim wins. A numeric
    /// leaf label that equals the pre-order index of an earlier internal
    /// node is therefore renamed to `<label>_<pre_index>`: in `((1,2),3);`
    /// the id `"1"` names the cherry and the leaf labelled `1` has id `"1_2"`.
    /// Edits, collapsed ids and styles address nodes by id, so such a leaf
    /// must be named by its renamed id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Label as written in the source.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Distance to the parent.
    pub fn branch_length(&self) -> f64 {
        self.branch_length
    }

    /// Ordered children.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Parent, `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Position in the pre-order traversal.
    pub fn pre_index(&self) -> usize {
        self.pre_index
    }

    /// Position in the post-order traversal.
    pub fn post_index(&self) -> usize {
        self.post_index
    }

    /// Number of nodes in the subtree, this node included.
    pub fn total_nodes(&self) -> usize {
        self.total_nodes
    }

    /// Number of leaves in the subtree.
    pub fn total_leaves(&self) -> usize {
        self.total_leaves
    }

    /// Largest cumulative branch length from this node down to a leaf.
    pub fn total_subtree_length(&self) -> f64 {
        self.total_subtree_length
    }

    /// Cumulative branch length from the (view) root.
    pub fn distance_from_root(&self) -> f64 {
        self.distance_from_root
    }

    /// Whether this node is collapsed into a single visible tip.
    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    /// Whether an ancestor of this node is collapsed.
    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    /// Number of visible tips in the subtree (leaves and collapsed nodes).
    pub fn visible_leaves(&self) -> usize {
        self.visible_leaves
    }

    /// Horizontal coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Circular projection: horizontal anchor of the radial connector.
    pub fn cx(&self) -> f64 {
        self.cx
    }

    /// Circular projection: vertical anchor of the radial connector.
    pub fn cy(&self) -> f64 {
        self.cy
    }

    /// Direction of the node in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// `angle + π/2`, for label orientation.
    pub fn coangle(&self) -> f64 {
        self.coangle
    }

    /// Direction in degrees in `[0, 360)`, measured clockwise for screen space.
    pub fn angle_degrees(&self) -> f64 {
        self.angle_degrees
    }

    /// Whether labels of this node read right-to-left.
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Whether this node is drawn as a tip (leaf or collapsed subtree).
    pub(crate) fn is_tip(&self) -> bool {
        self.is_leaf || self.is_collapsed
    }
}
