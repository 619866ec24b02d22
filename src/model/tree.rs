//! Indexed phylogenetic trees.
//!
//! Provides [PhyloTree], the arena-backed tree produced by the
//! [indexer](crate::indexer). Besides the nodes it holds both traversal
//! orders and the id lookup table, which together allow O(1) subtree range
//! queries: the descendants of `n` are exactly
//! `preorder[n.pre_index .. n.pre_index + n.total_nodes]` and
//! `postorder[n.post_index + 1 - n.total_nodes ..= n.post_index]`.

use crate::error::EditError;
use crate::model::node::Node;
use crate::model::raw_tree::RawTree;
use std::collections::HashMap;
use std::ops::Range;

/// Index of a node in a tree arena.
pub type NodeIndex = usize;

/// Float comparison tolerance
const EPSILON: f64 = 1e-9;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A phylogenetic tree with dual traversal indices and subtree aggregates,
/// represented using the arena pattern on [Node].
///
/// Nodes are referenced by [NodeIndex], which is stable across rotations
/// and collapsing; only the indexer assigns arena positions.
///
/// # Structure
/// - `preorder` and `postorder` contain every node exactly once.
/// - `node_by_id` maps every node id to its arena index.
/// - `view_root` is the node layouts are computed for (defaults to `root`);
///   `distance_from_root` is relative to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PhyloTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,
    root: NodeIndex,
    view_root: NodeIndex,
    pub(crate) preorder: Vec<NodeIndex>,
    pub(crate) postorder: Vec<NodeIndex>,
    node_by_id: HashMap<String, NodeIndex>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl PhyloTree {
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        root: NodeIndex,
        preorder: Vec<NodeIndex>,
        postorder: Vec<NodeIndex>,
        node_by_id: HashMap<String, NodeIndex>,
    ) -> Self {
        PhyloTree {
            nodes,
            root,
            view_root: root,
            preorder,
            postorder,
            node_by_id,
        }
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    /// Returns a reference to the root node.
    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Returns the index of the node layouts are computed for.
    pub fn view_root_index(&self) -> NodeIndex {
        self.view_root
    }

    /// Returns the node layouts are computed for.
    pub fn view_root(&self) -> &Node {
        &self.nodes[self.view_root]
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index]
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Returns the number of nodes in this tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.root().total_leaves
    }

    /// Node indices in pre-order (parents before children).
    pub fn preorder(&self) -> &[NodeIndex] {
        &self.preorder
    }

    /// Node indices in post-order (children before parents).
    pub fn postorder(&self) -> &[NodeIndex] {
        &self.postorder
    }

    /// Lookup table from node id to node index.
    pub fn node_by_id(&self) -> &HashMap<String, NodeIndex> {
        &self.node_by_id
    }

    /// Finds the node with the given id.
    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.node_by_id.get(id).copied()
    }

    /// Finds the node with the given id or fails with
    /// [EditError::NodeNotFound].
    pub fn require(&self, id: &str) -> Result<NodeIndex, EditError> {
        self.find(id)
            .ok_or_else(|| EditError::NodeNotFound(id.to_string()))
    }

    /// Range of pre-order positions covered by the subtree of `index`.
    pub fn preorder_range(&self, index: NodeIndex) -> Range<usize> {
        let node = &self.nodes[index];
        node.pre_index..node.pre_index + node.total_nodes
    }

    /// Range of post-order positions covered by the subtree of `index`.
    pub fn postorder_range(&self, index: NodeIndex) -> Range<usize> {
        let node = &self.nodes[index];
        node.post_index + 1 - node.total_nodes..node.post_index + 1
    }

    /// The subtree of `index` in pre-order, starting with `index` itself.
    pub fn subtree_preorder(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.preorder[self.preorder_range(index)]
    }

    /// The subtree of `index` in post-order, ending with `index` itself.
    pub fn subtree_postorder(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.postorder[self.postorder_range(index)]
    }

    /// Returns whether `descendant` lies in the subtree of `ancestor`
    /// (a node is its own descendant).
    pub fn is_descendant(&self, ancestor: NodeIndex, descendant: NodeIndex) -> bool {
        self.preorder_range(ancestor)
            .contains(&self.nodes[descendant].pre_index)
    }

    /// Iterates the leaves in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.preorder
            .iter()
            .copied()
            .filter(|&i| self.nodes[i].is_leaf)
    }

    /// Returns the nodes of the view subtree that are drawn, in pre-order.
    ///
    /// A collapsed node is included, its descendants are skipped by jumping
    /// over its pre-order range. Collapse state above the view root is
    /// ignored.
    pub fn visible_preorder(&self) -> Vec<NodeIndex> {
        let range = self.preorder_range(self.view_root);
        let mut visible = Vec::with_capacity(self.nodes[self.view_root].total_nodes);
        let mut i = range.start;
        while i < range.end {
            let index = self.preorder[i];
            visible.push(index);
            if self.nodes[index].is_collapsed {
                i += self.nodes[index].total_nodes - 1;
            }
            i += 1;
        }
        visible
    }

    /// Returns the visible leaves of the view subtree in pre-order,
    /// skipping collapsed subtrees entirely.
    pub fn visible_leaves_list(&self) -> Vec<NodeIndex> {
        self.visible_preorder()
            .into_iter()
            .filter(|&i| self.nodes[i].is_leaf && !self.nodes[i].is_collapsed)
            .collect()
    }

    /// Makes `index` the view root and recomputes `distance_from_root`
    /// relative to it for its subtree.
    pub fn set_view_root(&mut self, index: NodeIndex) {
        self.view_root = index;
        let range = self.preorder_range(index);
        self.nodes[index].distance_from_root = 0.0;
        for position in range.start + 1..range.end {
            let node_index = self.preorder[position];
            if let Some(parent) = self.nodes[node_index].parent {
                self.nodes[node_index].distance_from_root =
                    self.nodes[parent].distance_from_root + self.nodes[node_index].branch_length;
            }
        }
    }
}

// ============================================================================
// Conversion back to raw trees (pub)
// ============================================================================
impl PhyloTree {
    /// Copies the subtree of `source` into `raw`, attaching it below
    /// `raw_parent` (or replacing the data of the raw root if `None`),
    /// and returns the raw index of the copy of `source`.
    ///
    /// Walks the contiguous pre-order range, so no recursion is needed.
    pub fn copy_subtree_into(
        &self,
        source: NodeIndex,
        raw: &mut RawTree,
        raw_parent: Option<NodeIndex>,
    ) -> NodeIndex {
        let mut mapped: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        for &index in self.subtree_preorder(source) {
            let node = &self.nodes[index];
            let label = node.label.clone();
            let branch_length = Some(node.branch_length);

            // Pre-order guarantees the parent of every non-source node is mapped
            let copied_parent = node.parent.and_then(|p| mapped.get(&p).copied());
            let new_index = match (index == source, copied_parent, raw_parent) {
                (false, Some(parent), _) | (true, _, Some(parent)) => {
                    raw.add_child(parent, label, branch_length)
                }
                _ => {
                    let root = raw.root_index();
                    raw[root].label = label;
                    raw[root].branch_length = branch_length;
                    root
                }
            };
            mapped.insert(index, new_index);
        }

        mapped[&source]
    }

    /// Copies the whole tree (topology, labels, branch lengths) into a new
    /// [RawTree], e.g. for re-serialisation or re-indexing.
    pub fn to_raw(&self) -> RawTree {
        let mut raw = RawTree::with_capacity(self.num_nodes());
        self.copy_subtree_into(self.root, &mut raw, None);
        raw
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl PhyloTree {
    /// Validates the traversal and aggregate invariants.
    ///
    /// Checks:
    /// - Both traversals contain every node exactly once
    /// - `preorder[n.pre_index] == n` and `postorder[n.post_index] == n`
    /// - Subtree counts and contiguous subtree ranges
    /// - Parent/child links agree
    /// - `distance_from_root` is consistent from the view root down
    ///
    /// # Errors
    /// [EditError::InvariantViolation] describing the first broken invariant.
    pub fn check_invariants(&self) -> Result<(), EditError> {
        let violation = |msg: String| Err(EditError::InvariantViolation(msg));
        let n = self.nodes.len();

        if self.preorder.len() != n || self.postorder.len() != n {
            return violation(format!(
                "traversal lengths {} / {} do not match node count {}",
                self.preorder.len(),
                self.postorder.len(),
                n
            ));
        }
        if self.root().total_nodes != n {
            return violation(format!(
                "root counts {} nodes but tree has {}",
                self.root().total_nodes,
                n
            ));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if self.preorder.get(node.pre_index) != Some(&index) {
                return violation(format!("pre-order position of node '{}' is stale", node.id));
            }
            if self.postorder.get(node.post_index) != Some(&index) {
                return violation(format!("post-order position of node '{}' is stale", node.id));
            }
            if node.is_leaf != node.children.is_empty() {
                return violation(format!("leaf flag of node '{}' is wrong", node.id));
            }

            let mut total_nodes = 1;
            let mut total_leaves = usize::from(node.is_leaf);
            let mut next_pre = node.pre_index + 1;
            for &child in &node.children {
                let child_node = &self.nodes[child];
                if child_node.parent != Some(index) {
                    return violation(format!("child '{}' does not point back to its parent", child_node.id));
                }
                if child_node.pre_index != next_pre {
                    return violation(format!("subtree of '{}' is not contiguous in pre-order", node.id));
                }
                next_pre += child_node.total_nodes;
                total_nodes += child_node.total_nodes;
                total_leaves += child_node.total_leaves;
            }
            if total_nodes != node.total_nodes || total_leaves != node.total_leaves {
                return violation(format!("subtree counts of node '{}' are wrong", node.id));
            }
            if node.post_index + 1 < node.total_nodes {
                return violation(format!("subtree of '{}' overflows post-order", node.id));
            }
            if let Some(&first) = self.subtree_postorder(index).first() {
                if !self.is_descendant(index, first) {
                    return violation(format!("subtree of '{}' is not contiguous in post-order", node.id));
                }
            }
            if self.node_by_id.get(&node.id) != Some(&index) {
                return violation(format!("id '{}' is not registered", node.id));
            }
        }

        if self.view_root().distance_from_root != 0.0 {
            return violation("view root is not at distance 0".to_string());
        }
        for &index in &self.subtree_preorder(self.view_root)[1..] {
            let node = &self.nodes[index];
            let parent = node.parent.map(|p| self.nodes[p].distance_from_root).unwrap_or(0.0);
            if (parent + node.branch_length - node.distance_from_root).abs() > EPSILON {
                return violation(format!("distance from root of '{}' is inconsistent", node.id));
            }
        }

        Ok(())
    }
}

impl std::ops::Index<NodeIndex> for PhyloTree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}
