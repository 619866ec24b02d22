//! Raw (not yet indexed) trees.
//!
//! A [RawTree] is what the Newick parser and the structural editor produce:
//! an arena of [RawNode]s carrying only label, branch length and ordered
//! children. All derived data is added by the [indexer](crate::indexer).
//!
//! [NodeData] is the nested, serde-friendly form used by pre-parsed
//! [Source::Graph](crate::session::Source::Graph) inputs.

use crate::model::NodeIndex;
use serde::{Deserialize, Serialize};

// =#========================================================================#=
// RAW NODE
// =#========================================================================$=
/// A node of a [RawTree].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawNode {
    /// Label as written in the source (unquoted), if any
    pub label: Option<String>,
    /// Distance to parent as written in the source, if any
    pub branch_length: Option<f64>,
    /// Ordered children (arena indices)
    pub children: Vec<NodeIndex>,
}

impl RawNode {
    /// Creates a childless node.
    pub fn new(label: Option<String>, branch_length: Option<f64>) -> Self {
        Self {
            label,
            branch_length,
            children: Vec::new(),
        }
    }

    /// Returns whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// =#========================================================================#=
// RAW TREE
// =#========================================================================$=
/// An unindexed tree stored in an arena.
///
/// # Structure
/// - The root is created together with the tree and can be replaced
///   with [`set_root`](Self::set_root).
/// - Nodes are only ever appended; every node created through
///   [`add_child`](Self::add_child) is reachable from the root.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTree {
    nodes: Vec<RawNode>,
    root: NodeIndex,
}

impl Default for RawTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RawTree {
    /// Creates a tree consisting of a single unlabelled root.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a tree consisting of a single unlabelled root,
    /// with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(RawNode::default());
        Self { nodes, root: 0 }
    }

    /// Index of the root node.
    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    /// The root node.
    pub fn root(&self) -> &RawNode {
        &self.nodes[self.root]
    }

    /// Makes `index` the root. Nodes not reachable from it are ignored
    /// by the indexer.
    pub fn set_root(&mut self, index: NodeIndex) {
        self.root = index;
    }

    /// Adds a detached node and returns its index.
    pub fn add_node(&mut self, label: Option<String>, branch_length: Option<f64>) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(RawNode::new(label, branch_length));
        index
    }

    /// Adds a node as the last child of `parent` and returns its index.
    ///
    /// # Panics
    /// Panics if `parent` is out of bounds.
    pub fn add_child(
        &mut self,
        parent: NodeIndex,
        label: Option<String>,
        branch_length: Option<f64>,
    ) -> NodeIndex {
        let index = self.add_node(label, branch_length);
        self.nodes[parent].children.push(index);
        index
    }

    /// Number of nodes in the arena.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves reachable from the root.
    pub fn num_leaves(&self) -> usize {
        self.preorder().filter(|&i| self.nodes[i].is_leaf()).count()
    }

    /// Iterates the node indices reachable from the root in pre-order,
    /// using an explicit stack.
    pub fn preorder(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let index = stack.pop()?;
            stack.extend(self.nodes[index].children.iter().rev().copied());
            Some(index)
        })
    }

    /// Builds a raw tree from its nested form without recursion.
    pub fn from_node_data(data: &NodeData) -> Self {
        let mut tree = RawTree::new();
        tree.nodes[0] = RawNode::new(data.name.clone(), data.branch_length);

        let mut stack: Vec<(&NodeData, NodeIndex)> = vec![(data, 0)];
        while let Some((node_data, index)) = stack.pop() {
            for child in &node_data.children {
                let child_index = tree.add_child(index, child.name.clone(), child.branch_length);
                stack.push((child, child_index));
            }
        }

        tree
    }

    /// Converts this tree into its nested form without recursion.
    pub fn to_node_data(&self) -> NodeData {
        let order: Vec<NodeIndex> = self.preorder().collect();
        let mut built: Vec<Option<NodeData>> = vec![None; self.nodes.len()];

        // Reverse pre-order visits every child before its parent
        for &index in order.iter().rev() {
            let node = &self.nodes[index];
            let children = node
                .children
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[index] = Some(NodeData {
                name: node.label.clone(),
                branch_length: node.branch_length,
                children,
            });
        }

        built[self.root].take().unwrap_or_default()
    }
}

impl std::ops::Index<NodeIndex> for RawTree {
    type Output = RawNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

impl std::ops::IndexMut<NodeIndex> for RawTree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

// =#========================================================================#=
// NODE DATA (nested form)
// =#========================================================================$=
/// Nested node description, as found in the `data` field of a pre-parsed
/// `{ "type": "biojs", "data": ... }` source envelope.
///
/// Deserialisation of the nested form is recursive in serde, so very deep
/// trees should be supplied as Newick text instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeData {
    /// Node name, if any
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Distance to parent, if any
    #[serde(
        default,
        rename = "branchLength",
        alias = "branch_length",
        skip_serializing_if = "Option::is_none"
    )]
    pub branch_length: Option<f64>,
    /// Ordered children
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeData>,
}
