//! Traversal indexer.
//!
//! Turns a [RawTree] into a [PhyloTree] by a fixed sequence of linear
//! passes, all with explicit stacks:
//!
//! 1. Pre-order: build the arena (arena index == `pre_index`), normalise
//!    branch lengths and link parents
//! 2. Post-order: assign `post_index`
//! 3. Cladogram detection: if every branch length is 0, every non-root
//!    node gets length 1
//! 4. Bottom-up aggregates: `total_nodes`, `total_leaves`,
//!    `total_subtree_length`
//! 5. Pre-order: ids, id lookup, visible leaves
//! 6. Pre-order: `distance_from_root`
//!
//! Re-running the indexer is the only way to restore the invariants after
//! an edit that changes the shape of a tree.

use crate::model::{Node, NodeIndex, PhyloTree, RawTree};
use std::collections::HashMap;
use tracing::debug;

/// Marker for raw nodes not reachable from the raw root
const UNMAPPED: NodeIndex = usize::MAX;

/// Indexes a raw tree.
///
/// Only nodes reachable from the raw root are taken over. The raw tree must
/// be a tree (every node reachable at most once); this holds for anything
/// built through [RawTree::add_child].
///
/// # Arguments
/// * `raw` - The tree to index, consumed to move labels out of it
///
/// # Returns
/// A [PhyloTree] satisfying all traversal and aggregate invariants, with the
/// view root set to the root.
pub fn index(mut raw: RawTree) -> PhyloTree {
    let order: Vec<NodeIndex> = raw.preorder().collect();
    let num_nodes = order.len();

    let mut arena_of = vec![UNMAPPED; raw.num_nodes()];
    for (position, &raw_index) in order.iter().enumerate() {
        arena_of[raw_index] = position;
    }

    // 1. Arena in pre-order
    let mut nodes: Vec<Node> = Vec::with_capacity(num_nodes);
    for (position, &raw_index) in order.iter().enumerate() {
        let raw_node = &mut raw[raw_index];
        let children = raw_node.children.iter().map(|&c| arena_of[c]).collect();
        let mut node = Node::new(
            raw_node.label.take(),
            normalise_branch_length(raw_node.branch_length),
            None,
            children,
        );
        node.pre_index = position;
        nodes.push(node);
    }
    for parent in 0..num_nodes {
        for k in 0..nodes[parent].children.len() {
            let child = nodes[parent].children[k];
            nodes[child].parent = Some(parent);
        }
    }
    let preorder: Vec<NodeIndex> = (0..num_nodes).collect();

    // 2. Post-order
    let postorder = assign_postorder(&mut nodes);

    // 3. Cladogram
    let is_cladogram = num_nodes > 1 && nodes.iter().all(|n| n.branch_length == 0.0);
    if is_cladogram {
        for node in nodes.iter_mut().skip(1) {
            node.branch_length = 1.0;
        }
    }

    // 4. Aggregates
    for &index in &postorder {
        let (mut total_nodes, mut total_leaves, mut subtree_length) = (1, 0, 0.0f64);
        if nodes[index].children.is_empty() {
            total_leaves = 1;
        }
        for &child in &nodes[index].children {
            let child = &nodes[child];
            total_nodes += child.total_nodes;
            total_leaves += child.total_leaves;
            subtree_length = subtree_length.max(child.total_subtree_length + child.branch_length);
        }
        let node = &mut nodes[index];
        node.total_nodes = total_nodes;
        node.total_leaves = total_leaves;
        node.total_subtree_length = subtree_length;
    }

    // 5. Ids
    let mut node_by_id: HashMap<String, NodeIndex> = HashMap::with_capacity(num_nodes);
    for (position, node) in nodes.iter_mut().enumerate() {
        let mut id = match &node.label {
            Some(label) if node.is_leaf && !label.is_empty() => label.clone(),
            _ => position.to_string(),
        };
        while node_by_id.contains_key(&id) {
            id = format!("{id}_{position}");
        }
        node_by_id.insert(id.clone(), position);
        node.id = id;
        node.visible_leaves = node.total_leaves;
        node.is_collapsed = false;
        node.is_hidden = false;
    }

    // 6. Distances (arena order is pre-order)
    for index in 1..num_nodes {
        if let Some(parent) = nodes[index].parent {
            nodes[index].distance_from_root =
                nodes[parent].distance_from_root + nodes[index].branch_length;
        }
    }

    debug!(
        nodes = num_nodes,
        leaves = nodes.first().map_or(0, |root| root.total_leaves),
        cladogram = is_cladogram,
        "indexed tree"
    );

    PhyloTree::from_parts(nodes, 0, preorder, postorder, node_by_id)
}

/// Assigns `post_index` to every node reachable from arena index 0 and
/// returns the post-order.
pub(crate) fn assign_postorder(nodes: &mut [Node]) -> Vec<NodeIndex> {
    let mut postorder = Vec::with_capacity(nodes.len());
    if nodes.is_empty() {
        return postorder;
    }

    let mut stack: Vec<(NodeIndex, bool)> = vec![(0, false)]; // (index, children_visited)
    while let Some((index, children_visited)) = stack.pop() {
        if children_visited || nodes[index].children.is_empty() {
            nodes[index].post_index = postorder.len();
            postorder.push(index);
        } else {
            stack.push((index, true));
            for &child in nodes[index].children.iter().rev() {
                stack.push((child, false));
            }
        }
    }

    postorder
}

/// Absolute value of a branch length; missing or non-finite lengths are 0.
fn normalise_branch_length(branch_length: Option<f64>) -> f64 {
    match branch_length {
        Some(length) if length.is_finite() => length.abs(),
        _ => 0.0,
    }
}
