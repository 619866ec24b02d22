//! Subtree rotation.

use crate::error::EditError;
use crate::model::{NodeIndex, PhyloTree};

/// Rotates the subtree of the node `id`, see [rotate_subtree].
///
/// # Errors
/// [EditError::NodeNotFound] if `id` is not in the tree.
pub fn rotate(tree: &mut PhyloTree, id: &str) -> Result<(), EditError> {
    let index = tree.require(id)?;
    rotate_subtree(tree, index);
    Ok(())
}

/// Reverses the children of `index` and moves the children's blocks in both
/// traversals accordingly.
///
/// Every child subtree occupies a contiguous block in pre-order and in
/// post-order, so the blocks are spliced in reverse order and only the
/// indices inside the subtree of `index` are re-assigned. Applying this
/// twice is the identity. Layout coordinates become stale.
pub fn rotate_subtree(tree: &mut PhyloTree, index: NodeIndex) {
    let children: Vec<NodeIndex> = tree.node(index).children().to_vec();
    if children.len() < 2 {
        return;
    }

    let pre_start = tree.node(index).pre_index() + 1;
    let post_start = tree.postorder_range(index).start;

    let mut preorder = Vec::with_capacity(tree.node(index).total_nodes() - 1);
    let mut postorder = Vec::with_capacity(tree.node(index).total_nodes() - 1);
    for &child in children.iter().rev() {
        preorder.extend_from_slice(tree.subtree_preorder(child));
        postorder.extend_from_slice(tree.subtree_postorder(child));
    }

    let pre_end = pre_start + preorder.len();
    let post_end = post_start + postorder.len();
    tree.preorder.splice(pre_start..pre_end, preorder);
    tree.postorder.splice(post_start..post_end, postorder);

    for position in pre_start..pre_end {
        let node = tree.preorder[position];
        tree.node_mut(node).pre_index = position;
    }
    for position in post_start..post_end {
        let node = tree.postorder[position];
        tree.node_mut(node).post_index = position;
    }

    tree.node_mut(index).children.reverse();
}
