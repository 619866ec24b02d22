//! Collapsing and expanding subtrees.

use crate::error::EditError;
use crate::model::{NodeIndex, PhyloTree};

/// Marks the named nodes as collapsed, keeping already collapsed ones.
///
/// The root and leaves are never collapsed; naming them is not an error.
///
/// # Errors
/// [EditError::NodeNotFound] for the first unknown id; nothing is changed.
pub fn collapse<S: AsRef<str>>(tree: &mut PhyloTree, ids: &[S]) -> Result<(), EditError> {
    let indices = resolve(tree, ids)?;
    for index in indices {
        mark(tree, index, true);
    }
    recompute_visibility(tree);
    Ok(())
}

/// Expands the named nodes, keeping other collapsed nodes collapsed.
///
/// # Errors
/// [EditError::NodeNotFound] for the first unknown id; nothing is changed.
pub fn expand<S: AsRef<str>>(tree: &mut PhyloTree, ids: &[S]) -> Result<(), EditError> {
    let indices = resolve(tree, ids)?;
    for index in indices {
        mark(tree, index, false);
    }
    recompute_visibility(tree);
    Ok(())
}

/// Makes exactly the named nodes collapsed.
///
/// # Errors
/// [EditError::NodeNotFound] for the first unknown id; nothing is changed.
pub fn set_collapsed<S: AsRef<str>>(tree: &mut PhyloTree, ids: &[S]) -> Result<(), EditError> {
    let indices = resolve(tree, ids)?;
    for node in tree.nodes_mut() {
        node.is_collapsed = false;
    }
    for index in indices {
        mark(tree, index, true);
    }
    recompute_visibility(tree);
    Ok(())
}

/// Recomputes `is_hidden` top-down and `visible_leaves` bottom-up from the
/// current collapse flags.
pub fn recompute_visibility(tree: &mut PhyloTree) {
    for position in 0..tree.num_nodes() {
        let index = tree.preorder()[position];
        let hidden = match tree.node(index).parent() {
            Some(parent) => {
                let parent = tree.node(parent);
                parent.is_collapsed || parent.is_hidden
            }
            None => false,
        };
        tree.node_mut(index).is_hidden = hidden;
    }

    for position in 0..tree.num_nodes() {
        let index = tree.postorder()[position];
        let node = tree.node(index);
        let visible_leaves = if node.is_tip() {
            1
        } else {
            node.children().iter().map(|&c| tree.node(c).visible_leaves).sum()
        };
        tree.node_mut(index).visible_leaves = visible_leaves;
    }
}

fn resolve<S: AsRef<str>>(tree: &PhyloTree, ids: &[S]) -> Result<Vec<NodeIndex>, EditError> {
    ids.iter().map(|id| tree.require(id.as_ref())).collect()
}

fn mark(tree: &mut PhyloTree, index: NodeIndex, collapsed: bool) {
    let is_root = tree.node(index).parent().is_none();
    let node = tree.node_mut(index);
    if !collapsed || (!is_root && !node.is_leaf) {
        node.is_collapsed = collapsed;
    }
}
