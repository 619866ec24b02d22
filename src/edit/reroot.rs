//! Rerooting on an edge.

use crate::error::EditError;
use crate::model::{NodeIndex, PhyloTree, RawTree};
use tracing::debug;

/// Reroots the tree on the midpoint of the edge above the node `id`.
///
/// See [reroot_at] for the construction. Rerooting on the root itself, or a
/// single-node tree, returns the unchanged topology.
///
/// # Errors
/// * [EditError::NodeNotFound] - `id` is not in the tree
/// * [EditError::InvariantViolation] - the node-count or leaf-set check failed
///
/// # Example
/// ```
/// use phylograph::edit::reroot;
/// use phylograph::newick::raw_to_newick;
///
/// let tree = phylograph::parse_newick_str("((A:1,B:1):2,C:3);").unwrap();
/// let rerooted = reroot(&tree, "C").unwrap();
/// assert_eq!(raw_to_newick(&rerooted), "((A:1,B:1):3.5,C:1.5);");
/// ```
pub fn reroot(tree: &PhyloTree, id: &str) -> Result<RawTree, EditError> {
    let index = tree.require(id)?;
    let below = tree.node(index).branch_length() / 2.0;
    reroot_at(tree, index, below)
}

/// Reroots the tree on the edge above `index`, placing the new root at
/// distance `below` from `index`.
///
/// The path from `index` up to the old root is reversed: each ancestor is
/// re-attached below its former child, keeping its other children. The new
/// root is an unlabelled node with two children, the reversed path and
/// `index`; all leaf-to-leaf path lengths are preserved. A former root that
/// is left with a single child is suppressed (its edge merged into that
/// child), one left without children is dropped, and so is any copy on the
/// reversed path that the drop leaves without children.
///
/// # Arguments
/// * `tree` - The tree, only borrowed
/// * `index` - Node below the new root
/// * `below` - Length of the new edge to `index`, clamped to
///   `[0, branch_length(index)]`
///
/// # Errors
/// [EditError::InvariantViolation] if the result does not contain every
/// node exactly once plus the new root, minus the suppressed copies, or if
/// its leaves differ from the original leaves.
pub fn reroot_at(tree: &PhyloTree, index: NodeIndex, below: f64) -> Result<RawTree, EditError> {
    let node = tree.node(index);
    let Some(parent) = node.parent() else {
        return Ok(tree.to_raw());
    };

    let branch_length = node.branch_length();
    let below = below.clamp(0.0, branch_length);

    let mut raw = RawTree::with_capacity(tree.num_nodes() + 1);
    let new_root = raw.root_index();

    // Reversed path, hanging off the new root
    let mut path: Vec<(NodeIndex, NodeIndex)> = Vec::new();
    let mut attach_to = new_root;
    let mut from = index;
    let mut ancestor = parent;
    let mut length = branch_length - below;
    loop {
        let ancestor_node = tree.node(ancestor);
        let copy = raw.add_child(attach_to, ancestor_node.label().map(str::to_string), Some(length));
        path.push((attach_to, copy));
        for &child in ancestor_node.children() {
            if child != from {
                tree.copy_subtree_into(child, &mut raw, Some(copy));
            }
        }

        match ancestor_node.parent() {
            Some(next) => {
                length = ancestor_node.branch_length();
                attach_to = copy;
                from = ancestor;
                ancestor = next;
            }
            None => break,
        }
    }
    let suppressed = suppress_path_end(&mut raw, &path);

    // The node itself
    let copy = tree.copy_subtree_into(index, &mut raw, Some(new_root));
    raw[copy].branch_length = Some(below);

    let expected = tree.num_nodes() + 1 - suppressed;
    let actual = raw.preorder().count();
    if actual != expected {
        return Err(EditError::InvariantViolation(format!(
            "node count mismatch after rerooting: expected {expected}, found {actual}"
        )));
    }

    let mut leaves_before: Vec<Option<&str>> = tree.leaves().map(|l| tree.node(l).label()).collect();
    let mut leaves_after: Vec<Option<&str>> = raw
        .preorder()
        .filter(|&i| raw[i].is_leaf())
        .map(|i| raw[i].label.as_deref())
        .collect();
    leaves_before.sort_unstable();
    leaves_after.sort_unstable();
    if leaves_before != leaves_after {
        return Err(EditError::InvariantViolation(format!(
            "leaf set changed after rerooting: {} leaves before, {} after",
            leaves_before.len(),
            leaves_after.len()
        )));
    }

    debug!(node = tree.node(index).id(), nodes = actual, "rerooted tree");
    Ok(raw)
}

/// Removes the copy of the former root if it has fewer than two children,
/// merging its edge into a single remaining child.
///
/// Dropping a childless copy can leave its parent on the reversed path
/// childless or unary in turn, so the walk continues up the path until a
/// copy keeps two or more children or one is merged.
///
/// # Arguments
/// * `raw` - Tree under construction
/// * `path` - `(parent, copy)` pairs of the reversed path, former root last
///
/// # Returns
/// Number of copies removed.
fn suppress_path_end(raw: &mut RawTree, path: &[(NodeIndex, NodeIndex)]) -> usize {
    let mut removed = 0;
    for &(parent, copy) in path.iter().rev() {
        let Some(position) = raw[parent].children.iter().position(|&c| c == copy) else {
            break;
        };
        match raw[copy].children.len() {
            0 => {
                raw[parent].children.remove(position);
                removed += 1;
            }
            1 => {
                let only = raw[copy].children[0];
                let merged = raw[copy].branch_length.unwrap_or(0.0) + raw[only].branch_length.unwrap_or(0.0);
                raw[only].branch_length = Some(merged);
                raw[parent].children[position] = only;
                return removed + 1;
            }
            _ => break,
        }
    }
    removed
}
