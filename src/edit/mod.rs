//! Structural editing of indexed trees.
//!
//! Edits come in two flavours:
//!
//! | Edit | Input | Output |
//! |------|-------|--------|
//! | [reroot], [reroot_at], [midpoint_root], [sort_children] | `&PhyloTree` | new [RawTree](crate::model::RawTree), to be re-indexed |
//! | [rotate_subtree], [collapse], [expand], [set_collapsed] | `&mut PhyloTree` | in place, invariants re-established before returning |
//!
//! Edits that change the shape or rooting of a tree never touch their input;
//! a failed edit therefore always leaves the prior state intact.

pub mod collapse;
pub mod midpoint;
pub mod order;
pub mod reroot;
pub mod rotate;

pub use collapse::{collapse, expand, recompute_visibility, set_collapsed};
pub use midpoint::{diameter, midpoint_root};
pub use order::{NodeOrder, sort_children};
pub use reroot::{reroot, reroot_at};
pub use rotate::{rotate, rotate_subtree};

use crate::model::PhyloTree;

/// Cumulative branch length from the tree root (not the view root) of every
/// node, indexed by arena position.
pub(crate) fn root_distances(tree: &PhyloTree) -> Vec<f64> {
    let mut distances = vec![0.0; tree.num_nodes()];
    for &index in &tree.preorder()[1..] {
        let node = tree.node(index);
        if let Some(parent) = node.parent() {
            distances[index] = distances[parent] + node.branch_length();
        }
    }
    distances
}
