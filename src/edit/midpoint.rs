//! Midpoint rooting.

use crate::edit::reroot::reroot_at;
use crate::edit::root_distances;
use crate::error::EditError;
use crate::model::{NodeIndex, PhyloTree, RawTree};
use tracing::debug;

/// The longest leaf-to-leaf path of a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diameter {
    /// Path length
    pub length: f64,
    /// End of the path farther from the root
    pub deeper: NodeIndex,
    /// Other end of the path
    pub other: NodeIndex,
}

/// Computes the diameter of a tree in one post-order pass.
///
/// For every internal node the two deepest leaves below different children
/// are combined, giving `dist(a) + dist(b) - 2·dist(node)` for the pair
/// whose lowest common ancestor is that node.
///
/// # Returns
/// `None` for trees with fewer than two leaves.
pub fn diameter(tree: &PhyloTree) -> Option<Diameter> {
    let distances = root_distances(tree);
    // Deepest leaf below every node: (distance from root, leaf)
    let mut deepest: Vec<(f64, NodeIndex)> = vec![(0.0, 0); tree.num_nodes()];
    let mut best: Option<Diameter> = None;

    for &index in tree.postorder() {
        let node = tree.node(index);
        if node.is_leaf() {
            deepest[index] = (distances[index], index);
            continue;
        }

        let mut first: Option<(f64, NodeIndex)> = None;
        let mut second: Option<(f64, NodeIndex)> = None;
        for &child in node.children() {
            let candidate = deepest[child];
            if first.is_none_or(|f| candidate.0 > f.0) {
                second = first;
                first = Some(candidate);
            } else if second.is_none_or(|s| candidate.0 > s.0) {
                second = Some(candidate);
            }
        }

        if let Some(first) = first {
            deepest[index] = first;
            if let Some(second) = second {
                let length = first.0 + second.0 - 2.0 * distances[index];
                if best.is_none_or(|b| length > b.length) {
                    best = Some(Diameter {
                        length,
                        deeper: first.1,
                        other: second.1,
                    });
                }
            }
        }
    }

    best
}

/// Roots the tree at the midpoint of its diameter.
///
/// The midpoint is located on the path from the deeper end of the diameter
/// towards the root; the edge it falls on is split exactly there. Trees with
/// fewer than two leaves or a diameter of zero are returned unchanged.
///
/// # Errors
/// [EditError::InvariantViolation] if rerooting fails its node-count check.
///
/// # Example
/// ```
/// use phylograph::edit::midpoint_root;
/// use phylograph::newick::raw_to_newick;
///
/// let tree = phylograph::parse_newick_str("(A:1,(B:1,C:6):1);").unwrap();
/// let rooted = midpoint_root(&tree).unwrap();
/// assert_eq!(raw_to_newick(&rooted), "((B:1,A:2):2,C:4);");
/// ```
pub fn midpoint_root(tree: &PhyloTree) -> Result<RawTree, EditError> {
    let Some(diameter) = diameter(tree) else {
        return Ok(tree.to_raw());
    };
    if diameter.length <= 0.0 {
        return Ok(tree.to_raw());
    }

    let distances = root_distances(tree);
    let target = distances[diameter.deeper] - diameter.length / 2.0;

    // Walk up until the edge above `node` straddles the midpoint
    let mut node = diameter.deeper;
    while let Some(parent) = tree.node(node).parent() {
        if distances[parent] <= target {
            break;
        }
        node = parent;
    }

    debug!(
        diameter = diameter.length,
        node = tree.node(node).id(),
        "midpoint rooting"
    );
    reroot_at(tree, node, distances[node] - target)
}
