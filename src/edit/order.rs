//! Reordering children by subtree size.

use crate::model::{NodeIndex, PhyloTree, RawTree};
use serde::{Deserialize, Serialize};

/// Order of children by number of nodes in their subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeOrder {
    /// Smallest subtree first
    Ascending,
    /// Largest subtree first
    Descending,
}

/// Copies the tree into a new [RawTree] with the children of every node
/// sorted by subtree size. Ties keep their original order.
///
/// # Example
/// ```
/// use phylograph::edit::{NodeOrder, sort_children};
/// use phylograph::newick::raw_to_newick;
///
/// let tree = phylograph::parse_newick_str("((A:1,B:1):1,C:1);").unwrap();
/// let sorted = sort_children(&tree, NodeOrder::Ascending);
/// assert_eq!(raw_to_newick(&sorted), "(C:1,(A:1,B:1):1);");
/// ```
pub fn sort_children(tree: &PhyloTree, order: NodeOrder) -> RawTree {
    let mut raw = RawTree::with_capacity(tree.num_nodes());
    let root = tree.root_index();
    let raw_root = raw.root_index();
    raw[raw_root].label = tree.node(root).label().map(str::to_string);
    raw[raw_root].branch_length = Some(tree.node(root).branch_length());

    let mut stack: Vec<(NodeIndex, NodeIndex)> = vec![(root, raw_root)];
    while let Some((index, raw_index)) = stack.pop() {
        let mut children = tree.node(index).children().to_vec();
        match order {
            NodeOrder::Ascending => children.sort_by_key(|&c| tree.node(c).total_nodes()),
            NodeOrder::Descending => {
                children.sort_by_key(|&c| std::cmp::Reverse(tree.node(c).total_nodes()))
            }
        }

        for child in children {
            let node = tree.node(child);
            let raw_child = raw.add_child(
                raw_index,
                node.label().map(str::to_string),
                Some(node.branch_length()),
            );
            stack.push((child, raw_child));
        }
    }

    raw
}
