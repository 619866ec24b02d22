//! Newick serialisation of indexed and raw trees.
//!
//! Both writers walk the tree with an explicit stack of events, so deep
//! trees are written without recursion.

use crate::model::{NodeIndex, PhyloTree, RawTree};
use crate::newick::defs::BYTES_PER_NODE_GUESS;
use crate::parser::utils::escape_label;

/// Options for serialising a [PhyloTree] to Newick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NewickOptions {
    /// Node whose subtree is written, tree root if `None`
    pub from: Option<NodeIndex>,
    /// Write collapsed nodes as a `[N hidden leaves]` placeholder tip
    pub exclude_collapsed: bool,
}

impl NewickOptions {
    /// Writes the subtree of `from` instead of the whole tree.
    pub fn with_from(mut self, from: NodeIndex) -> Self {
        self.from = Some(from);
        self
    }

    /// Writes collapsed subtrees as placeholders.
    pub fn with_exclude_collapsed(mut self) -> Self {
        self.exclude_collapsed = true;
        self
    }
}

/// Returns the Newick representation of an indexed tree with closing semicolon.
///
/// Node labels (leaf and internal) are escaped where necessary. Every node
/// but the written root gets a `:length` suffix; the written root only if its
/// branch length is non-zero.
///
/// # Arguments
/// * `tree` - The tree to serialise
/// * `options` - Subtree selection and collapsed handling, see [NewickOptions]
///
/// # Example
/// ```
/// use phylograph::newick::{NewickOptions, to_newick};
///
/// let tree = phylograph::parse_newick_str("(A:1,'B b':2,(C:3,D:4):5);").unwrap();
/// assert_eq!(to_newick(&tree, &NewickOptions::default()), "(A:1,'B b':2,(C:3,D:4):5);");
/// ```
pub fn to_newick(tree: &PhyloTree, options: &NewickOptions) -> String {
    let view = IndexedView { tree, options };
    let from = options.from.unwrap_or(tree.root_index());
    let capacity = tree.node(from).total_nodes() * BYTES_PER_NODE_GUESS;
    write_events(&view, from, capacity)
}

/// Returns the Newick representation of a raw tree with closing semicolon.
///
/// Branch lengths are written exactly where the raw tree has one, except
/// for a zero length on the root.
pub fn raw_to_newick(tree: &RawTree) -> String {
    let capacity = tree.num_nodes() * BYTES_PER_NODE_GUESS;
    write_events(&RawView(tree), tree.root_index(), capacity)
}

// ============================================================================
// Writing
// ============================================================================
/// Read access needed to write a tree as Newick.
trait NewickView {
    /// Children as written (empty for a tip)
    fn children(&self, index: NodeIndex) -> &[NodeIndex];

    /// Appends label, optional placeholder and branch length of a node.
    fn write_node(&self, newick: &mut String, index: NodeIndex, is_written_root: bool);
}

struct IndexedView<'a> {
    tree: &'a PhyloTree,
    options: &'a NewickOptions,
}

impl NewickView for IndexedView<'_> {
    fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        let node = self.tree.node(index);
        if self.options.exclude_collapsed && node.is_collapsed() {
            &[]
        } else {
            node.children()
        }
    }

    fn write_node(&self, newick: &mut String, index: NodeIndex, is_written_root: bool) {
        let node = self.tree.node(index);
        if let Some(label) = node.label() {
            newick.push_str(&escape_label(label));
        }
        if self.options.exclude_collapsed && node.is_collapsed() {
            newick.push_str(&format!("[{} hidden leaves]", node.total_leaves()));
        }
        if !is_written_root || node.branch_length() != 0.0 {
            write_branch_length(newick, node.branch_length());
        }
    }
}

struct RawView<'a>(&'a RawTree);

impl NewickView for RawView<'_> {
    fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.0[index].children
    }

    fn write_node(&self, newick: &mut String, index: NodeIndex, is_written_root: bool) {
        let node = &self.0[index];
        if let Some(label) = &node.label {
            newick.push_str(&escape_label(label));
        }
        match node.branch_length {
            Some(length) if length == 0.0 && is_written_root => {}
            Some(length) => write_branch_length(newick, length),
            None => {}
        }
    }
}

fn write_branch_length(newick: &mut String, branch_length: f64) {
    newick.push(':');
    newick.push_str(&branch_length.to_string());
}

enum Event {
    Enter(NodeIndex),
    Separator,
    Exit(NodeIndex),
}

fn write_events<V: NewickView>(view: &V, from: NodeIndex, capacity: usize) -> String {
    let mut newick = String::with_capacity(capacity);
    let mut stack = vec![Event::Enter(from)];

    while let Some(event) = stack.pop() {
        match event {
            Event::Enter(index) => {
                let children = view.children(index);
                if children.is_empty() {
                    view.write_node(&mut newick, index, index == from);
                    continue;
                }
                newick.push('(');
                stack.push(Event::Exit(index));
                for (k, &child) in children.iter().enumerate().rev() {
                    stack.push(Event::Enter(child));
                    if k > 0 {
                        stack.push(Event::Separator);
                    }
                }
            }
            Event::Separator => newick.push(','),
            Event::Exit(index) => {
                newick.push(')');
                view.write_node(&mut newick, index, index == from);
            }
        }
    }

    newick.push(';');
    newick
}
