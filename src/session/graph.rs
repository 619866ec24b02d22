//! Outputs of the pipeline stages.

use crate::layout::Bounds;
use crate::model::{NodeIndex, PhyloTree};
use std::ops::Deref;

/// A rotated and collapsed tree with its view root set.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphWithoutLayout {
    pub(crate) tree: PhyloTree,
    pub(crate) leaves: Vec<NodeIndex>,
}

impl GraphWithoutLayout {
    /// The tree.
    pub fn tree(&self) -> &PhyloTree {
        &self.tree
    }

    /// Visible leaves of the view subtree in pre-order.
    pub fn leaves(&self) -> &[NodeIndex] {
        &self.leaves
    }
}

/// A laid out tree: coordinates in tree units before scaling, in drawing
/// units after.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGraph {
    pub(crate) tree: PhyloTree,
    pub(crate) leaves: Vec<NodeIndex>,
    pub(crate) bounds: Bounds,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl PositionedGraph {
    pub(crate) fn new(tree: PhyloTree, leaves: Vec<NodeIndex>, bounds: Bounds) -> Self {
        Self {
            tree,
            leaves,
            width: bounds.centred_width(),
            height: bounds.centred_height(),
            bounds,
        }
    }

    /// The laid out tree.
    pub fn tree(&self) -> &PhyloTree {
        &self.tree
    }

    /// Visible leaves of the view subtree in pre-order.
    pub fn leaves(&self) -> &[NodeIndex] {
        &self.leaves
    }

    /// Bounding box of the visible nodes.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Width of the smallest origin-centred box containing all visible nodes.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height of the smallest origin-centred box containing all visible nodes.
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Deref for GraphWithoutLayout {
    type Target = PhyloTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

impl Deref for PositionedGraph {
    type Target = PhyloTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}
