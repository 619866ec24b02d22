//! Mapping from tree units to drawing units.
//!
//! A scale is a default ratio (fitting the tree into the drawing area)
//! multiplied by `2^zoom`. The branch scale applies to the depth axis, the
//! step scale to the leaf axis; polar projections use the branch scale on
//! both axes.

use crate::layout::{Bounds, Projection};
use crate::model::PhyloTree;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Size of the area a tree is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingArea {
    pub width: f64,
    pub height: f64,
}

impl Default for DrawingArea {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl DrawingArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Converts a zoom level into a multiplicative scale (`2^zoom`).
///
/// # Examples
/// ```
/// # use phylograph::layout::zoom_to_scale;
/// assert_eq!(zoom_to_scale(0.0), 1.0);
/// assert_eq!(zoom_to_scale(1.0), 2.0);
/// assert_eq!(zoom_to_scale(-1.0), 0.5);
/// ```
pub fn zoom_to_scale(zoom: f64) -> f64 {
    2f64.powf(zoom)
}

/// Default branch ratio fitting the unscaled layout into `area`.
///
/// # Arguments
/// * `tree` - The laid out tree (view root determines the tree length)
/// * `projection` - Projection of the layout
/// * `width`, `height` - Centred extent of the unscaled layout
/// * `area` - Drawing area
///
/// # Returns
/// The ratio, `1.0` for trees of zero length or zero extent.
pub fn branch_ratio(
    tree: &PhyloTree,
    projection: Projection,
    width: f64,
    height: f64,
    area: &DrawingArea,
) -> f64 {
    let length = tree.view_root().total_subtree_length;
    if length <= 0.0 {
        return 1.0;
    }

    let ratio = match projection {
        Projection::Rectangular | Projection::Diagonal => area.width / length,
        Projection::Hierarchical => area.height / length,
        Projection::Radial | Projection::Circular => {
            let x_ratio = if width > 0.0 { area.width / width } else { f64::INFINITY };
            let y_ratio = if height > 0.0 { area.height / height } else { f64::INFINITY };
            x_ratio.min(y_ratio)
        }
    };

    if ratio.is_finite() { ratio } else { 1.0 }
}

/// Default step ratio: drawing units (or radians) per visible leaf.
pub fn step_ratio(tree: &PhyloTree, projection: Projection, area: &DrawingArea) -> f64 {
    let visible_leaves = tree.view_root().visible_leaves.max(1) as f64;
    match projection {
        Projection::Rectangular | Projection::Diagonal => area.height / visible_leaves,
        Projection::Hierarchical => area.width / visible_leaves,
        Projection::Radial | Projection::Circular => TAU / visible_leaves,
    }
}

/// Multipliers for `(x, y)` of a projection.
fn axis_scales(projection: Projection, branch_scale: f64, step_scale: f64) -> (f64, f64) {
    match projection {
        Projection::Rectangular => (branch_scale, step_scale),
        Projection::Hierarchical => (step_scale, branch_scale),
        Projection::Diagonal => (step_scale, step_scale),
        Projection::Radial | Projection::Circular => (branch_scale, branch_scale),
    }
}

/// Scales the coordinates of all visible nodes from tree units to drawing
/// units and returns the correspondingly scaled bounds.
///
/// `cx`/`cy` are scaled for circular trees only.
pub fn apply_scale(
    tree: &mut PhyloTree,
    projection: Projection,
    branch_scale: f64,
    step_scale: f64,
    bounds: &Bounds,
) -> Bounds {
    let (x_scale, y_scale) = axis_scales(projection, branch_scale, step_scale);
    let is_circular = projection == Projection::Circular;

    for index in tree.visible_preorder() {
        let node = tree.node_mut(index);
        node.x *= x_scale;
        node.y *= y_scale;
        if is_circular {
            node.cx *= x_scale;
            node.cy *= y_scale;
        }
    }

    bounds.scaled(x_scale, y_scale)
}
