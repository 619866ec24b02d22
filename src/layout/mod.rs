//! Layout engine.
//!
//! Positions the visible nodes of the view subtree of a [PhyloTree] in tree
//! units: branch-length units along the depth axis, one unit per visible
//! leaf along the step axis (or `2π / V` radians for polar projections).
//! [scale] later maps tree units to drawing units.
//!
//! # Projections
//! | [Projection] | x | y |
//! |---|---|---|
//! | Rectangular | distance from root | step, internal: midpoint of first/last child |
//! | Hierarchical | negated step, internal: midpoint | distance from root |
//! | Diagonal | `(V - visible_leaves) / 2` | as Rectangular |
//! | Radial | parent + `branch_length · cos(angle)` | parent + `branch_length · sin(angle)` |
//! | Circular | `distance · cos(angle)` | `distance · sin(angle)` |
//!
//! Radial angles of internal nodes are the visible-leaf weighted average of
//! their children, Circular angles the midpoint of first and last child.
//! After positioning, the layout is centred on the origin.

pub mod bounds;
pub mod projection;
pub mod scale;

pub use bounds::Bounds;
pub use projection::Projection;
pub use scale::{DrawingArea, apply_scale, branch_ratio, step_ratio, zoom_to_scale};

use crate::model::{Node, NodeIndex, PhyloTree};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::debug;

/// Lays out the view subtree of `tree` in the given projection.
///
/// Writes `x`, `y`, `cx`, `cy`, `angle`, `coangle`, `inverted` and
/// `angle_degrees` of every visible node (descendants of collapsed nodes
/// keep whatever they had). Repeated calls with the same inputs produce
/// bit-identical coordinates.
///
/// # Arguments
/// * `tree` - The tree; the view root must be set
/// * `projection` - The projection to use
/// * `align_labels` - For circular trees, use the `±total_subtree_length`
///   square around the root as bounds so aligned labels fit
///
/// # Returns
/// The bounding box of the visible nodes after centring; the zero box for
/// degenerate trees, never infinite or NaN.
pub fn layout(tree: &mut PhyloTree, projection: Projection, align_labels: bool) -> Bounds {
    let visible = tree.visible_preorder();
    let steps = assign_steps(tree, &visible);

    match projection {
        Projection::Rectangular => layout_rectangular(tree, &visible, &steps),
        Projection::Hierarchical => layout_hierarchical(tree, &visible, &steps),
        Projection::Diagonal => layout_diagonal(tree, &visible, &steps),
        Projection::Radial => layout_radial(tree, &visible, &steps),
        Projection::Circular => layout_circular(tree, &visible, &steps),
    }

    let bounds = centre(tree, &visible, projection, align_labels);
    debug!(
        %projection,
        visible = visible.len(),
        width = bounds.width(),
        height = bounds.height(),
        "laid out tree"
    );
    bounds
}

/// Step index of every tip in `visible` (leaf or collapsed node), indexed by
/// arena position; 0 for everything else.
fn assign_steps(tree: &PhyloTree, visible: &[NodeIndex]) -> Vec<f64> {
    let mut steps = vec![0.0; tree.num_nodes()];
    let mut next = 0.0;
    for &index in visible {
        if tree.node(index).is_tip() {
            steps[index] = next;
            next += 1.0;
        }
    }
    steps
}

/// Step of a tip, or the midpoint of the first and last child's `axis`.
fn step_or_midpoint(
    tree: &PhyloTree,
    index: NodeIndex,
    step: f64,
    axis: impl Fn(&Node) -> f64,
) -> f64 {
    let node = tree.node(index);
    match (node.children.first(), node.children.last()) {
        (Some(&first), Some(&last)) if !node.is_tip() => {
            (axis(tree.node(first)) + axis(tree.node(last))) / 2.0
        }
        _ => step,
    }
}

fn set_angle(node: &mut Node, angle: f64) {
    node.angle = angle;
    node.coangle = angle + FRAC_PI_2;
    node.inverted = angle > FRAC_PI_2 && angle <= 3.0 * FRAC_PI_2;
}

// ============================================================================
// Projections
// ============================================================================
fn layout_rectangular(tree: &mut PhyloTree, visible: &[NodeIndex], steps: &[f64]) {
    // Reverse pre-order visits children before parents
    for &index in visible.iter().rev() {
        let y = step_or_midpoint(tree, index, steps[index], |n| n.y);
        let node = tree.node_mut(index);
        node.x = node.distance_from_root;
        node.y = y;
        node.cx = 0.0;
        node.cy = 0.0;
        set_angle(node, 0.0);
    }
}

fn layout_hierarchical(tree: &mut PhyloTree, visible: &[NodeIndex], steps: &[f64]) {
    for &index in visible.iter().rev() {
        let x = step_or_midpoint(tree, index, -steps[index], |n| n.x);
        let node = tree.node_mut(index);
        node.x = x;
        node.y = node.distance_from_root;
        node.cx = 0.0;
        node.cy = 0.0;
        set_angle(node, FRAC_PI_2);
    }
}

fn layout_diagonal(tree: &mut PhyloTree, visible: &[NodeIndex], steps: &[f64]) {
    let total = tree.view_root().visible_leaves as f64;
    for &index in visible.iter().rev() {
        let y = step_or_midpoint(tree, index, steps[index], |n| n.y);
        let node = tree.node_mut(index);
        node.x = (total - node.visible_leaves as f64) / 2.0;
        node.y = y;
        node.cx = 0.0;
        node.cy = 0.0;
        set_angle(node, 0.0);
    }
}

fn layout_radial(tree: &mut PhyloTree, visible: &[NodeIndex], steps: &[f64]) {
    let step_angle = TAU / tree.view_root().visible_leaves.max(1) as f64;

    for &index in visible.iter().rev() {
        let node = tree.node(index);
        let angle = if node.is_tip() {
            steps[index] * step_angle
        } else {
            let weighted: f64 = node
                .children
                .iter()
                .map(|&c| tree.node(c).angle * tree.node(c).visible_leaves as f64)
                .sum();
            weighted / node.visible_leaves.max(1) as f64
        };
        set_angle(tree.node_mut(index), angle);
    }

    let view_root = tree.view_root_index();
    for &index in visible {
        let (x, y) = match tree.node(index).parent {
            Some(parent) if index != view_root => {
                let node = tree.node(index);
                let parent = tree.node(parent);
                (
                    parent.x + node.branch_length * node.angle.cos(),
                    parent.y + node.branch_length * node.angle.sin(),
                )
            }
            _ => (0.0, 0.0),
        };
        let node = tree.node_mut(index);
        node.x = x;
        node.y = y;
        node.cx = 0.0;
        node.cy = 0.0;
    }
}

fn layout_circular(tree: &mut PhyloTree, visible: &[NodeIndex], steps: &[f64]) {
    let step_angle = TAU / tree.view_root().visible_leaves.max(1) as f64;
    let view_root = tree.view_root_index();

    for &index in visible.iter().rev() {
        let angle = step_or_midpoint(tree, index, steps[index] * step_angle, |n| n.angle);
        let parent_distance = match tree.node(index).parent {
            Some(parent) if index != view_root => tree.node(parent).distance_from_root,
            _ => 0.0,
        };

        let node = tree.node_mut(index);
        set_angle(node, angle);
        let (sin, cos) = angle.sin_cos();
        if index == view_root {
            node.x = 0.0;
            node.y = 0.0;
        } else {
            node.x = node.distance_from_root * cos;
            node.y = node.distance_from_root * sin;
        }
        node.cx = parent_distance * cos;
        node.cy = parent_distance * sin;
    }
}

// ============================================================================
// Centring
// ============================================================================
/// Moves the visible nodes so that their bounding box is centred on the
/// origin and sets `angle_degrees`.
fn centre(
    tree: &mut PhyloTree,
    visible: &[NodeIndex],
    projection: Projection,
    align_labels: bool,
) -> Bounds {
    let bounds = if projection == Projection::Circular && align_labels {
        Bounds::symmetric(tree.view_root().total_subtree_length)
    } else {
        let mut bounds = Bounds::empty();
        for &index in visible {
            let node = tree.node(index);
            bounds.include(node.x, node.y);
        }
        bounds.finite()
    };

    let [dx, dy] = bounds.centre();
    let is_circular = projection == Projection::Circular;
    for &index in visible {
        let node = tree.node_mut(index);
        node.x -= dx;
        node.y -= dy;
        if is_circular {
            node.cx -= dx;
            node.cy -= dy;
        }
        node.angle_degrees = (360.0 - node.angle * 180.0 / PI).rem_euclid(360.0);
    }

    bounds.shifted(dx, dy)
}
