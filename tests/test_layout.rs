use phylograph::edit::collapse;
use phylograph::layout::{
    Bounds, DrawingArea, Projection, apply_scale, branch_ratio, layout, step_ratio, zoom_to_scale,
};
use phylograph::model::Node;
use phylograph::{PhyloTree, parse_newick_str};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

const EPSILON: f64 = 1e-9;

fn scenario() -> PhyloTree {
    parse_newick_str("(A:1,B:2,(C:3,D:4):5);").unwrap()
}

fn node<'a>(tree: &'a PhyloTree, id: &str) -> &'a Node {
    tree.node(tree.find(id).unwrap())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

// --- TESTS RECTANGULAR ---
#[test]
fn test_rectangular_scenario() {
    let mut tree = scenario();
    let bounds = layout(&mut tree, Projection::Rectangular, false);

    assert_close(bounds.width(), 9.0);
    assert_close(bounds.height(), 3.0);
    assert_close(bounds.centre()[0], 0.0);
    assert_close(bounds.centre()[1], 0.0);

    // Steps increase in leaf order, the clade sits between its leaves
    let (a, b, cd) = (node(&tree, "A"), node(&tree, "B"), node(&tree, "3"));
    assert!(a.y() < b.y());
    assert!(b.y() < cd.y());
    assert_close(cd.y(), (node(&tree, "C").y() + node(&tree, "D").y()) / 2.0);

    // Depth is proportional to the distance from the root
    let root_x = tree.root().x();
    assert_close(a.x() - root_x, 1.0);
    assert_close(b.x() - root_x, 2.0);
    assert_close(node(&tree, "D").x() - root_x, 9.0);
}

#[test]
fn test_rectangular_collapsed_clade_is_one_step() {
    let mut tree = scenario();
    collapse(&mut tree, &["3"]).unwrap();
    let bounds = layout(&mut tree, Projection::Rectangular, false);

    assert_close(bounds.height(), 2.0);
    assert_close(bounds.width(), 5.0);
    let (b, cd) = (node(&tree, "B"), node(&tree, "3"));
    assert_close(cd.y() - b.y(), 1.0);
}

// --- TESTS HIERARCHICAL & DIAGONAL ---
#[test]
fn test_hierarchical_swaps_axes() {
    let mut tree = scenario();
    let bounds = layout(&mut tree, Projection::Hierarchical, false);

    assert_close(bounds.width(), 3.0);
    assert_close(bounds.height(), 9.0);
    let (a, b) = (node(&tree, "A"), node(&tree, "B"));
    assert_close(a.x() - b.x(), 1.0);
    assert_close(b.y() - a.y(), 1.0);
    assert!(!a.inverted());
    assert_eq!(a.angle(), FRAC_PI_2);
}

#[test]
fn test_diagonal_depth_follows_leaf_count() {
    let mut tree = scenario();
    layout(&mut tree, Projection::Diagonal, false);

    let root_x = tree.root().x();
    assert_close(node(&tree, "3").x() - root_x, 1.0);
    assert_close(node(&tree, "A").x() - root_x, 1.5);
    assert_close(node(&tree, "C").x() - root_x, 1.5);
}

// --- TESTS POLAR ---
#[test]
fn test_circular_with_aligned_labels() {
    let mut tree = scenario();
    let bounds = layout(&mut tree, Projection::Circular, true);

    // Symmetric bounds need no shift
    assert_eq!(bounds, Bounds::symmetric(9.0));
    let (a, b, c) = (node(&tree, "A"), node(&tree, "B"), node(&tree, "C"));
    assert_close(a.x(), 1.0);
    assert_close(a.y(), 0.0);
    assert_close(a.angle(), 0.0);
    assert_close(b.angle(), FRAC_PI_2);
    assert_close(c.angle(), PI);
    assert_close(c.x().hypot(c.y()), 8.0);
    assert_close(c.cx().hypot(c.cy()), 5.0);
    assert_close(node(&tree, "3").angle(), 5.0 * PI / 4.0);

    assert_close(a.angle_degrees(), 0.0);
    assert_close(b.angle_degrees(), 270.0);
    assert!(c.inverted());
    assert!(!a.inverted());
}

#[test]
fn test_radial_preserves_branch_lengths() {
    let mut tree = scenario();
    layout(&mut tree, Projection::Radial, false);

    assert_close(tree.root().angle(), 3.0 * PI / 4.0);
    for node in &tree.nodes()[1..] {
        let parent = tree.node(node.parent().unwrap());
        let length = (node.x() - parent.x()).hypot(node.y() - parent.y());
        assert_close(length, node.branch_length());
    }
}

#[test]
fn test_all_projections_deterministic_and_finite() {
    for projection in Projection::ALL {
        let mut first = scenario();
        let mut second = scenario();
        let bounds_first = layout(&mut first, projection, false);
        let bounds_second = layout(&mut second, projection, false);

        assert_eq!(bounds_first, bounds_second);
        for (a, b) in first.nodes().iter().zip(second.nodes()) {
            assert_eq!(a.x().to_bits(), b.x().to_bits(), "{projection}");
            assert_eq!(a.y().to_bits(), b.y().to_bits(), "{projection}");
            assert!(a.x().is_finite() && a.y().is_finite());
        }
    }
}

#[test]
fn test_single_node_tree() {
    for projection in Projection::ALL {
        let mut tree = parse_newick_str("A;").unwrap();
        let bounds = layout(&mut tree, projection, false);
        assert_eq!(bounds, Bounds::new([0.0, 0.0], [0.0, 0.0]), "{projection}");
        assert_eq!(tree.root().x(), 0.0);
        assert_eq!(tree.root().y(), 0.0);
    }
}

#[test]
fn test_layout_of_view_subtree() {
    let mut tree = scenario();
    tree.set_view_root(tree.find("3").unwrap());
    let bounds = layout(&mut tree, Projection::Rectangular, false);

    assert_close(bounds.width(), 4.0);
    assert_close(bounds.height(), 1.0);
}

// --- TESTS SCALES ---
#[test]
fn test_default_ratios() {
    let mut tree = scenario();
    let area = DrawingArea::new(900.0, 600.0);
    let bounds = layout(&mut tree, Projection::Rectangular, false);

    let branch = branch_ratio(&tree, Projection::Rectangular, bounds.centred_width(), bounds.centred_height(), &area);
    assert_close(branch, 100.0);
    assert_close(step_ratio(&tree, Projection::Rectangular, &area), 150.0);
    assert_close(step_ratio(&tree, Projection::Hierarchical, &area), 225.0);
    assert_close(step_ratio(&tree, Projection::Circular, &area), TAU / 4.0);
    assert_close(
        branch_ratio(&tree, Projection::Hierarchical, 0.0, 0.0, &area),
        600.0 / 9.0,
    );
}

#[test]
fn test_polar_branch_ratio_fits_both_axes() {
    let tree = scenario();
    let area = DrawingArea::new(400.0, 100.0);
    assert_close(branch_ratio(&tree, Projection::Radial, 20.0, 10.0, &area), 10.0);
    assert_close(branch_ratio(&tree, Projection::Radial, 0.0, 10.0, &area), 10.0);
    assert_eq!(branch_ratio(&tree, Projection::Radial, 0.0, 0.0, &area), 1.0);
}

#[test]
fn test_zero_length_tree_has_unit_ratio() {
    let tree = parse_newick_str("A;").unwrap();
    let area = DrawingArea::default();
    assert_eq!(branch_ratio(&tree, Projection::Rectangular, 0.0, 0.0, &area), 1.0);
}

#[test]
fn test_apply_scale() {
    let mut tree = scenario();
    let bounds = layout(&mut tree, Projection::Rectangular, false);
    let a = node(&tree, "A");
    let (x, y) = (a.x(), a.y());

    let scaled = apply_scale(&mut tree, Projection::Rectangular, 2.0, zoom_to_scale(3.0), &bounds);
    assert_close(scaled.width(), 18.0);
    assert_close(scaled.height(), 24.0);
    let a = node(&tree, "A");
    assert_close(a.x(), 2.0 * x);
    assert_close(a.y(), 8.0 * y);
}

#[test]
fn test_apply_scale_circular_scales_centres() {
    let mut tree = scenario();
    let bounds = layout(&mut tree, Projection::Circular, true);
    apply_scale(&mut tree, Projection::Circular, 10.0, 123.0, &bounds);

    let c = node(&tree, "C");
    assert_close(c.x().hypot(c.y()), 80.0);
    assert_close(c.cx().hypot(c.cy()), 50.0);
}
