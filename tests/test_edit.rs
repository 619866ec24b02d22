use phylograph::edit::{
    NodeOrder, collapse, diameter, expand, midpoint_root, reroot, rotate, rotate_subtree, set_collapsed,
    sort_children,
};
use phylograph::error::EditError;
use phylograph::indexer::index;
use phylograph::newick::raw_to_newick;
use phylograph::{NodeIndex, PhyloTree, parse_newick_str};

const EPSILON: f64 = 1e-9;

fn scenario() -> PhyloTree {
    parse_newick_str("(A:1,B:2,(C:3,D:4):5);").unwrap()
}

fn ids_in_preorder(tree: &PhyloTree) -> Vec<&str> {
    tree.preorder().iter().map(|&i| tree.node(i).id()).collect()
}

/// Path length between two nodes.
fn path_length(tree: &PhyloTree, a: NodeIndex, b: NodeIndex) -> f64 {
    let mut lca = a;
    while !tree.is_descendant(lca, b) {
        lca = tree.node(lca).parent().unwrap();
    }
    let distance = |n: NodeIndex| tree.node(n).distance_from_root();
    distance(a) + distance(b) - 2.0 * distance(lca)
}

/// Path lengths between all pairs of labelled leaves, keyed by label.
fn leaf_distances(tree: &PhyloTree) -> Vec<(String, String, f64)> {
    let mut leaves: Vec<NodeIndex> = tree.leaves().collect();
    leaves.sort_by_key(|&l| tree.node(l).label().map(str::to_string));
    let mut distances = Vec::new();
    for (k, &a) in leaves.iter().enumerate() {
        for &b in &leaves[k + 1..] {
            distances.push((
                tree.node(a).id().to_string(),
                tree.node(b).id().to_string(),
                path_length(tree, a, b),
            ));
        }
    }
    distances
}

fn assert_same_leaf_distances(before: &PhyloTree, after: &PhyloTree) {
    for ((a1, b1, d1), (a2, b2, d2)) in leaf_distances(before).into_iter().zip(leaf_distances(after)) {
        assert_eq!((a1.as_str(), b1.as_str()), (a2.as_str(), b2.as_str()));
        assert!((d1 - d2).abs() < EPSILON, "{a1}-{b1}: {d1} != {d2}");
    }
}

// --- TESTS REROOT ---
#[test]
fn test_reroot_on_leaf() {
    let tree = scenario();
    let raw = reroot(&tree, "C").unwrap();
    assert_eq!(raw_to_newick(&raw), "((D:4,(A:1,B:2):5):1.5,C:1.5);");

    let rerooted = index(raw);
    assert_eq!(rerooted.num_nodes(), tree.num_nodes() + 1);
    assert_eq!(rerooted.num_leaves(), 4);
    rerooted.check_invariants().unwrap();
    assert_same_leaf_distances(&tree, &rerooted);
}

#[test]
fn test_reroot_suppresses_unary_old_root() {
    let tree = parse_newick_str("((A:1,B:1):2,C:3);").unwrap();
    let rerooted = index(reroot(&tree, "C").unwrap());

    assert_eq!(rerooted.num_nodes(), tree.num_nodes());
    assert_eq!(rerooted.root().children().len(), 2);
    rerooted.check_invariants().unwrap();
    assert_same_leaf_distances(&tree, &rerooted);
}

#[test]
fn test_reroot_drops_path_left_without_children() {
    // Unary root above a unary node: both copies end up childless
    let tree = parse_newick_str("(((A:1,B:1)Y:1)X:1);").unwrap();
    let raw = reroot(&tree, "A").unwrap();
    assert_eq!(raw_to_newick(&raw), "(B:1.5,A:0.5);");

    let rerooted = index(raw);
    assert_eq!(rerooted.num_leaves(), 2);
    assert!(rerooted.find("X").is_none());
    rerooted.check_invariants().unwrap();
    assert_same_leaf_distances(&tree, &rerooted);
}

#[test]
fn test_reroot_on_unary_chain_keeps_single_leaf() {
    let tree = parse_newick_str("((L:2)X:1);").unwrap();

    let rerooted = index(reroot(&tree, "L").unwrap());
    assert_eq!(rerooted.num_leaves(), 1);
    assert_eq!(rerooted.num_nodes(), 2);
    rerooted.check_invariants().unwrap();

    let rerooted = index(reroot(&tree, "1").unwrap());
    assert_eq!(rerooted.num_leaves(), 1);
    rerooted.check_invariants().unwrap();
}

#[test]
fn test_reroot_on_internal_node_keeps_internal_labels() {
    let tree = parse_newick_str("((A:1,B:1)ab:1,(C:1,D:1)cd:1)top;").unwrap();
    let ab = tree.find("1").unwrap();
    assert_eq!(tree.node(ab).label(), Some("ab"));

    let raw = reroot(&tree, "1").unwrap();
    // The old root "top" is left with one child and merged into it
    assert_eq!(raw_to_newick(&raw), "((C:1,D:1)cd:1.5,(A:1,B:1)ab:0.5);");
}

#[test]
fn test_reroot_on_root_is_noop() {
    let tree = scenario();
    let raw = reroot(&tree, "0").unwrap();
    assert_eq!(raw_to_newick(&raw), "(A:1,B:2,(C:3,D:4):5);");

    let single = parse_newick_str("A;").unwrap();
    assert_eq!(raw_to_newick(&reroot(&single, "A").unwrap()), "A;");
}

#[test]
fn test_reroot_unknown_id() {
    let tree = scenario();
    assert_eq!(
        reroot(&tree, "Z").unwrap_err(),
        EditError::NodeNotFound("Z".to_string())
    );
}

// --- TESTS MIDPOINT ROOT ---
#[test]
fn test_diameter() {
    let tree = scenario();
    let diameter = diameter(&tree).unwrap();
    assert_eq!(diameter.length, 11.0);
    assert_eq!(tree.node(diameter.deeper).id(), "D");
    assert_eq!(tree.node(diameter.other).id(), "B");

    assert!(phylograph::edit::diameter(&parse_newick_str("(A:1);").unwrap()).is_none());
}

#[test]
fn test_midpoint_root() {
    let tree = scenario();
    let raw = midpoint_root(&tree).unwrap();
    assert_eq!(raw_to_newick(&raw), "((A:1,B:2):3.5,(C:3,D:4):1.5);");

    let rooted = index(raw);
    rooted.check_invariants().unwrap();
    assert_same_leaf_distances(&tree, &rooted);
    let b = rooted.node(rooted.find("B").unwrap()).distance_from_root();
    let d = rooted.node(rooted.find("D").unwrap()).distance_from_root();
    assert_eq!(b, 5.5);
    assert_eq!(d, 5.5);
}

#[test]
fn test_midpoint_root_without_diameter_is_noop() {
    let single = parse_newick_str("(A:1);").unwrap();
    assert_eq!(raw_to_newick(&midpoint_root(&single).unwrap()), "(A:1);");

    let flat = parse_newick_str("(A:0,B:0):1;").unwrap();
    assert_eq!(raw_to_newick(&midpoint_root(&flat).unwrap()), "(A:0,B:0):1;");
}

// --- TESTS ROTATE ---
#[test]
fn test_rotate_root() {
    let mut tree = scenario();
    rotate(&mut tree, "0").unwrap();

    assert_eq!(ids_in_preorder(&tree), ["0", "3", "C", "D", "B", "A"]);
    tree.check_invariants().unwrap();
}

#[test]
fn test_rotate_twice_is_identity() {
    let original = scenario();
    let mut tree = original.clone();
    let cd = tree.find("3").unwrap();

    rotate_subtree(&mut tree, cd);
    assert_eq!(ids_in_preorder(&tree), ["0", "A", "B", "3", "D", "C"]);
    rotate_subtree(&mut tree, cd);
    assert_eq!(tree, original);

    rotate_subtree(&mut tree, 0);
    rotate_subtree(&mut tree, 0);
    assert_eq!(tree, original);
}

#[test]
fn test_rotate_leaf_and_unknown() {
    let mut tree = scenario();
    rotate(&mut tree, "A").unwrap();
    assert_eq!(tree, scenario());

    assert!(matches!(rotate(&mut tree, "Z"), Err(EditError::NodeNotFound(_))));
}

// --- TESTS COLLAPSE ---
#[test]
fn test_collapse_scenario() {
    let mut tree = scenario();
    collapse(&mut tree, &["3"]).unwrap();

    let cd = tree.node(tree.find("3").unwrap());
    assert!(cd.is_collapsed());
    assert!(!cd.is_hidden());
    assert_eq!(cd.visible_leaves(), 1);
    assert_eq!(tree.root().visible_leaves(), 3);
    assert_eq!(tree.root().total_leaves(), 4);
    assert!(tree.node(tree.find("C").unwrap()).is_hidden());
    assert!(tree.node(tree.find("D").unwrap()).is_hidden());
    assert_eq!(tree.visible_preorder().len(), 4);
    tree.check_invariants().unwrap();
}

#[test]
fn test_collapse_nested_hides_all_descendants() {
    let mut tree = parse_newick_str("((A,(B,C)),D);").unwrap();
    collapse(&mut tree, &["1", "3"]).unwrap();

    assert!(tree.node(tree.find("3").unwrap()).is_hidden());
    assert!(tree.node(tree.find("B").unwrap()).is_hidden());
    assert_eq!(tree.root().visible_leaves(), 2);

    expand(&mut tree, &["1"]).unwrap();
    assert!(!tree.node(tree.find("3").unwrap()).is_hidden());
    assert!(tree.node(tree.find("3").unwrap()).is_collapsed());
    assert!(tree.node(tree.find("B").unwrap()).is_hidden());
    assert_eq!(tree.root().visible_leaves(), 3);
}

#[test]
fn test_collapse_ignores_root_and_leaves() {
    let mut tree = scenario();
    collapse(&mut tree, &["0", "A"]).unwrap();
    assert!(tree.nodes().iter().all(|n| !n.is_collapsed()));
    assert_eq!(tree.root().visible_leaves(), 4);
}

#[test]
fn test_collapse_unknown_id_changes_nothing() {
    let mut tree = scenario();
    let err = collapse(&mut tree, &["3", "nope"]).unwrap_err();
    assert_eq!(err, EditError::NodeNotFound("nope".to_string()));
    assert_eq!(tree, scenario());
}

#[test]
fn test_set_collapsed_replaces() {
    let mut tree = parse_newick_str("((A,B),(C,D));").unwrap();
    collapse(&mut tree, &["1"]).unwrap();
    set_collapsed(&mut tree, &["4"]).unwrap();

    assert!(!tree.node(1).is_collapsed());
    assert!(tree.node(4).is_collapsed());
    assert_eq!(tree.root().visible_leaves(), 3);

    set_collapsed::<&str>(&mut tree, &[]).unwrap();
    assert_eq!(tree.root().visible_leaves(), 4);
}

// --- TESTS SORT ---
#[test]
fn test_sort_children() {
    let tree = scenario();
    let ascending = sort_children(&tree, NodeOrder::Ascending);
    assert_eq!(raw_to_newick(&ascending), "(A:1,B:2,(C:3,D:4):5);");

    let descending = sort_children(&tree, NodeOrder::Descending);
    assert_eq!(raw_to_newick(&descending), "((C:3,D:4):5,A:1,B:2);");
    index(descending).check_invariants().unwrap();
}
