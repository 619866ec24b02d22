use phylograph::edit::NodeOrder;
use phylograph::error::{EditError, PhyloError};
use phylograph::layout::Projection;
use phylograph::session::{LeafStyle, Rgba, SelectorId, Source, TreeProps, TreeSession};
use tracing_subscriber::EnvFilter;

const SCENARIO: &str = "(A:1,B:2,(C:3,D:4):5);";

fn session() -> TreeSession {
    TreeSession::new(SCENARIO, TreeProps::default())
}

fn evaluations(session: &TreeSession) -> Vec<usize> {
    SelectorId::ALL.iter().map(|&s| session.evaluations(s)).collect()
}

// --- TESTS MEMOISATION ---
#[test]
fn test_first_request_evaluates_every_stage_once() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let mut session = session();
    assert_eq!(evaluations(&session), [0; 9]);

    session.graph_with_styles().unwrap();
    assert_eq!(evaluations(&session), [1; 9]);

    // Same inputs, same outputs
    let first = session.graph_with_styles().unwrap();
    let second = session.graph_with_styles().unwrap();
    assert!(std::rc::Rc::ptr_eq(&first, &second));
    assert_eq!(evaluations(&session), [1; 9]);
}

#[test]
fn test_style_change_does_not_relayout() {
    let mut session = session();
    session.graph_with_styles().unwrap();

    session.update_props(|props| props.with_style("A", LeafStyle::default().with_fill_colour("red")));
    session.graph_with_styles().unwrap();

    assert_eq!(session.evaluations(SelectorId::Parsed), 1);
    assert_eq!(session.evaluations(SelectorId::GraphBeforeLayout), 1);
    assert_eq!(session.evaluations(SelectorId::GraphAfterLayout), 1);
    assert_eq!(session.evaluations(SelectorId::GraphWithStyles), 2);
}

#[test]
fn test_zoom_change_only_rescales() {
    let mut session = session();
    session.graph_with_styles().unwrap();

    session.update_props(|props| props.with_branch_zoom(1.0));
    session.graph_with_styles().unwrap();

    assert_eq!(session.evaluations(SelectorId::GraphBeforeLayout), 1);
    assert_eq!(session.evaluations(SelectorId::StepScale), 1);
    assert_eq!(session.evaluations(SelectorId::BranchScale), 2);
    assert_eq!(session.evaluations(SelectorId::GraphAfterLayout), 2);
    assert_eq!(session.evaluations(SelectorId::GraphWithStyles), 2);
}

#[test]
fn test_equal_props_snapshot_hits_value_keyed_stages() {
    let mut session = session();
    session.graph_with_styles().unwrap();

    // A new snapshot with the same values: collections keep their identity
    session.update_props(|props| props.with_projection(Projection::Rectangular));
    session.graph_with_styles().unwrap();
    assert_eq!(evaluations(&session), [1; 9]);
}

#[test]
fn test_rotated_ids_change_keeps_parse() {
    let mut session = session();
    session.graph_after_layout().unwrap();

    session.update_props(|props| props.with_rotated_ids(["3"]));
    let graph = session.graph_after_layout().unwrap();

    assert_eq!(session.evaluations(SelectorId::Parsed), 1);
    assert_eq!(session.evaluations(SelectorId::Rotated), 2);
    assert_eq!(session.evaluations(SelectorId::GraphBeforeLayout), 2);
    let leaf_ids: Vec<&str> = graph.leaves().iter().map(|&i| graph.tree().node(i).id()).collect();
    assert_eq!(leaf_ids, ["A", "B", "D", "C"]);
}

#[test]
fn test_parse_error_is_cached_until_source_changes() {
    let mut session = TreeSession::new("(A,B", TreeProps::default());

    let err = session.graph_with_styles().unwrap_err();
    assert!(matches!(err, PhyloError::Parse(_)));
    session.graph_with_styles().unwrap_err();
    assert_eq!(session.evaluations(SelectorId::Parsed), 1);
    assert_eq!(session.evaluations(SelectorId::Rotated), 0);

    session.set_source("(A,B);");
    session.graph_with_styles().unwrap();
    assert_eq!(session.evaluations(SelectorId::Parsed), 2);
}

#[test]
fn test_selector_names() {
    let names: Vec<String> = SelectorId::ALL.iter().map(|s| s.to_string()).collect();
    assert_eq!(names[0], "parsed");
    assert_eq!(names[3], "graph-without-layout");
    assert_eq!(names[8], "graph-with-styles");
    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), SelectorId::ALL.len());
}

// --- TESTS PIPELINE OUTPUT ---
#[test]
fn test_scaled_graph_fills_drawing_area() {
    let props = TreeProps::default().with_drawing_area(900.0, 600.0);
    let mut session = TreeSession::new(SCENARIO, props);

    let before = session.graph_before_layout().unwrap();
    assert_eq!(before.width(), 9.0);
    assert_eq!(before.height(), 3.0);

    assert_eq!(session.branch_scale().unwrap(), 100.0);
    assert_eq!(session.step_scale().unwrap(), 150.0);
    let after = session.graph_after_layout().unwrap();
    assert_eq!(after.width(), 900.0);
    assert_eq!(after.height(), 450.0);
    assert_eq!(after.bounds().width(), 900.0);
}

#[test]
fn test_view_root() {
    let mut session = TreeSession::new(SCENARIO, TreeProps::default().with_root_id("3"));
    let graph = session.graph_without_layout().unwrap();

    assert_eq!(graph.tree().view_root().id(), "3");
    assert_eq!(graph.leaves().len(), 2);

    // Unknown root ids fall back to the whole tree
    session.update_props(|props| props.with_root_id("nope"));
    assert_eq!(session.graph_without_layout().unwrap().leaves().len(), 4);
}

#[test]
fn test_unknown_ids_in_props_are_ignored() {
    let props = TreeProps::default()
        .with_collapsed_ids(["nope", "3"])
        .with_rotated_ids(["missing"]);
    let mut session = TreeSession::new(SCENARIO, props);

    let graph = session.graph_with_styles().unwrap();
    assert_eq!(graph.leaves().len(), 2);
    assert_eq!(graph.graph().tree().root().visible_leaves(), 3);
}

#[test]
fn test_styles() {
    let props = TreeProps::default()
        .with_style("A", LeafStyle::default().with_label("Alpha").with_fill_colour("red"))
        .with_style("B", LeafStyle::default().with_fill_colour("not a colour"))
        .with_style("C", LeafStyle::default().with_fill_colour("rgba(0, 0, 255, 0.5)"));
    let mut session = TreeSession::new(SCENARIO, props);
    let graph = session.graph_with_styles().unwrap();

    let default_fill = Rgba([0x22, 0x22, 0x22, 255]);
    let a = graph.leaf("A").unwrap();
    assert_eq!(a.label, "Alpha");
    assert_eq!(a.fill, Rgba([255, 0, 0, 255]));
    assert_eq!(graph.leaf("B").unwrap().fill, default_fill);
    assert_eq!(graph.leaf("C").unwrap().fill, Rgba([0, 0, 255, 128]));
    let d = graph.leaf("D").unwrap();
    assert_eq!(d.label, "D");
    assert_eq!(d.fill, default_fill);
}

#[test]
fn test_styles_skip_collapsed_leaves() {
    let props = TreeProps::default().with_collapsed_ids(["3"]);
    let mut session = TreeSession::new(SCENARIO, props);
    let graph = session.graph_with_styles().unwrap();

    assert_eq!(graph.leaves().len(), 2);
    assert!(graph.leaf("C").is_none());
}

#[test]
fn test_graph_source() {
    let json = r#"{ "type": "biojs", "data": { "children": [ { "name": "A", "branch_length": 1 }, { "name": "B", "branch_length": 2 } ] } }"#;
    let mut session = TreeSession::new(Source::from_json(json).unwrap(), TreeProps::default());
    let tree = session.parsed().unwrap();
    assert_eq!(tree.num_leaves(), 2);
    assert_eq!(tree.node(tree.find("B").unwrap()).distance_from_root(), 2.0);
}

#[test]
fn test_props_from_json() {
    let props = TreeProps::from_json(
        r#"{ "treeType": "rd", "alignLabels": true, "stepZoom": -1, "size": { "width": 100, "height": 50 },
             "rootId": "3", "styles": { "A": { "label": "Alpha", "fillColour": "blue" } } }"#,
    )
    .unwrap();
    assert_eq!(props.projection, Projection::Radial);
    assert!(props.align_labels);
    assert_eq!(props.step_zoom, -1.0);
    assert_eq!(props.drawing_area.width, 100.0);
    assert_eq!(props.root_id.as_deref(), Some("3"));
    assert_eq!(props.styles["A"].label.as_deref(), Some("Alpha"));

    assert!(matches!(
        TreeProps::from_json(r#"{ "projection": "spiral" }"#),
        Err(PhyloError::InvalidConfig(_))
    ));
    assert!(matches!(
        Source::from_json(r#"{ "type": "nexus", "data": "" }"#),
        Err(PhyloError::InvalidSource(_))
    ));
}

// --- TESTS EDITING ---
#[test]
fn test_rotate_toggles() {
    let mut session = session();
    assert_eq!(session.rotate("0").unwrap(), "((C:3,D:4):5,B:2,A:1);");
    assert_eq!(&*session.props().rotated_ids, ["0".to_string()]);

    assert_eq!(session.rotate("0").unwrap(), SCENARIO);
    assert!(session.props().rotated_ids.is_empty());
}

#[test]
fn test_collapse_and_expand() {
    let mut session = session();
    assert_eq!(session.collapse(&["3"]).unwrap(), SCENARIO);
    assert_eq!(&*session.props().collapsed_ids, ["3".to_string()]);
    assert_eq!(session.graph_without_layout().unwrap().leaves().len(), 2);

    // Collapsing twice keeps a single entry
    session.collapse(&["3"]).unwrap();
    assert_eq!(session.props().collapsed_ids.len(), 1);

    session.expand(&["3"]).unwrap();
    assert!(session.props().collapsed_ids.is_empty());
    assert_eq!(session.graph_without_layout().unwrap().leaves().len(), 4);
}

#[test]
fn test_edits_with_unknown_ids_leave_session_unchanged() {
    let mut session = session();
    let props_before = session.props().clone();

    let err = session.collapse(&["3", "nope"]).unwrap_err();
    assert_eq!(err, PhyloError::Edit(EditError::NodeNotFound("nope".to_string())));
    assert!(session.rotate("nope").is_err());
    assert!(session.reroot("nope").is_err());

    assert_eq!(session.props(), &props_before);
    assert_eq!(session.source(), &Source::from(SCENARIO));
}

#[test]
fn test_reroot_replaces_source_and_resets_ids() {
    let mut session = TreeSession::new(SCENARIO, TreeProps::default().with_root_id("3"));
    session.collapse(&["3"]).unwrap();

    let newick = session.reroot("C").unwrap();
    assert_eq!(newick, "((D:4,(A:1,B:2):5):1.5,C:1.5);");
    assert_eq!(session.source(), &Source::Newick(newick));
    assert!(session.props().collapsed_ids.is_empty());
    assert!(session.props().root_id.is_none());

    let tree = session.parsed().unwrap();
    assert_eq!(tree.num_nodes(), 7);
    tree.check_invariants().unwrap();
}

#[test]
fn test_reroot_uses_rotated_tree() {
    let mut session = session();
    session.rotate("0").unwrap();
    let newick = session.reroot("A").unwrap();
    assert_eq!(newick, "(((C:3,D:4):5,B:2):0.5,A:0.5);");
    assert!(session.props().rotated_ids.is_empty());
}

#[test]
fn test_midpoint_root_and_sort() {
    let mut session = session();
    assert_eq!(session.midpoint_root().unwrap(), "((A:1,B:2):3.5,(C:3,D:4):1.5);");
    assert_eq!(session.sort_children(NodeOrder::Descending).unwrap(), "((A:1,B:2):3.5,(C:3,D:4):1.5);");

    session.set_source(SCENARIO);
    assert_eq!(session.sort_children(NodeOrder::Descending).unwrap(), "((C:3,D:4):5,A:1,B:2);");
}
