// Flame graph reduction tests

use txview::flame_graph::{FlameGraph, interesting_root, reduce_flame_graph};
use txview::models::ProfileTree;

/// main -> run -> handle -> {db: 3, render: 2}
fn branching_tree() -> ProfileTree {
    let mut tree = ProfileTree::new();
    tree.add_stack(&["main", "run", "handle", "db"], 3);
    tree.add_stack(&["main", "run", "handle", "render"], 2);
    tree
}

#[test]
fn test_interesting_root_skips_single_child_chain() {
    let tree = branching_tree();
    let root = interesting_root(&tree);
    assert_eq!(tree.node(root).frame_label.as_deref(), Some("handle"));
    assert_eq!(tree.node(root).sample_count, 5);
}

#[test]
fn test_flame_graph_wraps_interesting_root() {
    let graph = reduce_flame_graph(&branching_tree());
    let wrapper = graph.root();
    assert_eq!(wrapper.name, "");
    assert_eq!(wrapper.sv_unique, 0);
    assert_eq!(wrapper.sv_total, 5);
    assert_eq!(wrapper.sv_children.len(), 1);

    let handle = graph.node(wrapper.sv_children[0]);
    assert_eq!(handle.name, "handle");
    assert_eq!(handle.sv_unique, 0);
    assert_eq!(handle.sv_total, 5);

    let db = graph.child(wrapper.sv_children[0], "db").unwrap();
    let render = graph.child(wrapper.sv_children[0], "render").unwrap();
    assert_eq!(graph.node(db).sv_unique, 3);
    assert_eq!(graph.node(render).sv_total, 2);
    // children keep profile order
    assert_eq!(graph.node(wrapper.sv_children[0]).sv_children, vec![db, render]);
}

#[test]
fn test_flame_graph_self_samples_add_up_to_total() {
    let mut tree = branching_tree();
    tree.add_stack(&["main", "run", "handle"], 4);
    tree.add_stack(&["main", "run", "handle", "db", "socket read"], 6);
    let graph = reduce_flame_graph(&tree);
    let unique: u64 = graph.nodes[1..].iter().map(|n| n.sv_unique).sum();
    assert_eq!(unique, graph.total_samples());
    assert_eq!(graph.total_samples(), 15);
}

#[test]
fn test_single_branch_reverts_to_profile_root() {
    let mut tree = ProfileTree::new();
    tree.add_stack(&["main", "run", "sleep"], 4);
    assert_eq!(interesting_root(&tree), ProfileTree::ROOT);

    let graph = reduce_flame_graph(&tree);
    assert_eq!(graph.total_samples(), 4);
    let root = graph.root().sv_children[0];
    assert_eq!(graph.node(root).name, "");
    assert!(graph.child(root, "main").is_some());
    // wrapper + synthetic root + three frames
    assert_eq!(graph.nodes.len(), 5);
}

#[test]
fn test_empty_profile_gives_empty_graph() {
    let graph = reduce_flame_graph(&ProfileTree::new());
    assert!(graph.is_empty());
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.node(1).sv_total, 0);
}

#[test]
fn test_very_deep_stack_does_not_overflow() {
    let frames: Vec<String> = (0..100_000).map(|i| format!("frame{i}")).collect();
    let mut tree = ProfileTree::new();
    tree.add_stack(&frames, 1);
    let graph = reduce_flame_graph(&tree);
    assert_eq!(graph.nodes.len(), 100_002);
    assert_eq!(graph.total_samples(), 1);
    let leaf_unique: u64 = graph.nodes.iter().map(|n| n.sv_unique).sum();
    assert_eq!(leaf_unique, 1);
}

#[test]
fn test_inconsistent_counts_clamp_self_samples() {
    let mut tree = ProfileTree::new();
    let a = tree.child(ProfileTree::ROOT, "a");
    let b = tree.child(a, "b");
    let c = tree.child(a, "c");
    tree.add_samples(ProfileTree::ROOT, 10);
    tree.add_samples(a, 10);
    tree.add_samples(b, 8);
    tree.add_samples(c, 7);

    let graph = reduce_flame_graph(&tree);
    let a_node = graph.root().sv_children[0];
    assert_eq!(graph.node(a_node).name, "a");
    assert_eq!(graph.node(a_node).sv_unique, 0);
    assert_eq!(graph.node(a_node).sv_total, 10);
}

#[test]
fn test_flame_graph_serializes_camel_case() {
    let graph = reduce_flame_graph(&branching_tree());
    let json = serde_json::to_value(&graph).unwrap();
    let wrapper = &json["nodes"][FlameGraph::ROOT];
    assert_eq!(wrapper["svTotal"], 5);
    assert_eq!(wrapper["svUnique"], 0);
    assert_eq!(wrapper["svChildren"][0], 1);
}
