//! Integration tests for the layered layout engine.

mod common;

use cmdb_graph::{
    annotate, compute_impact, Direction, GraphFilter, LayoutConfig, LayoutEngine, NodeId,
    PositionedNode, Size,
};
use common::{reference_snapshot, web_snapshot};
use rstest::{fixture, rstest};
use std::collections::HashSet;

#[fixture]
fn engine() -> LayoutEngine {
    LayoutEngine::new(LayoutConfig::default()).expect("default config is valid")
}

fn overlaps(a: &PositionedNode, b: &PositionedNode) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

#[rstest]
fn empty_input_gives_empty_layout(engine: LayoutEngine) {
    let result = engine.layout(&[], &[], Direction::TopToBottom);

    assert!(result.nodes.is_empty());
    assert!(result.edges.is_empty());
    assert_eq!(result.stats.ranks, 0);
}

#[rstest]
fn layout_is_deterministic(engine: LayoutEngine) {
    let graph = web_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);

    let first = engine.layout(&view.nodes, &view.edges, Direction::TopToBottom);
    let second = engine.layout(&view.nodes, &view.edges, Direction::TopToBottom);

    assert_eq!(first, second);
}

#[rstest]
fn dependents_sit_above_their_dependencies(engine: LayoutEngine) {
    let graph = reference_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);

    let result = engine.layout(&view.nodes, &view.edges, Direction::TopToBottom);

    for edge in &result.edges {
        let source = result.node(&edge.source).unwrap();
        let target = result.node(&edge.target).unwrap();
        assert!(source.rank < target.rank, "{} -> {}", edge.source, edge.target);
        assert!(source.y < target.y);
    }
    assert_eq!(result.stats.reversed_edges, 0);
}

#[rstest]
fn cycles_are_laid_out_without_duplicates(engine: LayoutEngine) {
    let graph = web_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);

    let result = engine.layout(&view.nodes, &view.edges, Direction::TopToBottom);

    assert_eq!(result.nodes.len(), graph.node_count());
    let unique: HashSet<NodeId> = result.nodes.iter().map(|node| node.node.id).collect();
    assert_eq!(unique.len(), result.nodes.len());
    assert_eq!(result.stats.reversed_edges, 1);
    assert_eq!(result.edges.len(), graph.edge_count());
}

#[rstest]
fn nodes_never_overlap(engine: LayoutEngine) {
    let graph = web_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);

    let result = engine.layout(&view.nodes, &view.edges, Direction::TopToBottom);

    for (i, a) in result.nodes.iter().enumerate() {
        for b in &result.nodes[i + 1..] {
            assert!(!overlaps(a, b), "{} overlaps {}", a.node.id, b.node.id);
        }
    }
}

#[rstest]
#[case::top_to_bottom(Direction::TopToBottom)]
#[case::bottom_to_top(Direction::BottomToTop)]
#[case::left_to_right(Direction::LeftToRight)]
#[case::right_to_left(Direction::RightToLeft)]
fn every_direction_fits_inside_the_drawing(engine: LayoutEngine, #[case] direction: Direction) {
    let graph = web_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);

    let result = engine.layout(&view.nodes, &view.edges, direction);

    for node in &result.nodes {
        assert!(node.x >= 0.0 && node.y >= 0.0);
        assert!(node.x + node.width <= result.width);
        assert!(node.y + node.height <= result.height);
    }
}

#[rstest]
#[case::top_to_bottom(Direction::TopToBottom)]
#[case::bottom_to_top(Direction::BottomToTop)]
#[case::left_to_right(Direction::LeftToRight)]
#[case::right_to_left(Direction::RightToLeft)]
fn direction_controls_where_rank_zero_sits(engine: LayoutEngine, #[case] direction: Direction) {
    let graph = reference_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);

    let result = engine.layout(&view.nodes, &view.edges, direction);

    // C3 -> C2 -> C1: C3 has rank 0, C1 rank 2
    let first = result.node(&NodeId::ci(3)).unwrap().center();
    let last = result.node(&NodeId::ci(1)).unwrap().center();
    match direction {
        Direction::TopToBottom => assert!(first.1 < last.1),
        Direction::BottomToTop => assert!(first.1 > last.1),
        Direction::LeftToRight => assert!(first.0 < last.0),
        Direction::RightToLeft => assert!(first.0 > last.0),
    }
}

#[rstest]
fn impact_flags_do_not_move_nodes(engine: LayoutEngine) {
    let graph = reference_snapshot().build(&GraphFilter::default());
    let plain = annotate(&graph, None);
    let impact = compute_impact(&graph, &NodeId::ci(1));
    let flagged = annotate(&graph, Some(&impact));

    let before = engine.layout(&plain.nodes, &plain.edges, Direction::TopToBottom);
    let after = engine.layout(&flagged.nodes, &flagged.edges, Direction::TopToBottom);

    for (a, b) in before.nodes.iter().zip(&after.nodes) {
        assert_eq!((a.x, a.y, a.rank, a.order), (b.x, b.y, b.rank, b.order));
    }
}

#[test]
fn service_boxes_use_their_own_size() {
    let engine = LayoutEngine::new(LayoutConfig {
        service_node_size: Some(Size::new(240.0, 80.0)),
        ..LayoutConfig::default()
    })
    .unwrap();
    let graph = reference_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);

    let result = engine.layout(&view.nodes, &view.edges, Direction::TopToBottom);

    let service = result.node(&NodeId::service(1)).unwrap();
    assert_eq!((service.width, service.height), (240.0, 80.0));
    let ci = result.node(&NodeId::ci(1)).unwrap();
    assert_eq!(ci.width, LayoutConfig::default().node_size.width);
}

#[rstest]
#[case::top_to_bottom(Direction::TopToBottom)]
#[case::left_to_right(Direction::LeftToRight)]
fn per_node_sizes_are_honored_without_overlap(engine: LayoutEngine, #[case] direction: Direction) {
    let graph = web_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);
    let nodes: Vec<_> = view
        .nodes
        .into_iter()
        .map(|node| {
            let width = 40.0 + 12.0 * node.label.len() as f64;
            node.with_size(Size::new(width, 48.0))
        })
        .collect();

    let result = engine.layout(&nodes, &view.edges, direction);

    for (input, placed) in nodes.iter().zip(&result.nodes) {
        assert_eq!(Some(Size::new(placed.width, placed.height)), input.size);
    }
    for (i, a) in result.nodes.iter().enumerate() {
        for b in &result.nodes[i + 1..] {
            assert!(!overlaps(a, b), "{} overlaps {}", a.node.id, b.node.id);
        }
    }
}

#[rstest]
fn edges_to_unknown_nodes_are_passed_through(engine: LayoutEngine) {
    let graph = reference_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);
    // lay out only the CIs; the service's edge has an unknown endpoint
    let cis: Vec<_> = view
        .nodes
        .iter()
        .filter(|node| matches!(node.id, NodeId::Ci(_)))
        .cloned()
        .collect();

    let result = engine.layout(&cis, &view.edges, Direction::TopToBottom);

    assert_eq!(result.nodes.len(), 3);
    assert_eq!(result.edges, view.edges);
}

#[rstest]
fn long_edges_get_virtual_nodes(engine: LayoutEngine) {
    let graph = reference_snapshot().build(&GraphFilter::default());
    let view = annotate(&graph, None);

    let result = engine.layout(&view.nodes, &view.edges, Direction::TopToBottom);

    // S1 (rank 0) uses C1 (rank 2) across the rank holding C2
    assert_eq!(result.node(&NodeId::service(1)).unwrap().rank, 0);
    assert_eq!(result.node(&NodeId::ci(1)).unwrap().rank, 2);
    assert_eq!(result.stats.virtual_nodes, 1);
    assert_eq!(result.nodes.len(), 4);
}
