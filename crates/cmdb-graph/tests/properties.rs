//! Property tests over randomly generated CMDB snapshots.

mod common;

use cmdb_graph::{
    annotate, compute_impact, CiRelationship, ConfigurationItem, GraphFilter, LayoutConfig,
    LayoutEngine, NodeId, Service, ServiceCiMapping,
};
use common::Snapshot;
use proptest::prelude::*;
use std::collections::HashSet;

const CI_TYPES: [&str; 4] = ["Server", "Database", "Application", "API"];

/// Random snapshots, including dangling references, self-dependencies and
/// dependency cycles.
fn snapshot() -> impl Strategy<Value = Snapshot> {
    (0u64..4, 1u64..10).prop_flat_map(|(services, cis)| {
        let mappings = prop::collection::vec((0..services.max(1) + 1, 0..cis + 1), 0..12);
        let relationships =
            prop::collection::vec((0..cis + 1, 0..cis + 1, prop::bool::weighted(0.8)), 0..16);
        (Just(services), Just(cis), mappings, relationships).prop_map(
            |(services, cis, mappings, relationships)| Snapshot {
                services: (0..services)
                    .map(|id| Service::new(id, format!("svc-{id}")))
                    .collect(),
                cis: (0..cis)
                    .map(|id| {
                        let ci_type = CI_TYPES[usize::try_from(id).unwrap_or(0) % CI_TYPES.len()];
                        ConfigurationItem::new(id, format!("ci-{id}"), ci_type)
                    })
                    .collect(),
                mappings: mappings
                    .into_iter()
                    .zip(0u64..)
                    .map(|((service, ci), id)| ServiceCiMapping::new(id, service, ci))
                    .collect(),
                relationships: relationships
                    .into_iter()
                    .zip(0u64..)
                    .map(|((source, target, depends), id)| {
                        if depends {
                            CiRelationship::depends_on(id, source, target)
                        } else {
                            CiRelationship::labeled(id, source, target, "Connects To")
                        }
                    })
                    .collect(),
            },
        )
    })
}

proptest! {
    #[test]
    fn impact_contains_its_source(snapshot in snapshot()) {
        let graph = snapshot.build(&GraphFilter::default());

        for id in graph.nodes().map(cmdb_graph::Node::id) {
            let impact = compute_impact(&graph, &id);
            prop_assert!(impact.contains(&id));
            prop_assert_eq!(impact.affected_count(), impact.len() - 1);
        }
    }

    #[test]
    fn impact_is_closed_under_dependency(snapshot in snapshot()) {
        let graph = snapshot.build(&GraphFilter::default());

        for id in graph.nodes().map(cmdb_graph::Node::id) {
            let impact = compute_impact(&graph, &id);
            for edge in graph.edges() {
                if edge.kind.propagates_impact() && impact.contains(&edge.target) {
                    prop_assert!(impact.contains(&edge.source));
                }
            }
        }
    }

    #[test]
    fn impact_stays_inside_the_graph(snapshot in snapshot()) {
        let filter = GraphFilter::default().with_ci_type("Database");
        let graph = snapshot.build(&filter);

        for id in graph.nodes().map(cmdb_graph::Node::id) {
            let impact = compute_impact(&graph, &id);
            prop_assert!(impact.iter().all(|impacted| graph.contains(impacted)));
        }
    }

    #[test]
    fn rebuild_is_idempotent(snapshot in snapshot()) {
        let filter = GraphFilter::default();

        prop_assert_eq!(snapshot.build(&filter), snapshot.build(&filter));
    }

    #[test]
    fn layout_is_deterministic_and_complete(snapshot in snapshot()) {
        let graph = snapshot.build(&GraphFilter::default());
        let view = annotate(&graph, None);
        let engine = LayoutEngine::new(LayoutConfig::default()).unwrap();

        let first = engine.layout(&view.nodes, &view.edges, cmdb_graph::Direction::TopToBottom);
        let second = engine.layout(&view.nodes, &view.edges, cmdb_graph::Direction::TopToBottom);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.nodes.len(), view.nodes.len());
        let unique: HashSet<NodeId> = first.nodes.iter().map(|node| node.node.id).collect();
        prop_assert_eq!(unique.len(), view.nodes.len());
    }

    #[test]
    fn connected_nodes_never_share_a_rank(snapshot in snapshot()) {
        let graph = snapshot.build(&GraphFilter::default());
        let view = annotate(&graph, None);
        let engine = LayoutEngine::new(LayoutConfig::default()).unwrap();

        let result = engine.layout(&view.nodes, &view.edges, cmdb_graph::Direction::TopToBottom);

        for edge in result.edges.iter().filter(|edge| edge.source != edge.target) {
            let source = result.node(&edge.source).map(|node| node.rank);
            let target = result.node(&edge.target).map(|node| node.rank);
            prop_assert_ne!(source, target);
        }
        for node in &result.nodes {
            prop_assert!(node.rank < result.stats.ranks);
        }
    }
}
