//! Impact analysis: "what else breaks if this goes down?"
//!
//! # Propagation Rules
//!
//! Edges point from dependent to dependency (see [`crate::graph`]), so
//! impact mostly travels against edge direction:
//!
//! - From a **CI**: incoming `CiDependsOn` edges lead to CIs that depend on
//!   it, and incoming `ServiceUsesCi` edges lead to services that use it.
//!   Both are impacted.
//! - From a **service**: outgoing `ServiceUsesCi` edges lead to the CIs the
//!   service uses, which are impacted. Services never reach other services
//!   directly; shared CIs carry impact between them when those CIs are
//!   processed in turn.
//! - `CiAssociation` edges never carry impact.
//!
//! # Algorithm
//!
//! Breadth-first worklist from the source with a visited-set guard. Each
//! node is processed once, so dependency cycles terminate without special
//! handling. O(V + E).

use crate::graph::{DependencyGraph, Edge, EdgeKind, NodeId};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// A node reached by impact propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactedNode {
    /// The impacted node
    pub id: NodeId,
    /// Number of hops from the source (the source itself is 0)
    pub depth: usize,
}

/// Result of impact analysis from one source node.
///
/// The impacted set always contains the source itself, unless the source is
/// not in the graph, in which case the set is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactAnalysis {
    /// The node whose failure was analyzed
    source: NodeId,

    /// Impacted nodes in discovery (breadth-first) order
    order: Vec<ImpactedNode>,

    #[serde(skip)]
    impacted: HashSet<NodeId>,
}

impl ImpactAnalysis {
    fn empty(source: NodeId) -> Self {
        Self {
            source,
            order: Vec::new(),
            impacted: HashSet::new(),
        }
    }

    /// The node whose failure was analyzed.
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns `true` if `id` is impacted (the source counts).
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.impacted.contains(id)
    }

    /// Size of the impacted set, including the source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing was computed (unknown source).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of items affected by the source's failure, not counting the
    /// source itself.
    #[must_use]
    pub fn affected_count(&self) -> usize {
        self.order.len().saturating_sub(1)
    }

    /// Impacted nodes in discovery order, source first.
    #[must_use]
    pub fn impacted(&self) -> &[ImpactedNode] {
        &self.order
    }

    /// Iterate over impacted node ids in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.order.iter().map(|node| &node.id)
    }

    /// The impacted set as a plain set.
    #[must_use]
    pub fn as_set(&self) -> &HashSet<NodeId> {
        &self.impacted
    }

    /// Returns `true` if `edge` carries impact and both its endpoints are
    /// impacted.
    ///
    /// Used as a styling hint by renderers. Association edges are never
    /// flagged.
    #[must_use]
    pub fn is_edge_impacted(&self, edge: &Edge) -> bool {
        edge.kind.propagates_impact()
            && self.contains(&edge.source)
            && self.contains(&edge.target)
    }
}

/// Compute the set of nodes impacted by the failure of `source`.
///
/// Returns an empty analysis if `source` is not in the graph.
#[must_use]
pub fn compute_impact(graph: &DependencyGraph, source: &NodeId) -> ImpactAnalysis {
    let Some(start) = graph.index_of(source) else {
        tracing::debug!(%source, "Impact source not in graph");
        return ImpactAnalysis::empty(*source);
    };

    let mut analysis = ImpactAnalysis::empty(*source);
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        let id = graph.graph[current].id();
        tracing::trace!(%id, depth, "Impacted");
        analysis.order.push(ImpactedNode { id, depth });
        analysis.impacted.insert(id);

        for next in impacted_neighbors(graph, current, id) {
            if visited.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }

    tracing::debug!(
        %source,
        impacted = analysis.len(),
        affected = analysis.affected_count(),
        "Computed impact"
    );

    analysis
}

/// Nodes directly impacted by the failure of `node`.
fn impacted_neighbors(
    graph: &DependencyGraph,
    node: NodeIndex,
    id: NodeId,
) -> Vec<NodeIndex> {
    match id {
        // Dependents and users of a CI: sources of incoming edges
        NodeId::Ci(_) => graph
            .graph
            .edges_directed(node, Direction::Incoming)
            .filter(|edge| edge.weight().kind.propagates_impact())
            .map(|edge| edge.source())
            .collect(),
        // CIs used by a service: targets of outgoing edges
        NodeId::Service(_) => graph
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge| edge.weight().kind == EdgeKind::ServiceUsesCi)
            .map(|edge| edge.target())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CiRelationship, ConfigurationItem, Service, ServiceCiMapping};
    use crate::graph::{build_graph, GraphFilter};

    /// S1 uses C1; C2 depends on C1; C3 depends on C2.
    fn chain() -> DependencyGraph {
        build_graph(
            &[Service::new(1, "S1")],
            &[
                ConfigurationItem::new(1, "C1", "Server"),
                ConfigurationItem::new(2, "C2", "Application"),
                ConfigurationItem::new(3, "C3", "API"),
            ],
            &[ServiceCiMapping::new(1, 1, 1)],
            &[
                CiRelationship::depends_on(1, 2, 1),
                CiRelationship::depends_on(2, 3, 2),
            ],
            &GraphFilter::default(),
        )
    }

    #[test]
    fn source_is_discovered_first_at_depth_zero() {
        let analysis = compute_impact(&chain(), &NodeId::ci(1));

        assert_eq!(
            analysis.impacted()[0],
            ImpactedNode {
                id: NodeId::ci(1),
                depth: 0
            }
        );
    }

    #[test]
    fn depths_count_hops_from_the_source() {
        let analysis = compute_impact(&chain(), &NodeId::ci(1));

        let depth_of = |id: NodeId| {
            analysis
                .impacted()
                .iter()
                .find(|node| node.id == id)
                .map(|node| node.depth)
        };
        assert_eq!(depth_of(NodeId::ci(2)), Some(1));
        assert_eq!(depth_of(NodeId::service(1)), Some(1));
        assert_eq!(depth_of(NodeId::ci(3)), Some(2));
    }

    #[test]
    fn unknown_source_yields_empty_analysis() {
        let analysis = compute_impact(&chain(), &NodeId::ci(77));

        assert!(analysis.is_empty());
        assert_eq!(analysis.affected_count(), 0);
        assert!(!analysis.contains(&NodeId::ci(77)));
    }

    #[test]
    fn service_impacts_the_cis_it_uses_but_not_other_services_directly() {
        let graph = build_graph(
            &[Service::new(1, "A"), Service::new(2, "B")],
            &[ConfigurationItem::new(1, "shared", "Database")],
            &[ServiceCiMapping::new(1, 1, 1), ServiceCiMapping::new(2, 2, 1)],
            &[],
            &GraphFilter::default(),
        );

        let analysis = compute_impact(&graph, &NodeId::service(1));

        // A -> shared CI, then shared CI -> B when the CI is processed
        assert!(analysis.contains(&NodeId::ci(1)));
        assert!(analysis.contains(&NodeId::service(2)));
        assert_eq!(analysis.len(), 3);
    }

    #[test]
    fn associations_do_not_carry_impact() {
        let graph = build_graph(
            &[],
            &[
                ConfigurationItem::new(1, "switch", "Network"),
                ConfigurationItem::new(2, "host", "Server"),
            ],
            &[],
            &[CiRelationship::labeled(1, 2, 1, "Connects To")],
            &GraphFilter::default(),
        );

        let analysis = compute_impact(&graph, &NodeId::ci(1));

        assert_eq!(analysis.len(), 1);
    }

    #[test]
    fn edge_impact_requires_both_endpoints() {
        let graph = chain();
        let analysis = compute_impact(&graph, &NodeId::ci(2));

        let flags: Vec<bool> = graph
            .edges()
            .map(|edge| analysis.is_edge_impacted(edge))
            .collect();
        // S1->C1, C2->C1, C3->C2
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn association_between_impacted_nodes_is_not_flagged() {
        let graph = build_graph(
            &[],
            &[
                ConfigurationItem::new(1, "db", "Database"),
                ConfigurationItem::new(2, "api", "API"),
                ConfigurationItem::new(3, "worker", "Application"),
            ],
            &[],
            &[
                CiRelationship::depends_on(1, 2, 1),
                CiRelationship::depends_on(2, 3, 1),
                CiRelationship::labeled(3, 2, 3, "Connects To"),
            ],
            &GraphFilter::default(),
        );
        let analysis = compute_impact(&graph, &NodeId::ci(1));

        assert_eq!(analysis.len(), 3);
        let flags: Vec<bool> = graph
            .edges()
            .map(|edge| analysis.is_edge_impacted(edge))
            .collect();
        assert_eq!(flags, vec![true, true, false]);
    }
}
