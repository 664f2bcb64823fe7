//! The derived CMDB dependency graph.
//!
//! A [`DependencyGraph`] is an immutable snapshot built by [`build_graph`]
//! from entity records. It is never updated in place: when records or
//! filters change, callers build a new one.
//!
//! ## Edge Direction Convention
//!
//! Edges point from the **dependent** to the **dependency**:
//!
//! - `ServiceUsesCi`: service -> CI it uses
//! - `CiDependsOn`: dependent CI -> CI it depends on
//! - `CiAssociation`: relationship source -> relationship target (inert)
//!
//! Impact therefore travels *against* dependency edges: when a CI fails,
//! the sources of its incoming edges are affected.
//!
//! ## Storage
//!
//! - `petgraph::DiGraph<Node, Edge>` holds nodes and edges in insertion order
//! - `HashMap<NodeId, NodeIndex>` maps node ids to graph indices
//!
//! Node and edge iteration always follows insertion order, which follows
//! the order of the source records. Hash maps are used for lookups only.

mod builder;
mod types;

pub use builder::{build_graph, GraphFilter};
pub use types::{Edge, EdgeKind, GraphWarning, Node, NodeId, NodeKind};

use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// An immutable directed graph of services and configuration items.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Nodes carry entity records, edges carry their own endpoints and kind.
    pub(crate) graph: DiGraph<Node, Edge>,

    /// Every node in `graph` has exactly one entry here.
    pub(crate) node_map: HashMap<NodeId, NodeIndex>,

    /// Non-fatal problems found while building.
    pub(crate) warnings: Vec<GraphWarning>,
}

impl DependencyGraph {
    /// Nodes in insertion order (services first, then CIs).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Edges in insertion order (mappings first, then CI relationships).
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_map.get(id).map(|&index| &self.graph[index])
    }

    /// Returns `true` if the graph has a node with this id.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Non-fatal problems found while building the graph.
    #[must_use]
    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    pub(crate) fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Find groups of CIs that depend on each other in a cycle.
    ///
    /// Only `CiDependsOn` edges are considered. Each returned group is a
    /// strongly connected component with more than one member, or a single CI
    /// that depends on itself. A group is a set, not a path: members follow
    /// node insertion order, and consecutive members need not share an edge.
    /// The groups themselves are ordered by their first member.
    ///
    /// Cycles are valid data: impact analysis and layout both handle them.
    /// This is a report for humans, not a validation step.
    #[must_use]
    pub fn dependency_cycles(&self) -> Vec<Vec<NodeId>> {
        // filter_map keeps every node so indices stay aligned with `self.graph`
        let dependencies: DiGraph<(), ()> = self.graph.filter_map(
            |_, _| Some(()),
            |_, edge| (edge.kind == EdgeKind::CiDependsOn).then_some(()),
        );

        let mut cycles: Vec<Vec<NodeIndex>> = algo::tarjan_scc(&dependencies)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| dependencies.contains_edge(node, node))
            })
            .map(|mut component| {
                component.sort_unstable();
                component
            })
            .collect();
        cycles.sort_unstable_by_key(|component| component.first().copied());

        cycles
            .into_iter()
            .map(|component| {
                component
                    .into_iter()
                    .map(|index| self.graph[index].id())
                    .collect()
            })
            .collect()
    }
}

/// Structural equality: same nodes and edges in the same order.
///
/// Two graphs built from the same records with the same filter are equal.
impl PartialEq for DependencyGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes().eq(other.nodes()) && self.edges().eq(other.edges())
    }
}

impl Eq for DependencyGraph {}
