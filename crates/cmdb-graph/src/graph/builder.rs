//! Graph construction from entity records.

use super::types::{Edge, EdgeKind, GraphWarning, Node, NodeId};
use super::DependencyGraph;
use crate::domain::{
    CiId, CiRelationship, CiType, ConfigurationItem, Environment, Service, ServiceCiMapping,
    ServiceId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which entities make it into the graph.
///
/// The CI type and environment filters must both hold for a CI to be
/// included; an omitted filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GraphFilter {
    /// Include service nodes
    pub include_services: bool,

    /// Include configuration item nodes
    pub include_cis: bool,

    /// Only include CIs of this type
    pub ci_type: Option<CiType>,

    /// Only include CIs deployed to this environment
    pub environment: Option<Environment>,
}

impl Default for GraphFilter {
    fn default() -> Self {
        Self {
            include_services: true,
            include_cis: true,
            ci_type: None,
            environment: None,
        }
    }
}

impl GraphFilter {
    /// Restrict CIs to one type (builder style).
    #[must_use]
    pub fn with_ci_type(mut self, ci_type: impl Into<CiType>) -> Self {
        self.ci_type = Some(ci_type.into());
        self
    }

    /// Restrict CIs to one environment (builder style).
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Returns `true` if the CI passes every active CI filter.
    ///
    /// A CI with no recorded environment never matches an environment filter.
    #[must_use]
    pub fn matches_ci(&self, ci: &ConfigurationItem) -> bool {
        self.include_cis
            && self
                .ci_type
                .as_ref()
                .is_none_or(|wanted| wanted.same_kind(&ci.ci_type))
            && self
                .environment
                .is_none_or(|wanted| ci.environment == Some(wanted))
    }
}

/// Build a dependency graph from entity records.
///
/// - One node per included service and per CI passing the filter
/// - One `ServiceUsesCi` edge per mapping whose service and CI are both present
/// - One CI-to-CI edge per relationship whose endpoints are both present:
///   `CiDependsOn` if the label implies dependency, `CiAssociation` otherwise
///
/// References to filtered-out entities are dropped silently. References to
/// entities missing from the input, and duplicate record ids, are dropped and
/// recorded in [`DependencyGraph::warnings`].
///
/// Output order follows input order, so identical inputs always produce
/// structurally equal graphs.
#[must_use]
pub fn build_graph(
    services: &[Service],
    cis: &[ConfigurationItem],
    mappings: &[ServiceCiMapping],
    relationships: &[CiRelationship],
    filter: &GraphFilter,
) -> DependencyGraph {
    let known_services: HashSet<ServiceId> = services.iter().map(|s| s.id).collect();
    let known_cis: HashSet<CiId> = cis.iter().map(|ci| ci.id).collect();

    let mut graph = DependencyGraph::default();

    if filter.include_services {
        for service in services {
            insert_node(&mut graph, Node::Service(service.clone()));
        }
    }

    for ci in cis.iter().filter(|ci| filter.matches_ci(ci)) {
        insert_node(&mut graph, Node::Ci(ci.clone()));
    }

    let mut filtered_out = 0usize;

    for mapping in mappings {
        let source = NodeId::Service(mapping.service_id);
        let target = NodeId::Ci(mapping.ci_id);

        let (Some(from), Some(to)) = (graph.index_of(&source), graph.index_of(&target)) else {
            let missing = if known_services.contains(&mapping.service_id) {
                (!known_cis.contains(&mapping.ci_id)).then_some(target)
            } else {
                Some(source)
            };
            match missing {
                Some(missing) => {
                    tracing::debug!(mapping = mapping.id, %missing, "Dropping dangling mapping");
                    graph.warnings.push(GraphWarning::DanglingMapping {
                        mapping_id: mapping.id,
                        missing,
                    });
                }
                None => filtered_out += 1,
            }
            continue;
        };

        graph.graph.add_edge(
            from,
            to,
            Edge {
                source,
                target,
                kind: EdgeKind::ServiceUsesCi,
                critical: mapping.is_critical,
                label: mapping.relationship_type.clone(),
            },
        );
    }

    for relationship in relationships {
        let source = NodeId::Ci(relationship.source_ci_id);
        let target = NodeId::Ci(relationship.target_ci_id);

        let (Some(from), Some(to)) = (graph.index_of(&source), graph.index_of(&target)) else {
            let missing = if known_cis.contains(&relationship.source_ci_id) {
                (!known_cis.contains(&relationship.target_ci_id)).then_some(target)
            } else {
                Some(source)
            };
            match missing {
                Some(missing) => {
                    tracing::debug!(
                        relationship = relationship.id,
                        %missing,
                        "Dropping dangling relationship"
                    );
                    graph.warnings.push(GraphWarning::DanglingRelationship {
                        relationship_id: relationship.id,
                        missing,
                    });
                }
                None => filtered_out += 1,
            }
            continue;
        };

        let kind = if relationship.implies_dependency() {
            EdgeKind::CiDependsOn
        } else {
            EdgeKind::CiAssociation
        };

        graph.graph.add_edge(
            from,
            to,
            Edge {
                source,
                target,
                kind,
                critical: false,
                label: relationship.relationship_type.clone(),
            },
        );
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        filtered_out,
        warnings = graph.warnings.len(),
        "Built dependency graph"
    );
    if !graph.warnings.is_empty() {
        tracing::warn!(
            count = graph.warnings.len(),
            "Dependency graph built with dangling or duplicate records"
        );
    }

    graph
}

/// Add a node unless its id is already present (first record wins).
fn insert_node(graph: &mut DependencyGraph, node: Node) {
    let id = node.id();
    if graph.node_map.contains_key(&id) {
        tracing::debug!(%id, "Skipping duplicate record");
        graph.warnings.push(GraphWarning::DuplicateNode { id });
        return;
    }
    let index = graph.graph.add_node(node);
    graph.node_map.insert(id, index);
}
