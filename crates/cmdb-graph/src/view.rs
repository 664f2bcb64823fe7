//! Render-ready view of a graph with impact annotations.
//!
//! Annotation is a pure step: it reads the graph and an optional impact
//! analysis and produces fresh view records. Neither input is modified, so
//! the same graph can be annotated against any number of impact sources.

use crate::domain::{CiType, Criticality, Environment};
use crate::graph::{DependencyGraph, EdgeKind, Node, NodeId, NodeKind};
use crate::impact::ImpactAnalysis;
use crate::layout::Size;
use serde::Serialize;

/// A node as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    /// Node identity
    pub id: NodeId,
    /// Service or CI
    pub kind: NodeKind,
    /// Display label
    pub label: String,
    /// CI type (CIs only)
    pub ci_type: Option<CiType>,
    /// Criticality (services only)
    pub criticality: Option<Criticality>,
    /// Environment (CIs only, when known)
    pub environment: Option<Environment>,
    /// Operational status, when known
    pub status: Option<String>,
    /// Affected by the analyzed failure
    pub is_impacted: bool,
    /// The analyzed failure itself
    pub is_source: bool,
    /// Box size chosen by the renderer, overriding the configured size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl ViewNode {
    /// Build an un-annotated view of a graph node.
    #[must_use]
    pub fn from_node(node: &Node) -> Self {
        let (ci_type, criticality, environment) = match node {
            Node::Service(service) => (None, Some(service.criticality), None),
            Node::Ci(ci) => (Some(ci.ci_type.clone()), None, ci.environment),
        };

        Self {
            id: node.id(),
            kind: node.kind(),
            label: node.name().to_string(),
            ci_type,
            criticality,
            environment,
            status: node.status().map(str::to_string),
            is_impacted: false,
            is_source: false,
            size: None,
        }
    }

    /// Set an explicit box size (builder style).
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }
}

/// An edge as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEdge {
    /// Stable edge identifier (`e{index}`, by insertion order)
    pub id: String,
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
    /// Semantic kind
    pub kind: EdgeKind,
    /// Load-bearing mapping
    pub critical: bool,
    /// Relationship label
    pub label: Option<String>,
    /// Impact travelled along this edge
    pub is_impacted: bool,
}

/// Nodes and edges ready for layout and rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphView {
    /// View nodes in graph order
    pub nodes: Vec<ViewNode>,
    /// View edges in graph order
    pub edges: Vec<ViewEdge>,
}

/// Produce a view of `graph`, flagging nodes and edges from `impact`.
///
/// With no impact analysis every flag is `false`.
#[must_use]
pub fn annotate(graph: &DependencyGraph, impact: Option<&ImpactAnalysis>) -> GraphView {
    let nodes = graph
        .nodes()
        .map(|node| {
            let mut view = ViewNode::from_node(node);
            if let Some(impact) = impact {
                view.is_impacted = impact.contains(&view.id);
                view.is_source = impact.source() == view.id && view.is_impacted;
            }
            view
        })
        .collect();

    let edges = graph
        .edges()
        .enumerate()
        .map(|(index, edge)| ViewEdge {
            id: format!("e{index}"),
            source: edge.source,
            target: edge.target,
            kind: edge.kind,
            critical: edge.critical,
            label: edge.label.clone(),
            is_impacted: impact.is_some_and(|impact| impact.is_edge_impacted(edge)),
        })
        .collect();

    GraphView { nodes, edges }
}
