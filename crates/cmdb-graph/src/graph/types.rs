//! Node and edge types of the derived dependency graph.

use crate::domain::{CiId, ConfigurationItem, Service, ServiceId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a graph node.
///
/// A tagged union rather than a prefixed string, so traversal dispatches on
/// the kind directly. The `service-{id}` / `ci-{id}` text form exists only
/// for display, serialization and parsing user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum NodeId {
    /// A service node
    Service(ServiceId),
    /// A configuration item node
    Ci(CiId),
}

impl NodeId {
    /// Node id of a service.
    #[must_use]
    pub fn service(id: u64) -> Self {
        Self::Service(ServiceId(id))
    }

    /// Node id of a configuration item.
    #[must_use]
    pub fn ci(id: u64) -> Self {
        Self::Ci(CiId(id))
    }

    /// The kind of node this id refers to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Service(_) => NodeKind::Service,
            Self::Ci(_) => NodeKind::Ci,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(id) => write!(f, "service-{id}"),
            Self::Ci(id) => write!(f, "ci-{id}"),
        }
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidNodeId(s.to_string());
        let (prefix, number) = s.trim().split_once('-').ok_or_else(invalid)?;
        let id: u64 = number.parse().map_err(|_| invalid())?;

        match prefix {
            "service" => Ok(Self::service(id)),
            "ci" => Ok(Self::ci(id)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for NodeId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.to_string()
    }
}

/// Discriminant of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Business service
    Service,
    /// Configuration item
    Ci,
}

/// A graph node carrying the entity record it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Node {
    /// A service node
    Service(Service),
    /// A configuration item node
    Ci(ConfigurationItem),
}

impl Node {
    /// The node's identity.
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Service(service) => NodeId::Service(service.id),
            Self::Ci(ci) => NodeId::Ci(ci.id),
        }
    }

    /// The node's kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.id().kind()
    }

    /// Display name of the underlying entity.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Service(service) => &service.name,
            Self::Ci(ci) => &ci.name,
        }
    }

    /// Operational status of the underlying entity, if known.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Service(service) => service.status.as_deref(),
            Self::Ci(ci) => ci.status.as_deref(),
        }
    }
}

/// Semantic kind of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Service (source) uses CI (target)
    ServiceUsesCi,
    /// CI (source) depends on CI (target)
    CiDependsOn,
    /// Descriptive CI-to-CI relationship that does not propagate impact
    CiAssociation,
}

impl EdgeKind {
    /// Returns `true` if impact can travel along edges of this kind.
    #[must_use]
    pub fn propagates_impact(self) -> bool {
        matches!(self, Self::ServiceUsesCi | Self::CiDependsOn)
    }
}

/// A directed edge between two nodes of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Source node (the service, or the dependent CI)
    pub source: NodeId,
    /// Target node (the used CI, or the dependency CI)
    pub target: NodeId,
    /// Semantic kind
    pub kind: EdgeKind,
    /// The mapping was flagged as load-bearing
    pub critical: bool,
    /// Relationship label from the source record
    pub label: Option<String>,
}

/// A non-fatal problem found while building a graph.
///
/// References to entities that were excluded by the active filter are not
/// warnings; only references to entities that are absent from the input
/// entirely, and duplicate ids, are recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum GraphWarning {
    /// A service-to-CI mapping names an entity that does not exist.
    ///
    /// **Effect**: no edge is created for the mapping.
    DanglingMapping {
        /// Mapping record id
        mapping_id: u64,
        /// The missing endpoint
        missing: NodeId,
    },

    /// A CI relationship names a CI that does not exist.
    ///
    /// **Effect**: no edge is created for the relationship.
    DanglingRelationship {
        /// Relationship record id
        relationship_id: u64,
        /// The missing endpoint
        missing: NodeId,
    },

    /// Two entity records share an id.
    ///
    /// **Effect**: the first record wins; later ones are skipped.
    DuplicateNode {
        /// The repeated id
        id: NodeId,
    },
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingMapping {
                mapping_id,
                missing,
            } => write!(f, "mapping {mapping_id} references unknown {missing}"),
            Self::DanglingRelationship {
                relationship_id,
                missing,
            } => write!(
                f,
                "relationship {relationship_id} references unknown {missing}"
            ),
            Self::DuplicateNode { id } => write!(f, "duplicate record for {id} skipped"),
        }
    }
}
