//! cmdb-graph - Dependency graph, impact analysis and layered layout for CMDB
//! snapshots.
//!
//! The engine takes four collections of records from a configuration
//! management database (services, configuration items, service-to-CI
//! mappings and CI-to-CI relationships) and answers two questions:
//!
//! - **What depends on what?** [`build_graph`] derives a typed directed
//!   graph, honouring a [`GraphFilter`].
//! - **What breaks if this fails?** [`compute_impact`] walks dependents and
//!   users of a failed node.
//!
//! [`annotate`] turns a graph plus an optional impact result into view
//! records, and [`LayoutEngine`] positions them in ranks for drawing.
//! [`Pipeline`] runs all stages in one call.
//!
//! # Example
//!
//! ```
//! use cmdb_graph::{
//!     build_graph, compute_impact, CiRelationship, ConfigurationItem, GraphFilter, NodeId,
//!     Service, ServiceCiMapping,
//! };
//!
//! let graph = build_graph(
//!     &[Service::new(1, "Checkout")],
//!     &[
//!         ConfigurationItem::new(1, "orders-db", "Database"),
//!         ConfigurationItem::new(2, "orders-api", "API"),
//!     ],
//!     &[ServiceCiMapping::new(1, 1, 2)],
//!     &[CiRelationship::depends_on(1, 2, 1)],
//!     &GraphFilter::default(),
//! );
//!
//! let impact = compute_impact(&graph, &NodeId::ci(1));
//! assert_eq!(impact.affected_count(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod impact;
pub mod layout;
pub mod pipeline;
pub mod view;

pub use config::EngineConfig;
pub use domain::{
    CiId, CiRelationship, CiType, ConfigurationItem, Criticality, Environment, Service,
    ServiceCiMapping, ServiceId,
};
pub use error::{Error, Result};
pub use graph::{
    build_graph, DependencyGraph, Edge, EdgeKind, GraphFilter, GraphWarning, Node, NodeId,
    NodeKind,
};
pub use impact::{compute_impact, ImpactAnalysis, ImpactedNode};
pub use layout::{
    Direction, LayoutConfig, LayoutEngine, LayoutResult, LayoutStats, PositionedNode, Size,
};
pub use pipeline::{Pipeline, PipelineOutput, Records};
pub use view::{annotate, GraphView, ViewEdge, ViewNode};
