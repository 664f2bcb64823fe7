//! Shared fixtures for cmdb-graph integration tests.

#![allow(dead_code)]

use cmdb_graph::{
    build_graph, CiRelationship, ConfigurationItem, DependencyGraph, Environment, GraphFilter,
    Service, ServiceCiMapping,
};

/// Entity records for one test scenario.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub services: Vec<Service>,
    pub cis: Vec<ConfigurationItem>,
    pub mappings: Vec<ServiceCiMapping>,
    pub relationships: Vec<CiRelationship>,
}

impl Snapshot {
    pub fn build(&self, filter: &GraphFilter) -> DependencyGraph {
        build_graph(
            &self.services,
            &self.cis,
            &self.mappings,
            &self.relationships,
            filter,
        )
    }

    pub fn records(&self) -> cmdb_graph::Records<'_> {
        cmdb_graph::Records {
            services: &self.services,
            cis: &self.cis,
            mappings: &self.mappings,
            relationships: &self.relationships,
        }
    }
}

/// The reference scenario.
///
/// ```text
///   S1 ──uses──> C1 (Production)
///                 ^
///   C2 (Staging) ─┘ DependsOn
///    ^
///   C3 (Production) DependsOn C2
/// ```
pub fn reference_snapshot() -> Snapshot {
    Snapshot {
        services: vec![Service::new(1, "S1")],
        cis: vec![
            ConfigurationItem::new(1, "C1", "Database").in_environment(Environment::Production),
            ConfigurationItem::new(2, "C2", "Application").in_environment(Environment::Staging),
            ConfigurationItem::new(3, "C3", "Server").in_environment(Environment::Production),
        ],
        mappings: vec![ServiceCiMapping::new(1, 1, 1)],
        relationships: vec![
            CiRelationship::depends_on(1, 2, 1),
            CiRelationship::depends_on(2, 3, 2),
        ],
    }
}

/// Three web tiers, two services and a dependency cycle between the caches.
///
/// ```text
///   Storefront ──> web ──> api ──> db
///   Reporting  ──> api      │
///                           └──> cache-a <──> cache-b
/// ```
pub fn web_snapshot() -> Snapshot {
    Snapshot {
        services: vec![Service::new(1, "Storefront"), Service::new(2, "Reporting")],
        cis: vec![
            ConfigurationItem::new(1, "web", "Server"),
            ConfigurationItem::new(2, "api", "API"),
            ConfigurationItem::new(3, "db", "Database"),
            ConfigurationItem::new(4, "cache-a", "Application"),
            ConfigurationItem::new(5, "cache-b", "Application"),
        ],
        mappings: vec![
            ServiceCiMapping::new(1, 1, 1).critical(),
            ServiceCiMapping::new(2, 2, 2),
        ],
        relationships: vec![
            CiRelationship::depends_on(1, 1, 2),
            CiRelationship::depends_on(2, 2, 3),
            CiRelationship::depends_on(3, 2, 4),
            CiRelationship::depends_on(4, 4, 5),
            CiRelationship::depends_on(5, 5, 4),
        ],
    }
}
