//! One-call build, analyze, annotate and lay out.
//!
//! Each stage is pure, so callers that react to changed records, filters or
//! impact sources simply run the pipeline again.

use crate::config::EngineConfig;
use crate::domain::{CiRelationship, ConfigurationItem, Service, ServiceCiMapping};
use crate::error::Result;
use crate::graph::{build_graph, DependencyGraph, NodeId};
use crate::impact::{compute_impact, ImpactAnalysis};
use crate::layout::{LayoutEngine, LayoutResult};
use crate::view::annotate;

/// Borrowed entity records, as loaded from a CMDB snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Records<'a> {
    /// Business services
    pub services: &'a [Service],
    /// Configuration items
    pub cis: &'a [ConfigurationItem],
    /// Service-to-CI mappings
    pub mappings: &'a [ServiceCiMapping],
    /// CI-to-CI relationships
    pub relationships: &'a [CiRelationship],
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The filtered dependency graph
    pub graph: DependencyGraph,
    /// Impact of the requested source, if any
    pub impact: Option<ImpactAnalysis>,
    /// Positioned, annotated nodes and edges
    pub layout: LayoutResult,
}

/// The full engine, configured once and run any number of times.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: EngineConfig,
    engine: LayoutEngine,
}

impl Pipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the layout constants are invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let engine = LayoutEngine::new(config.layout.clone())?;
        Ok(Self { config, engine })
    }

    /// The pipeline's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the graph, compute impact from `source` if given, annotate, and
    /// lay out.
    #[must_use]
    pub fn run(&self, records: Records<'_>, source: Option<&NodeId>) -> PipelineOutput {
        let graph = build_graph(
            records.services,
            records.cis,
            records.mappings,
            records.relationships,
            &self.config.filter,
        );
        let impact = source.map(|source| compute_impact(&graph, source));
        let view = annotate(&graph, impact.as_ref());
        let layout = self
            .engine
            .layout(&view.nodes, &view.edges, self.config.direction);

        PipelineOutput {
            graph,
            impact,
            layout,
        }
    }
}
