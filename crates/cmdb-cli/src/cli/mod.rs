//! CLI command implementations.

mod config;
mod display;
mod output;
mod snapshot;

pub mod cycles;
pub mod impact;
pub mod layout;
pub mod stats;

use std::path::Path;

use anyhow::{Context as _, Result};
use cmdb_graph::{build_graph, DependencyGraph, EngineConfig, NodeId};

pub use output::OutputConfig;
pub use snapshot::{LoadWarning, Snapshot};

/// Everything a command needs: loaded records, config and output settings.
pub struct Context {
    /// Loaded snapshot records
    pub snapshot: Snapshot,
    /// Lines skipped while loading
    pub load_warnings: Vec<LoadWarning>,
    /// Engine configuration
    pub config: EngineConfig,
    /// Output settings
    pub output: OutputConfig,
}

impl Context {
    /// Load the snapshot and config for a command run.
    pub async fn load(snapshot_dir: &Path, config_path: Option<&Path>, json: bool) -> Result<Self> {
        let output = OutputConfig::from_env(json);
        output.apply();

        let config = config::load_config(config_path, snapshot_dir).await?;
        let (snapshot, load_warnings) = snapshot::load_snapshot(snapshot_dir)
            .await
            .context("failed to load snapshot")?;

        Ok(Self {
            snapshot,
            load_warnings,
            config,
            output,
        })
    }

    /// Build the dependency graph with the configured filter.
    ///
    /// Load and graph warnings are reported on stderr.
    pub fn build_graph(&self) -> DependencyGraph {
        let records = self.snapshot.records();
        let graph = build_graph(
            records.services,
            records.cis,
            records.mappings,
            records.relationships,
            &self.config.filter,
        );
        display::print_warnings(&self.load_warnings, graph.warnings());
        graph
    }
}

/// Parse a node id argument, e.g. "ci-12".
pub fn parse_node_id(text: &str) -> Result<NodeId> {
    text.parse::<NodeId>()
        .with_context(|| format!("invalid node argument {text:?}"))
}
