//! Engine configuration (`cmdb.yaml`).
//!
//! Every section is optional; an empty document yields the defaults.
//!
//! ```yaml
//! filter:
//!   include-services: true
//!   ci-type: Database
//!   environment: Production
//! layout:
//!   node-gap: 32
//!   rank-gap: 96
//! direction: left-to-right
//! ```

use crate::error::Result;
use crate::graph::GraphFilter;
use crate::layout::{Direction, LayoutConfig};
use serde::{Deserialize, Serialize};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "cmdb.yaml";

/// Filter, layout constants and direction in one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Which entities make it into the graph
    pub filter: GraphFilter,

    /// Spacing and sizing for the layout engine
    pub layout: LayoutConfig,

    /// Layout flow direction
    pub direction: Direction,
}

impl EngineConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Yaml`] for malformed YAML or unknown values,
    /// and [`crate::Error::Config`] when layout constants are out of range.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // serde_yaml rejects an empty document, which we treat as all defaults
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Yaml`] if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
