//! Error types for cmdb-graph operations.
//!
//! Building, analyzing and laying out a graph never fails: dangling
//! references, filtered-out entities and dependency cycles are all expected
//! data and are handled in place. Errors only arise at the text boundaries
//! of the crate (parsing node ids, loading configuration).

use thiserror::Error;

/// The error type for cmdb-graph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration values are out of range or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Text could not be parsed as a `service-{id}` or `ci-{id}` node id.
    #[error("invalid node id: {0:?} (expected \"service-<n>\" or \"ci-<n>\")")]
    InvalidNodeId(String),

    /// YAML configuration could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A specialized Result type for cmdb-graph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_node_id_message_names_the_input() {
        let error = Error::InvalidNodeId("host-7".to_string());

        let display = error.to_string();
        assert!(display.contains("host-7"));
        assert!(display.contains("service-<n>"));
    }

    #[test]
    fn yaml_errors_convert() {
        let yaml_error = serde_yaml::from_str::<u32>("[not, a, number]").unwrap_err();
        let error: Error = yaml_error.into();

        assert!(matches!(error, Error::Yaml(_)));
        assert!(error.to_string().starts_with("YAML error"));
    }
}
