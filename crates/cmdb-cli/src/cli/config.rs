//! Engine configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use cmdb_graph::config::CONFIG_FILE_NAME;
use cmdb_graph::EngineConfig;
use tokio::fs;

/// Load the engine configuration.
///
/// An explicit `path` must exist. Without one, `cmdb.yaml` in the snapshot
/// directory is used if present, otherwise the defaults.
pub async fn load_config(path: Option<&Path>, snapshot_dir: &Path) -> Result<EngineConfig> {
    let (path, required): (PathBuf, bool) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (snapshot_dir.join(CONFIG_FILE_NAME), false),
    };

    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(EngineConfig::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read config {}", path.display()));
        }
    };

    let config = EngineConfig::from_yaml_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdb_graph::{Direction, Environment};
    use tempfile::TempDir;

    #[tokio::test]
    async fn defaults_without_a_config_file() {
        let dir = TempDir::new().unwrap();

        let config = load_config(None, dir.path()).await.unwrap();

        assert_eq!(config, EngineConfig::default());
    }

    #[tokio::test]
    async fn picks_up_config_in_the_snapshot_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "direction: left-to-right\nfilter:\n  environment: PROD\n",
        )
        .unwrap();

        let config = load_config(None, dir.path()).await.unwrap();

        assert_eq!(config.direction, Direction::LeftToRight);
        assert_eq!(config.filter.environment, Some(Environment::Production));
    }

    #[tokio::test]
    async fn explicit_missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("custom.yaml");

        let error = load_config(Some(&missing), dir.path()).await.unwrap_err();

        assert!(error.to_string().contains("custom.yaml"));
    }

    #[tokio::test]
    async fn invalid_values_name_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "layout:\n  node-gap: -1\n").unwrap();

        let error = load_config(Some(&path), dir.path()).await.unwrap_err();

        assert!(error.to_string().contains("bad.yaml"));
        assert!(format!("{error:#}").contains("node-gap"));
    }
}
