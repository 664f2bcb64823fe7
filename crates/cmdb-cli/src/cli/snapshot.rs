//! Resilient loading of CMDB snapshot directories.
//!
//! A snapshot directory holds one JSONL file per record collection. Each
//! non-empty line is one camelCase JSON record. A missing file is an empty
//! collection, and a line that fails to parse is skipped and reported as a
//! [`LoadWarning`] so one bad export row never hides the rest of the data.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use cmdb_graph::{CiRelationship, ConfigurationItem, Records, Service, ServiceCiMapping};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Services file name within a snapshot directory.
pub const SERVICES_FILE: &str = "services.jsonl";

/// Configuration items file name.
pub const CIS_FILE: &str = "cis.jsonl";

/// Service-to-CI mappings file name.
pub const MAPPINGS_FILE: &str = "mappings.jsonl";

/// CI relationships file name.
pub const RELATIONSHIPS_FILE: &str = "relationships.jsonl";

/// Errors that prevent a snapshot from loading at all.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The snapshot path is not a directory.
    #[error("snapshot directory not found: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A snapshot file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// The file being read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// A non-fatal problem found while loading a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A line could not be parsed as a record and was skipped.
    MalformedRecord {
        /// Snapshot file name
        file: &'static str,
        /// 1-based line number
        line_number: usize,
        /// Parse error description
        error: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord {
                file,
                line_number,
                error,
            } => write!(f, "{file}:{line_number}: skipped malformed record: {error}"),
        }
    }
}

/// All records of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Business services
    pub services: Vec<Service>,
    /// Configuration items
    pub cis: Vec<ConfigurationItem>,
    /// Service-to-CI mappings
    pub mappings: Vec<ServiceCiMapping>,
    /// CI-to-CI relationships
    pub relationships: Vec<CiRelationship>,
}

impl Snapshot {
    /// Borrow the records for graph construction.
    pub fn records(&self) -> Records<'_> {
        Records {
            services: &self.services,
            cis: &self.cis,
            mappings: &self.mappings,
            relationships: &self.relationships,
        }
    }
}

/// Load every collection from a snapshot directory.
///
/// Returns the records that parsed plus a warning per skipped line.
pub async fn load_snapshot(dir: &Path) -> Result<(Snapshot, Vec<LoadWarning>), LoadError> {
    if !fs::metadata(dir).await.is_ok_and(|meta| meta.is_dir()) {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }

    let mut warnings = Vec::new();
    let snapshot = Snapshot {
        services: load_records(dir, SERVICES_FILE, &mut warnings).await?,
        cis: load_records(dir, CIS_FILE, &mut warnings).await?,
        mappings: load_records(dir, MAPPINGS_FILE, &mut warnings).await?,
        relationships: load_records(dir, RELATIONSHIPS_FILE, &mut warnings).await?,
    };

    tracing::debug!(
        dir = %dir.display(),
        services = snapshot.services.len(),
        cis = snapshot.cis.len(),
        mappings = snapshot.mappings.len(),
        relationships = snapshot.relationships.len(),
        warnings = warnings.len(),
        "Loaded snapshot"
    );

    Ok((snapshot, warnings))
}

async fn load_records<T: DeserializeOwned>(
    dir: &Path,
    file: &'static str,
    warnings: &mut Vec<LoadWarning>,
) -> Result<Vec<T>, LoadError> {
    let path = dir.join(file);
    let io_error = |source| LoadError::Io {
        path: path.clone(),
        source,
    };

    let handle = match fs::File::open(&path).await {
        Ok(handle) => handle,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Snapshot file not found, treating as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(io_error(e)),
    };

    let mut lines = BufReader::new(handle).lines();
    let mut records = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await.map_err(io_error)? {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!(file, line_number, error = %e, "Skipping malformed record");
                warnings.push(LoadWarning::MalformedRecord {
                    file,
                    line_number,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(records)
}
