//! Domain types for CMDB entity records.
//!
//! These are the read-only records supplied by the surrounding CMDB
//! application. The engine never creates or mutates them; it only derives
//! graphs, impact sets and layouts from them.
//!
//! Records deserialize from the camelCase JSON the CMDB REST API returns.
//! Optional fields that are missing fall back to their defaults instead of
//! failing, and enum labels are matched leniently (case, spaces, `_` and `-`
//! are ignored), so `"Load Balancer"` and `"load_balancer"` are the same CI
//! type.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reduce a label to lowercase ASCII alphanumerics for lenient matching.
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Read an optional field, treating an explicit `null` like a missing value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier of a [`Service`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub u64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a [`ConfigurationItem`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CiId(pub u64);

impl fmt::Display for CiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Business criticality of a service.
///
/// Ordered: `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Criticality {
    /// Outage is an inconvenience
    Low,
    /// Default criticality
    #[default]
    Medium,
    /// Outage affects a significant part of the business
    High,
    /// Outage stops the business
    Critical,
}

impl Criticality {
    /// Canonical label used for display and serialization.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criticality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("unknown criticality: {s:?}")),
        }
    }
}

impl TryFrom<String> for Criticality {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Criticality> for String {
    fn from(value: Criticality) -> Self {
        value.as_str().to_string()
    }
}

/// Deployment environment of a configuration item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Environment {
    /// Live production
    Production,
    /// Pre-production staging
    Staging,
    /// Development
    Development,
    /// Test / QA
    Testing,
    /// Disaster recovery
    DisasterRecovery,
}

impl Environment {
    /// Canonical label used for display and serialization.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Staging => "Staging",
            Self::Development => "Development",
            Self::Testing => "Testing",
            Self::DisasterRecovery => "DR",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test" => Ok(Self::Testing),
            "dr" | "disasterrecovery" => Ok(Self::DisasterRecovery),
            _ => Err(format!("unknown environment: {s:?}")),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.as_str().to_string()
    }
}

/// Type of a configuration item.
///
/// The vocabulary is open: labels that are not one of the well-known types
/// are preserved verbatim in [`CiType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CiType {
    /// Physical or virtual host
    Server,
    /// Database instance
    Database,
    /// Deployed application
    Application,
    /// Network-exposed API
    Api,
    /// Load balancer
    LoadBalancer,
    /// Any other type label
    Other(String),
}

impl CiType {
    /// Returns `true` if both values name the same type, ignoring case and
    /// punctuation in free-form labels.
    #[must_use]
    pub fn same_kind(&self, other: &CiType) -> bool {
        match (self, other) {
            (Self::Other(a), Self::Other(b)) => normalize_label(a) == normalize_label(b),
            _ => self == other,
        }
    }
}

impl fmt::Display for CiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => f.write_str("Server"),
            Self::Database => f.write_str("Database"),
            Self::Application => f.write_str("Application"),
            Self::Api => f.write_str("API"),
            Self::LoadBalancer => f.write_str("Load Balancer"),
            Self::Other(label) => f.write_str(label),
        }
    }
}

impl From<String> for CiType {
    fn from(value: String) -> Self {
        match normalize_label(&value).as_str() {
            "server" => Self::Server,
            "database" | "db" => Self::Database,
            "application" | "app" => Self::Application,
            "api" => Self::Api,
            "loadbalancer" | "lb" => Self::LoadBalancer,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for CiType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CiType> for String {
    fn from(value: CiType) -> Self {
        value.to_string()
    }
}

/// A business-facing capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Unique identifier
    pub id: ServiceId,

    /// Display name
    pub name: String,

    /// Business criticality (defaults to Medium)
    #[serde(default, deserialize_with = "null_as_default")]
    pub criticality: Criticality,

    /// Operational status (e.g. "Operational", "Degraded")
    #[serde(default)]
    pub status: Option<String>,

    /// Owning contact
    #[serde(default)]
    pub owner: Option<String>,
}

impl Service {
    /// Create a service with default criticality and no status or owner.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ServiceId(id),
            name: name.into(),
            criticality: Criticality::default(),
            status: None,
            owner: None,
        }
    }
}

/// An infrastructure or application component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    /// Unique identifier
    pub id: CiId,

    /// Display name
    pub name: String,

    /// Component type
    #[serde(rename = "type")]
    pub ci_type: CiType,

    /// Operational status
    #[serde(default)]
    pub status: Option<String>,

    /// Deployment environment
    #[serde(default)]
    pub environment: Option<Environment>,
}

impl ConfigurationItem {
    /// Create a configuration item with no status or environment.
    pub fn new(id: u64, name: impl Into<String>, ci_type: impl Into<CiType>) -> Self {
        Self {
            id: CiId(id),
            name: name.into(),
            ci_type: ci_type.into(),
            status: None,
            environment: None,
        }
    }

    /// Set the environment (builder style).
    #[must_use]
    pub fn in_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }
}

/// Directed "service uses CI" relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCiMapping {
    /// Unique identifier of the mapping record
    pub id: u64,

    /// The service that uses the CI
    pub service_id: ServiceId,

    /// The CI being used
    pub ci_id: CiId,

    /// Free-form relationship label (e.g. "Uses", "Runs On")
    #[serde(default)]
    pub relationship_type: Option<String>,

    /// The CI is load-bearing for the service
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_critical: bool,
}

impl ServiceCiMapping {
    /// Create a non-critical mapping without a label.
    #[must_use]
    pub fn new(id: u64, service_id: u64, ci_id: u64) -> Self {
        Self {
            id,
            service_id: ServiceId(service_id),
            ci_id: CiId(ci_id),
            relationship_type: None,
            is_critical: false,
        }
    }

    /// Mark the mapping critical (builder style).
    #[must_use]
    pub fn critical(mut self) -> Self {
        self.is_critical = true;
        self
    }
}

/// Directed relation between two CIs.
///
/// For dependency relationships the source is the dependent and the target
/// is the dependency: "web `DependsOn` db" is `source = web, target = db`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiRelationship {
    /// Unique identifier of the relationship record
    pub id: u64,

    /// The dependent side
    pub source_ci_id: CiId,

    /// The dependency side
    pub target_ci_id: CiId,

    /// Relationship label (e.g. "DependsOn", "HostedOn", "Connects To").
    /// A missing label means `DependsOn`.
    #[serde(default)]
    pub relationship_type: Option<String>,
}

/// Canonical label of the only relationship type that propagates impact.
pub const DEPENDS_ON: &str = "DependsOn";

impl CiRelationship {
    /// Create a `DependsOn` relationship: `source` depends on `target`.
    #[must_use]
    pub fn depends_on(id: u64, source: u64, target: u64) -> Self {
        Self::labeled(id, source, target, DEPENDS_ON)
    }

    /// Create a relationship with an arbitrary label.
    pub fn labeled(id: u64, source: u64, target: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            source_ci_id: CiId(source),
            target_ci_id: CiId(target),
            relationship_type: Some(label.into()),
        }
    }

    /// Returns `true` if this relationship means "source depends on target".
    ///
    /// Only dependency relationships propagate impact. Descriptive labels such
    /// as "HostedOn" or "Connects To" are drawn but inert.
    #[must_use]
    pub fn implies_dependency(&self) -> bool {
        self.relationship_type
            .as_deref()
            .is_none_or(|label| normalize_label(label) == "dependson")
    }
}
