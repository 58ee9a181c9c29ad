use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;
use crate::schema::{GsiCount, SchemaVersion};
use crate::stage::RemovalPolicy;

/// Environment variable holding the number of secondary indexes
pub const GSI_COUNT_ENV: &str = "GSI_COUNT";

/// Environment variable holding the provisioning vocabulary (`v2`/`v3`)
pub const SCHEMA_VERSION_ENV: &str = "SCHEMA_VERSION";

/// Environment variable holding the deployment stage
pub const STAGE_ENV: &str = "STAGE";

/// Options recognized when building a table's key schema
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSchemaConfig")]
pub struct SchemaConfig {
    /// Number of secondary indexes to generate
    pub gsi_count: GsiCount,
    /// Vocabulary for key field names
    pub schema_version: SchemaVersion,
    /// Deployment stage, used to derive the removal policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

/// Unvalidated form of [`SchemaConfig`] as it appears in JSON
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSchemaConfig {
    #[serde(default)]
    gsi_count: Option<f64>,
    #[serde(default)]
    schema_version: Option<String>,
    #[serde(default)]
    stage: Option<String>,
}

impl TryFrom<RawSchemaConfig> for SchemaConfig {
    type Error = Error;

    fn try_from(raw: RawSchemaConfig) -> Result<Self, Self::Error> {
        let gsi_count = match raw.gsi_count {
            Some(count) => GsiCount::try_from(count)?,
            None => GsiCount::ZERO,
        };
        let schema_version = match raw.schema_version {
            Some(version) => version.parse::<SchemaVersion>()?,
            None => SchemaVersion::default(),
        };
        Ok(Self {
            gsi_count,
            schema_version,
            stage: raw.stage,
        })
    }
}

impl SchemaConfig {
    /// Create a config without a stage
    pub fn new(gsi_count: impl Into<GsiCount>, schema_version: SchemaVersion) -> Self {
        Self {
            gsi_count: gsi_count.into(),
            schema_version,
            stage: None,
        }
    }

    /// Set the deployment stage
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Parse a JSON document such as `{"gsiCount": 2, "schemaVersion": "v3"}`
    ///
    /// Out-of-range values are reported as [`Error::InvalidArgument`], malformed
    /// JSON and unknown keys as [`Error::SerdeJson`].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: RawSchemaConfig = serde_json::from_str(json)?;
        let config = Self::try_from(raw)?;
        debug!(?config, "loaded schema config from json");
        Ok(config)
    }

    /// Read [`GSI_COUNT_ENV`], [`SCHEMA_VERSION_ENV`] and [`STAGE_ENV`]
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source using the environment variable names
    ///
    /// Missing keys fall back to zero indexes, `v2` and no stage.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gsi_count = match lookup(GSI_COUNT_ENV) {
            Some(value) => parse_gsi_count(&value)?,
            None => GsiCount::ZERO,
        };
        let schema_version = match lookup(SCHEMA_VERSION_ENV) {
            Some(value) => value.trim().parse::<SchemaVersion>()?,
            None => SchemaVersion::default(),
        };
        let stage = lookup(STAGE_ENV).filter(|stage| !stage.is_empty());

        let config = Self {
            gsi_count,
            schema_version,
            stage,
        };
        debug!(?config, "loaded schema config");
        Ok(config)
    }

    /// Removal policy for the configured stage, if one is set
    pub fn removal_policy(&self) -> Option<RemovalPolicy> {
        self.stage.as_deref().map(RemovalPolicy::for_stage)
    }
}

fn parse_gsi_count(value: &str) -> Result<GsiCount, Error> {
    let value = value.trim();
    if let Ok(count) = value.parse::<i64>() {
        return GsiCount::try_from(count);
    }
    match value.parse::<f64>() {
        Ok(count) => GsiCount::try_from(count),
        Err(_) => Err(Error::invalid_argument(format!(
            "gsi count must be a non-negative integer, got '{value}'"
        ))),
    }
}
