use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Provisioning API vocabulary for key field names
///
/// The same partition/sort key concept is spelled `partitionKey`/`sortKey` by
/// the v2 constructs and `hashKey`/`rangeKey` by v3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// `partitionKey` / `sortKey`
    #[default]
    V2,
    /// `hashKey` / `rangeKey`
    V3,
}

impl SchemaVersion {
    /// The literal accepted by [`FromStr`]
    pub const fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V2 => "v2",
            SchemaVersion::V3 => "v3",
        }
    }

    /// Key field names in this version's vocabulary
    pub const fn key_field_names(self) -> KeyFieldNames {
        match self {
            SchemaVersion::V2 => KeyFieldNames {
                partition_key_field: "partitionKey",
                sort_key_field: "sortKey",
            },
            SchemaVersion::V3 => KeyFieldNames {
                partition_key_field: "hashKey",
                sort_key_field: "rangeKey",
            },
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v2" => Ok(SchemaVersion::V2),
            "v3" => Ok(SchemaVersion::V3),
            other => Err(Error::invalid_argument(format!(
                "unknown schema version '{other}', expected 'v2' or 'v3'"
            ))),
        }
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Field names a provisioning API uses for an index's key attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFieldNames {
    /// Field naming the partition key attribute
    pub partition_key_field: &'static str,
    /// Field naming the sort key attribute
    pub sort_key_field: &'static str,
}
