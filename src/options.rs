use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;

use crate::Error;
use crate::config::SchemaConfig;
use crate::schema::{
    AttributeSet, GsiCount, IndexCatalog, IndexId, IndexKeyPair, IndexSchema, KeyFieldNames,
    SchemaVersion,
};
use crate::stage::RemovalPolicy;

/// Table options handed to the provisioning layer
///
/// Serializes to
///
/// ```json
/// {
///   "fields": { "pk": "string", "sk": "string", "gsi1pk": "string", "gsi1sk": "string" },
///   "primaryIndex": { "partitionKey": "pk", "sortKey": "sk" },
///   "globalIndexes": { "gsi1": { "partitionKey": "gsi1pk", "sortKey": "gsi1sk" } },
///   "cdk": { "table": { "removalPolicy": "retain" } }
/// }
/// ```
///
/// with the key field names taken from the [`SchemaVersion`]. The `cdk` block
/// is only emitted for `v2` and only when a removal policy was attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableOptions {
    schema_version: SchemaVersion,
    schema: IndexSchema,
    removal_policy: Option<RemovalPolicy>,
}

impl TableOptions {
    /// Options for a table with `n` secondary indexes
    pub fn new<N>(n: N, schema_version: SchemaVersion) -> Result<Self, Error>
    where
        N: TryInto<GsiCount>,
        Error: From<<N as TryInto<GsiCount>>::Error>,
    {
        Ok(Self {
            schema_version,
            schema: IndexSchema::new(n)?,
            removal_policy: None,
        })
    }

    /// Options for a config, with the removal policy derived from its stage
    pub fn from_config(config: &SchemaConfig) -> Result<Self, Error> {
        let options = Self::new(config.gsi_count, config.schema_version)?;
        Ok(match config.removal_policy() {
            Some(policy) => options.with_removal_policy(policy),
            None => options,
        })
    }

    /// Attach the policy applied when the owning stack is removed
    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = Some(policy);
        self
    }

    /// Vocabulary used for key field names
    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_version
    }

    /// Key field names for [`Self::schema_version`]
    pub fn key_field_names(&self) -> KeyFieldNames {
        self.schema_version.key_field_names()
    }

    /// Declared key attributes
    pub fn fields(&self) -> &AttributeSet {
        self.schema.attributes()
    }

    /// The underlying index catalog
    pub fn catalog(&self) -> &IndexCatalog {
        self.schema.catalog()
    }

    /// The primary index in this version's vocabulary
    pub fn primary_index(&self) -> KeyedIndex<'_> {
        KeyedIndex::new(self.key_field_names(), self.catalog().default_index())
    }

    /// Secondary indexes in this version's vocabulary
    pub fn global_indexes(&self) -> impl Iterator<Item = (IndexId, KeyedIndex<'_>)> {
        let fields = self.key_field_names();
        self.catalog()
            .secondary_indexes()
            .map(move |(id, pair)| (id, KeyedIndex::new(fields, pair)))
    }

    /// The removal policy emitted in the options, if any
    ///
    /// Always `None` for `v3`, which has no construct-level table settings.
    pub fn removal_policy(&self) -> Option<RemovalPolicy> {
        self.removal_policy
            .filter(|_| self.schema_version == SchemaVersion::V2)
    }

    /// Render the options as a JSON value
    pub fn to_json(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self)?)
    }
}

/// An index key pair spelled with a provisioning vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyedIndex<'a> {
    fields: KeyFieldNames,
    pair: &'a IndexKeyPair,
}

impl<'a> KeyedIndex<'a> {
    fn new(fields: KeyFieldNames, pair: &'a IndexKeyPair) -> Self {
        Self { fields, pair }
    }

    /// The underlying key pair
    pub fn pair(&self) -> &'a IndexKeyPair {
        self.pair
    }

    /// `(field name, attribute)` for the partition key
    pub fn partition_key(&self) -> (&'static str, &'a str) {
        (
            self.fields.partition_key_field,
            self.pair.partition_key_attribute.as_str(),
        )
    }

    /// `(field name, attribute)` for the sort key
    pub fn sort_key(&self) -> (&'static str, &'a str) {
        (self.fields.sort_key_field, self.pair.sort_key_attribute.as_str())
    }
}

impl Serialize for KeyedIndex<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        let (pk_field, pk_attribute) = self.partition_key();
        let (sk_field, sk_attribute) = self.sort_key();
        map.serialize_entry(pk_field, pk_attribute)?;
        map.serialize_entry(sk_field, sk_attribute)?;
        map.end()
    }
}

#[derive(Serialize)]
struct CdkOptions {
    table: CdkTableOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CdkTableOptions {
    removal_policy: RemovalPolicy,
}

impl Serialize for TableOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let removal_policy = self.removal_policy();
        let len = if removal_policy.is_some() { 4 } else { 3 };

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("fields", self.fields())?;
        map.serialize_entry("primaryIndex", &self.primary_index())?;
        map.serialize_entry("globalIndexes", &GlobalIndexes(self))?;
        if let Some(removal_policy) = removal_policy {
            map.serialize_entry(
                "cdk",
                &CdkOptions {
                    table: CdkTableOptions { removal_policy },
                },
            )?;
        }
        map.end()
    }
}

struct GlobalIndexes<'a>(&'a TableOptions);

impl Serialize for GlobalIndexes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.global_indexes())
    }
}
