//! Key schema generation for single-table designs.
//!
//! A table with `N` global secondary indexes declares the attributes `pk`,
//! `sk`, `gsi1pk`, `gsi1sk`, ..., `gsiNpk`, `gsiNsk` and the indexes
//! `defaultIndex`, `gsi1`, ..., `gsiN`. Table provisioning and entity key
//! mapping both read these from the generators here, so the two never drift.

mod attributes;
mod catalog;
mod count;
mod vocabulary;

pub use attributes::{AttributeSet, AttributeType};
pub use catalog::{
    DEFAULT_INDEX_ID, DEFAULT_PARTITION_KEY, DEFAULT_SORT_KEY, IndexCatalog, IndexId,
    IndexKeyPair,
};
pub use count::GsiCount;
pub use vocabulary::{KeyFieldNames, SchemaVersion};

use tracing::debug;

use crate::Error;

/// Generate the key attributes for a table with `n` secondary indexes
///
/// Every attribute is declared as a string. Fails with
/// [`Error::InvalidArgument`] when `n` is negative or non-integral.
///
/// ```
/// let attributes = dynamo_index_schema::generate_attribute_set(2)?;
/// assert_eq!(attributes.len(), 6);
/// assert!(attributes.contains("gsi2sk"));
/// # Ok::<(), dynamo_index_schema::Error>(())
/// ```
pub fn generate_attribute_set<N>(n: N) -> Result<AttributeSet, Error>
where
    N: TryInto<GsiCount>,
    Error: From<<N as TryInto<GsiCount>>::Error>,
{
    let count: GsiCount = n.try_into()?;
    debug!(gsi_count = count.get(), "generating attribute set");
    Ok(AttributeSet::for_count(count))
}

/// Generate the index catalog for a table with `n` secondary indexes
///
/// The catalog has exactly `n + 1` entries: `defaultIndex` plus `gsi1..=gsiN`.
///
/// ```
/// use dynamo_index_schema::IndexId;
///
/// let catalog = dynamo_index_schema::generate_index_catalog(1)?;
/// let gsi1 = catalog.get(IndexId::gsi(1).unwrap()).unwrap();
/// assert_eq!(gsi1.partition_key_attribute, "gsi1pk");
/// assert_eq!(gsi1.index_name.as_deref(), Some("gsi1"));
/// # Ok::<(), dynamo_index_schema::Error>(())
/// ```
pub fn generate_index_catalog<N>(n: N) -> Result<IndexCatalog, Error>
where
    N: TryInto<GsiCount>,
    Error: From<<N as TryInto<GsiCount>>::Error>,
{
    let count: GsiCount = n.try_into()?;
    debug!(gsi_count = count.get(), "generating index catalog");
    Ok(IndexCatalog::for_count(count))
}

/// Look up the key field names of a provisioning API version (`"v2"` or `"v3"`)
pub fn generate_key_field_names(schema_version: &str) -> Result<KeyFieldNames, Error> {
    let version: SchemaVersion = schema_version.parse()?;
    Ok(version.key_field_names())
}

/// Attribute set and index catalog generated from one secondary index count
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexSchema {
    count: GsiCount,
    attributes: AttributeSet,
    catalog: IndexCatalog,
}

impl IndexSchema {
    /// Generate the schema of a table with `n` secondary indexes
    pub fn new<N>(n: N) -> Result<Self, Error>
    where
        N: TryInto<GsiCount>,
        Error: From<<N as TryInto<GsiCount>>::Error>,
    {
        let count: GsiCount = n.try_into()?;
        debug!(gsi_count = count.get(), "generating index schema");
        Ok(Self {
            count,
            attributes: AttributeSet::for_count(count),
            catalog: IndexCatalog::for_count(count),
        })
    }

    /// Number of secondary indexes
    pub fn gsi_count(&self) -> GsiCount {
        self.count
    }

    /// Key attributes to declare
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Index id to key pair mapping
    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }
}
