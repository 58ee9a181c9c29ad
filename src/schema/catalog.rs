use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::Error;
use crate::schema::{AttributeSet, AttributeType, GsiCount};

/// Symbolic identifier of the primary index in an [`IndexCatalog`]
pub const DEFAULT_INDEX_ID: &str = "defaultIndex";

/// Partition key attribute of the primary index
pub const DEFAULT_PARTITION_KEY: &str = "pk";

/// Sort key attribute of the primary index
pub const DEFAULT_SORT_KEY: &str = "sk";

/// Identifies one index of a single-table design
///
/// Orders the default index first, then secondary indexes by number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexId {
    /// The table's primary key (`defaultIndex`)
    Default,
    /// The `n`-th global secondary index (`gsi{n}`), numbered from 1
    Gsi(NonZeroU32),
}

impl IndexId {
    /// The `n`-th secondary index id, `None` for `n == 0`
    pub fn gsi(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(IndexId::Gsi)
    }

    /// All index ids of a table with `count` secondary indexes
    pub fn all(count: GsiCount) -> impl Iterator<Item = IndexId> {
        std::iter::once(IndexId::Default)
            .chain(count.numbers().filter_map(IndexId::gsi))
    }

    /// The attribute backing this index's partition key
    pub fn partition_key_attribute(self) -> String {
        match self {
            IndexId::Default => DEFAULT_PARTITION_KEY.to_string(),
            IndexId::Gsi(n) => format!("gsi{n}pk"),
        }
    }

    /// The attribute backing this index's sort key
    pub fn sort_key_attribute(self) -> String {
        match self {
            IndexId::Default => DEFAULT_SORT_KEY.to_string(),
            IndexId::Gsi(n) => format!("gsi{n}sk"),
        }
    }

    /// The physical index name, `None` for the primary index
    pub fn index_name(self) -> Option<String> {
        match self {
            IndexId::Default => None,
            IndexId::Gsi(_) => Some(self.to_string()),
        }
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexId::Default => f.write_str(DEFAULT_INDEX_ID),
            IndexId::Gsi(n) => write!(f, "gsi{n}"),
        }
    }
}

impl FromStr for IndexId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DEFAULT_INDEX_ID {
            return Ok(IndexId::Default);
        }
        s.strip_prefix("gsi")
            .and_then(gsi_number)
            .map(IndexId::Gsi)
            .ok_or_else(|| Error::invalid_argument(format!("unknown index id '{s}'")))
    }
}

// Plain decimal without sign or leading zeros, so names round-trip through Display.
fn gsi_number(digits: &str) -> Option<NonZeroU32> {
    if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl Serialize for IndexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Attribute names backing one index's partition and sort key
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexKeyPair {
    /// Attribute holding the partition key value
    #[serde(rename = "partitionKey")]
    pub partition_key_attribute: String,
    /// Attribute holding the sort key value
    #[serde(rename = "sortKey")]
    pub sort_key_attribute: String,
    /// Physical index name; absent for the primary index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
}

impl IndexKeyPair {
    /// The key pair following the naming convention for `id`
    pub fn for_index(id: IndexId) -> Self {
        Self {
            partition_key_attribute: id.partition_key_attribute(),
            sort_key_attribute: id.sort_key_attribute(),
            index_name: id.index_name(),
        }
    }

    /// Whether this pair describes the table's primary key
    pub fn is_primary(&self) -> bool {
        self.index_name.is_none()
    }

    /// Partition and sort key attribute names, in that order
    pub fn attribute_names(&self) -> [&str; 2] {
        [
            self.partition_key_attribute.as_str(),
            self.sort_key_attribute.as_str(),
        ]
    }
}

/// Index id to key pair mapping for a single-table design
///
/// The single source of truth for table provisioning and for query key
/// composition. Always holds the default index plus `gsi1..=gsiN`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexCatalog {
    indexes: BTreeMap<IndexId, IndexKeyPair>,
}

impl IndexCatalog {
    pub(crate) fn for_count(count: GsiCount) -> Self {
        let indexes = IndexId::all(count)
            .map(|id| (id, IndexKeyPair::for_index(id)))
            .collect();
        Self { indexes }
    }

    /// Number of indexes, including the default one
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Always `false`: the default index is present in every catalog
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Number of secondary indexes
    pub fn gsi_count(&self) -> GsiCount {
        GsiCount::new((self.indexes.len() - 1) as u32)
    }

    /// Look up an index by id
    pub fn get(&self, id: IndexId) -> Option<&IndexKeyPair> {
        self.indexes.get(&id)
    }

    /// Look up an index by its symbolic name (`defaultIndex`, `gsi1`, ...)
    pub fn get_by_name(&self, name: &str) -> Option<&IndexKeyPair> {
        name.parse().ok().and_then(|id| self.get(id))
    }

    /// The primary index key pair
    pub fn default_index(&self) -> &IndexKeyPair {
        // for_count always inserts the default entry
        &self.indexes[&IndexId::Default]
    }

    /// The `n`-th secondary index, if the catalog has one
    pub fn gsi(&self, n: u32) -> Option<&IndexKeyPair> {
        IndexId::gsi(n).and_then(|id| self.get(id))
    }

    /// All indexes, default first
    pub fn iter(&self) -> impl Iterator<Item = (IndexId, &IndexKeyPair)> {
        self.indexes.iter().map(|(id, pair)| (*id, pair))
    }

    /// Secondary indexes only, in numeric order
    pub fn secondary_indexes(&self) -> impl Iterator<Item = (IndexId, &IndexKeyPair)> {
        self.iter().filter(|(id, _)| *id != IndexId::Default)
    }

    /// Union of every key attribute referenced by the catalog
    pub fn attribute_set(&self) -> AttributeSet {
        let mut attributes = AttributeSet::default();
        for (_, pair) in self.iter() {
            for name in pair.attribute_names() {
                attributes.insert(name, AttributeType::String);
            }
        }
        attributes
    }
}

impl<'a> IntoIterator for &'a IndexCatalog {
    type Item = (IndexId, &'a IndexKeyPair);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for IndexCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
