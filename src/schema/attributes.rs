use aws_sdk_dynamodb::types::ScalarAttributeType;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

use crate::schema::{GsiCount, IndexId};

/// Declared scalar type of a key attribute
///
/// Single-table keys are composed strings, so `String` is the only type the
/// generators emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// DynamoDB `S`
    String,
}

impl AttributeType {
    /// The DynamoDB attribute type used in table definitions
    pub fn scalar_attribute_type(self) -> ScalarAttributeType {
        match self {
            AttributeType::String => ScalarAttributeType::S,
        }
    }
}

/// Key attributes a table or entity must declare
///
/// Names are unique and iterate in generation order (`pk`, `sk`, `gsi1pk`,
/// `gsi1sk`, ...). Equality ignores order.
#[derive(Clone, Debug, Default)]
pub struct AttributeSet {
    attributes: Vec<(String, AttributeType)>,
    // name -> position in `attributes`
    positions: HashMap<String, usize>,
}

impl AttributeSet {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            attributes: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn for_count(count: GsiCount) -> Self {
        let capacity = 2 + 2 * count.get() as usize;
        let mut attributes = AttributeSet::with_capacity(capacity);
        for id in IndexId::all(count) {
            attributes.insert(id.partition_key_attribute(), AttributeType::String);
            attributes.insert(id.sort_key_attribute(), AttributeType::String);
        }
        attributes
    }

    /// Adds an attribute; a name that is already declared keeps its first type
    pub(crate) fn insert(&mut self, name: impl Into<String>, attribute_type: AttributeType) {
        let name = name.into();
        if self.positions.contains_key(&name) {
            return;
        }
        let _ = self.positions.insert(name.clone(), self.attributes.len());
        self.attributes.push((name, attribute_type));
    }

    /// Number of declared attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether no attribute is declared
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Whether `name` is declared
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Declared type of `name`
    pub fn get(&self, name: &str) -> Option<AttributeType> {
        self.positions
            .get(name)
            .map(|&position| self.attributes[position].1)
    }

    /// Attribute names in generation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(name, _)| name.as_str())
    }

    /// Attribute names with their types, in generation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, AttributeType)> {
        self.attributes
            .iter()
            .map(|(name, attribute_type)| (name.as_str(), *attribute_type))
    }
}

impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, attribute_type)| other.get(name) == Some(attribute_type))
    }
}

impl Eq for AttributeSet {}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
