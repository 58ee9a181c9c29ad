//! Key values for entities stored in a single-table design.
//!
//! Entities map their own key composites onto the generic attributes of an
//! [`IndexKeyPair`]; the helpers here build items and queries against those
//! attributes so they always match how the table was provisioned.

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::schema::IndexKeyPair;

/// Separator between an entity id prefix and its unique part
pub const ID_SEPARATOR: char = '|';

/// Generate a sortable entity id such as `user|01ARZ3NDEKTSV4RRFFQ69G5FAV`
///
/// Prefixes should be short and unique per entity type.
pub fn generate_id(prefix: &str) -> String {
    format!(
        "{prefix}{ID_SEPARATOR}{}",
        rusty_ulid::generate_ulid_string()
    )
}

/// Attribute holding the creation timestamp
pub const CREATED_AT: &str = "createdAt";
/// Attribute holding the last write timestamp
pub const UPDATED_AT: &str = "updatedAt";
/// Attribute holding who created the entity
pub const CREATED_BY: &str = "createdBy";
/// Attribute holding who last wrote the entity
pub const UPDATED_BY: &str = "updatedBy";

/// Audit attributes every entity carries next to its keys
///
/// Timestamps are ISO-8601 UTC strings with millisecond precision, e.g.
/// `2024-01-01T10:00:00.000Z`. The `created*` fields never change once set;
/// [`AuditFields::touch`] refreshes the `updated*` ones on each write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    created_at: String,
    updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_by: Option<String>,
}

impl AuditFields {
    /// Stamp a new entity, optionally recording who created it
    pub fn new(actor: Option<&str>) -> Self {
        let now = timestamp();
        Self {
            created_at: now.clone(),
            updated_at: now,
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
        }
    }

    /// Record a write; an actor of `None` keeps the previous `updatedBy`
    pub fn touch(&mut self, actor: Option<&str>) {
        self.updated_at = timestamp();
        if let Some(actor) = actor {
            self.updated_by = Some(actor.to_string());
        }
    }

    /// When the entity was created
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// When the entity was last written
    pub fn updated_at(&self) -> &str {
        &self.updated_at
    }

    /// Who created the entity, if recorded
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Who last wrote the entity, if recorded
    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }

    /// The audit attributes as item values; unset actors are left out
    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        let fields = [
            (CREATED_AT, Some(&self.created_at)),
            (UPDATED_AT, Some(&self.updated_at)),
            (CREATED_BY, self.created_by.as_ref()),
            (UPDATED_BY, self.updated_by.as_ref()),
        ];

        let mut item = HashMap::new();
        for (name, value) in fields {
            if let Some(value) = value {
                let _ = item.insert(name.to_string(), AttributeValue::S(value.clone()));
            }
        }
        item
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// How a query constrains an index's sort key
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SortKeyCondition {
    /// Every item in the partition
    #[default]
    Any,
    /// Sort key equal to the value
    Equals(String),
    /// Sort key starting with the value
    BeginsWith(String),
}

impl IndexKeyPair {
    /// Item attributes holding the given key values on this index
    pub fn key_item(
        &self,
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                self.partition_key_attribute.clone(),
                AttributeValue::S(partition_key.into()),
            ),
            (
                self.sort_key_attribute.clone(),
                AttributeValue::S(sort_key.into()),
            ),
        ])
    }

    fn key_condition_expression(&self, sort_key: &SortKeyCondition) -> String {
        let partition = format!("{} = :pk", self.partition_key_attribute);
        match sort_key {
            SortKeyCondition::Any => partition,
            SortKeyCondition::Equals(_) => {
                format!("{partition} and {} = :sk", self.sort_key_attribute)
            }
            SortKeyCondition::BeginsWith(_) => format!(
                "{partition} and begins_with({}, :sk)",
                self.sort_key_attribute
            ),
        }
    }
}

/// Start a `Query` on the index described by `pair`
///
/// The default pair queries the table itself; secondary pairs set the index
/// name. The returned builder can be refined (limit, filters) before sending.
pub fn query_index(
    client: &DynamoDbClient,
    table_name: &str,
    pair: &IndexKeyPair,
    partition_key: impl Into<String>,
    sort_key: SortKeyCondition,
) -> QueryFluentBuilder {
    let builder = client
        .query()
        .table_name(table_name)
        .set_index_name(pair.index_name.clone())
        .key_condition_expression(pair.key_condition_expression(&sort_key))
        .expression_attribute_values(":pk", AttributeValue::S(partition_key.into()));

    match sort_key {
        SortKeyCondition::Any => builder,
        SortKeyCondition::Equals(value) | SortKeyCondition::BeginsWith(value) => {
            builder.expression_attribute_values(":sk", AttributeValue::S(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::generate_index_catalog;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Region};

    fn offline_client() -> DynamoDbClient {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        DynamoDbClient::from_conf(config)
    }

    #[test]
    fn test_generate_id() {
        let id = generate_id("user");
        let (prefix, ulid) = id.split_once(ID_SEPARATOR).unwrap();
        assert_eq!(prefix, "user");
        assert_eq!(ulid.len(), 26);
        assert_ne!(generate_id("user"), id);
    }

    #[test]
    fn test_key_item() {
        let catalog = generate_index_catalog(1).unwrap();
        let item = catalog.gsi(1).unwrap().key_item("email|a@b.c", "user|1");

        assert_eq!(item.len(), 2);
        assert_eq!(item["gsi1pk"], AttributeValue::S("email|a@b.c".to_string()));
        assert_eq!(item["gsi1sk"], AttributeValue::S("user|1".to_string()));
    }

    #[test]
    fn test_query_default_index() {
        let catalog = generate_index_catalog(0).unwrap();
        let client = offline_client();
        let query = query_index(
            &client,
            "app",
            catalog.default_index(),
            "user|1",
            SortKeyCondition::Any,
        );
        let input = query.as_input();

        assert_eq!(input.get_table_name().as_deref(), Some("app"));
        assert_eq!(input.get_index_name(), &None);
        assert_eq!(
            input.get_key_condition_expression().as_deref(),
            Some("pk = :pk")
        );
        let values = input.get_expression_attribute_values().as_ref().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[":pk"], AttributeValue::S("user|1".to_string()));
    }

    #[test]
    fn test_query_secondary_index_with_prefix() {
        let catalog = generate_index_catalog(2).unwrap();
        let client = offline_client();
        let query = query_index(
            &client,
            "app",
            catalog.gsi(2).unwrap(),
            "org|1",
            SortKeyCondition::BeginsWith("user|".to_string()),
        );
        let input = query.as_input();

        assert_eq!(input.get_index_name().as_deref(), Some("gsi2"));
        assert_eq!(
            input.get_key_condition_expression().as_deref(),
            Some("gsi2pk = :pk and begins_with(gsi2sk, :sk)")
        );
        let values = input.get_expression_attribute_values().as_ref().unwrap();
        assert_eq!(values[":sk"], AttributeValue::S("user|".to_string()));
    }

    #[test]
    fn test_query_exact_sort_key() {
        let catalog = generate_index_catalog(1).unwrap();
        let client = offline_client();
        let query = query_index(
            &client,
            "app",
            catalog.gsi(1).unwrap(),
            "email|a@b.c",
            SortKeyCondition::Equals("user|1".to_string()),
        );

        assert_eq!(
            query.as_input().get_key_condition_expression().as_deref(),
            Some("gsi1pk = :pk and gsi1sk = :sk")
        );
    }

    #[test]
    fn test_new_audit_fields() {
        let audit = AuditFields::new(Some("user|1"));
        assert_eq!(audit.created_at(), audit.updated_at());
        assert_eq!(audit.created_by(), Some("user|1"));
        assert_eq!(audit.updated_by(), Some("user|1"));

        let created_at = audit.created_at();
        let created = chrono::DateTime::parse_from_rfc3339(created_at).unwrap();
        assert_eq!(created.offset().local_minus_utc(), 0);
        assert!(created_at.ends_with('Z'));
        // 2024-01-01T10:00:00.000Z
        assert_eq!(created_at.len(), 24);
    }

    #[test]
    fn test_touch_keeps_creation() {
        let mut audit = AuditFields::new(Some("user|1"));
        let created_at = audit.created_at().to_string();

        audit.touch(Some("user|2"));
        assert_eq!(audit.created_at(), created_at);
        assert_eq!(audit.created_by(), Some("user|1"));
        assert_eq!(audit.updated_by(), Some("user|2"));
        assert!(audit.updated_at() >= audit.created_at());

        audit.touch(None);
        assert_eq!(audit.updated_by(), Some("user|2"));
    }

    #[test]
    fn test_audit_item_and_json() {
        let audit = AuditFields::new(None);
        let item = audit.to_item();
        assert_eq!(item.len(), 2);
        assert_eq!(
            item[CREATED_AT],
            AttributeValue::S(audit.created_at().to_string())
        );
        assert!(!item.contains_key(CREATED_BY));

        let json = serde_json::to_value(&audit).unwrap();
        assert_eq!(json["createdAt"], audit.created_at());
        assert!(json.get("updatedBy").is_none());

        let parsed: AuditFields = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, audit);
    }
}
