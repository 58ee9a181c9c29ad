use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::operation::create_table::builders::CreateTableFluentBuilder;
use aws_sdk_dynamodb::operation::create_table::{CreateTableError, CreateTableOutput};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ProvisionedThroughput,
};
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use tracing::{info, warn};

use crate::dynamodb_client;
use crate::error::Error;
use crate::schema::{IndexCatalog, IndexKeyPair};

/// DynamoDB's default quota of global secondary indexes per table
pub const MAX_GLOBAL_SECONDARY_INDEXES: u32 = 20;

const READ_CAPACITY_UNITS: i64 = 10;
const WRITE_CAPACITY_UNITS: i64 = 10;

/// `CreateTable` parameters derived from an [`IndexCatalog`]
#[derive(Clone, Debug, PartialEq)]
pub struct TableDefinition {
    /// Name of the table to create
    pub table_name: String,
    /// One string attribute per key attribute in the catalog
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Hash/range key schema of the primary index
    pub key_schema: Vec<KeySchemaElement>,
    /// One index per secondary catalog entry
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
}

/// Build the table definition for `catalog`
///
/// Attribute definitions are exactly the catalog's attribute set, so every
/// attribute referenced by an index is declared and nothing else is.
pub fn table_definition(
    table_name: &str,
    catalog: &IndexCatalog,
) -> Result<TableDefinition, Error> {
    if table_name.is_empty() {
        return Err(Error::invalid_argument("table name must not be empty"));
    }

    let gsi_count = catalog.gsi_count().get();
    if gsi_count > MAX_GLOBAL_SECONDARY_INDEXES {
        return Err(Error::invalid_argument(format!(
            "table '{table_name}' requests {gsi_count} global secondary indexes, \
             DynamoDB allows at most {MAX_GLOBAL_SECONDARY_INDEXES}"
        )));
    }

    let attribute_definitions = catalog
        .attribute_set()
        .iter()
        .map(|(name, attribute_type)| {
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(attribute_type.scalar_attribute_type())
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let primary_key_schema = key_schema(catalog.default_index())?;

    let global_secondary_indexes = catalog
        .secondary_indexes()
        .map(|(id, pair)| {
            GlobalSecondaryIndex::builder()
                .index_name(pair.index_name.clone().unwrap_or_else(|| id.to_string()))
                .set_key_schema(Some(key_schema(pair)?))
                .projection(
                    Projection::builder()
                        .projection_type(ProjectionType::All)
                        .build(),
                )
                .provisioned_throughput(provisioned_throughput()?)
                .build()
                .map_err(Error::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableDefinition {
        table_name: table_name.to_string(),
        attribute_definitions,
        key_schema: primary_key_schema,
        global_secondary_indexes,
    })
}

fn key_schema(pair: &IndexKeyPair) -> Result<Vec<KeySchemaElement>, Error> {
    Ok(vec![
        KeySchemaElement::builder()
            .attribute_name(&pair.partition_key_attribute)
            .key_type(KeyType::Hash)
            .build()?,
        KeySchemaElement::builder()
            .attribute_name(&pair.sort_key_attribute)
            .key_type(KeyType::Range)
            .build()?,
    ])
}

fn provisioned_throughput() -> Result<ProvisionedThroughput, Error> {
    Ok(ProvisionedThroughput::builder()
        .read_capacity_units(READ_CAPACITY_UNITS)
        .write_capacity_units(WRITE_CAPACITY_UNITS)
        .build()?)
}

/// Create a single-table design table with the global DynamoDB client
///
/// Automatically initializes the DynamoDB client with defaults if not already initialized.
pub async fn create_table(
    table_name: &str,
    catalog: &IndexCatalog,
) -> Result<CreateTableOutput, Error> {
    let client = dynamodb_client().await;
    create_table_with_client(client, table_name, catalog).await
}

/// Create a single-table design table with an explicit client
///
/// An existing table with the same name is not an error.
pub async fn create_table_with_client(
    client: &DynamoDbClient,
    table_name: &str,
    catalog: &IndexCatalog,
) -> Result<CreateTableOutput, Error> {
    let definition = table_definition(table_name, catalog)?;
    let gsi_count = definition.global_secondary_indexes.len();

    let result = create_table_request(client, definition)?.send().await;
    created_or_existing(table_name, gsi_count, result)
}

/// Build the `CreateTable` request for `definition` without sending it
pub fn create_table_request(
    client: &DynamoDbClient,
    definition: TableDefinition,
) -> Result<CreateTableFluentBuilder, Error> {
    // DynamoDB rejects an empty GlobalSecondaryIndexes list
    let global_secondary_indexes = if definition.global_secondary_indexes.is_empty() {
        None
    } else {
        Some(definition.global_secondary_indexes)
    };

    Ok(client
        .create_table()
        .table_name(definition.table_name)
        .set_attribute_definitions(Some(definition.attribute_definitions))
        .set_key_schema(Some(definition.key_schema))
        .set_global_secondary_indexes(global_secondary_indexes)
        .provisioned_throughput(provisioned_throughput()?))
}

fn created_or_existing(
    table_name: &str,
    gsi_count: usize,
    result: Result<CreateTableOutput, SdkError<CreateTableError, Response>>,
) -> Result<CreateTableOutput, Error> {
    match result {
        Ok(output) => {
            info!(table = table_name, gsi_count, "created table");
            Ok(output)
        }
        Err(e) => {
            if let Some(CreateTableError::ResourceInUseException(_)) = e.as_service_error() {
                warn!(table = table_name, "table already exists, skipping creation");
                return Ok(CreateTableOutput::builder().build());
            }
            Err(e.into())
        }
    }
}
