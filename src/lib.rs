//! # Single-Table DynamoDB Key Schemas
//!
//! Generates the key schema of a single-table DynamoDB design with support for:
//! - Key attribute sets (`pk`, `sk`, `gsi{i}pk`, `gsi{i}sk`)
//! - Index catalogs (`defaultIndex`, `gsi1`, ..., `gsiN`)
//! - Provisioning vocabularies (`partitionKey`/`sortKey` and `hashKey`/`rangeKey`)
//! - Table options with stage-driven removal policies
//! - Table creation and index queries driven by the same catalog
//!
//! ## Quick Start
//!
//! ```rust
//! use dynamo_index_schema::{generate_attribute_set, generate_index_catalog};
//!
//! let attributes = generate_attribute_set(2)?;
//! assert!(attributes.contains("gsi2pk"));
//!
//! let catalog = generate_index_catalog(2)?;
//! assert_eq!(catalog.len(), 3);
//! assert_eq!(catalog.gsi(1).unwrap().sort_key_attribute, "gsi1sk");
//!
//! // Negative or fractional counts are rejected up front
//! assert!(generate_index_catalog(-1).unwrap_err().is_invalid_argument());
//! assert!(generate_index_catalog(1.5).unwrap_err().is_invalid_argument());
//! # Ok::<(), dynamo_index_schema::Error>(())
//! ```
//!
//! Creating the table from the same catalog:
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), dynamo_index_schema::Error> {
//! let catalog = dynamo_index_schema::generate_index_catalog(2)?;
//! dynamo_index_schema::setup::create_table("app", &catalog).await?;
//! # Ok(())
//! # }
//! ```
#![deny(
    warnings,
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    deprecated,
    unknown_lints,
    unreachable_code,
    unused_mut
)]

mod error;
pub use error::Error;

/// Key schema generators
pub mod schema;

/// Configuration surface
pub mod config;

/// Deployment stages and removal policies
pub mod stage;

/// Table options for the provisioning layer
pub mod options;

/// Table creation from an index catalog
pub mod setup;

pub mod keys;

// Re-export main types for convenience
pub use config::SchemaConfig;
pub use options::TableOptions;
pub use schema::{
    AttributeSet, GsiCount, IndexCatalog, IndexId, IndexKeyPair, IndexSchema, KeyFieldNames,
    SchemaVersion, generate_attribute_set, generate_index_catalog, generate_key_field_names,
};
pub use stage::RemovalPolicy;

// Re-export aws-config types for configuration
pub use aws_config::{BehaviorVersion, Region, SdkConfig};

use aws_sdk_dynamodb::Client as DynamoDbClient;
use tokio::sync::OnceCell;

/// Global DynamoDB client instance
static GLOBAL_CLIENT: OnceCell<DynamoDbClient> = OnceCell::const_new();

/// Default AWS configuration for the global client
///
/// - Adaptive retry mode with 3 max attempts
/// - Exponential backoff starting at 1 second
/// - Connect timeout: 3 seconds
/// - Read timeout: 20 seconds
/// - Operation timeout: 60 seconds
/// - LocalStack support via AWS_PROFILE=localstack
async fn aws_config_defaults() -> SdkConfig {
    use aws_types::sdk_config::{RetryConfig, TimeoutConfig};
    use std::time::Duration;

    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(3))
        .read_timeout(Duration::from_secs(20))
        .operation_timeout(Duration::from_secs(60))
        .build();

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .retry_config(
            RetryConfig::adaptive()
                .with_max_attempts(3)
                .with_initial_backoff(Duration::from_secs(1)),
        )
        .timeout_config(timeout_config);

    if std::env::var("AWS_PROFILE").unwrap_or_default() == "localstack" {
        tracing::debug!("using LocalStack endpoint");
        loader = loader.endpoint_url("http://127.0.0.1:4566");
    }

    loader.load().await
}

/// Initialize the global DynamoDB client with a custom AWS config
///
/// Has no effect if the client was already initialized.
pub async fn init(config: &SdkConfig) {
    let _ = GLOBAL_CLIENT
        .get_or_init(|| async { DynamoDbClient::new(config) })
        .await;
}

/// Initialize the global DynamoDB client with a custom client instance
pub async fn init_with_client(client: DynamoDbClient) {
    let _ = GLOBAL_CLIENT.get_or_init(|| async { client }).await;
}

/// Get a reference to the global DynamoDB client
///
/// Automatically initializes the client with sensible defaults (adaptive retries,
/// timeouts, LocalStack support) if neither [`init`] nor [`init_with_client`] ran first.
pub async fn dynamodb_client() -> &'static DynamoDbClient {
    GLOBAL_CLIENT
        .get_or_init(|| async {
            let config = aws_config_defaults().await;
            DynamoDbClient::new(&config)
        })
        .await
}
