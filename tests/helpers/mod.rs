/// Test helpers shared by the integration tests
///
/// Provides the expected naming convention independently of the library so
/// generated schemas can be checked against it, plus an offline client.
#[allow(unused_imports)]
pub use dynamo_index_schema::{
    AttributeSet, Error, GsiCount, IndexCatalog, IndexId, IndexKeyPair, SchemaConfig,
    SchemaVersion, TableOptions, generate_attribute_set, generate_index_catalog,
    generate_key_field_names,
};

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{BehaviorVersion, Region};

/// Attribute names a table with `n` secondary indexes must declare, in order
#[allow(dead_code)]
pub fn expected_attribute_names(n: u32) -> Vec<String> {
    let mut names = vec!["pk".to_string(), "sk".to_string()];
    for i in 1..=n {
        names.push(format!("gsi{i}pk"));
        names.push(format!("gsi{i}sk"));
    }
    names
}

/// Index names a table with `n` secondary indexes must expose, in order
#[allow(dead_code)]
pub fn expected_index_ids(n: u32) -> Vec<String> {
    std::iter::once("defaultIndex".to_string())
        .chain((1..=n).map(|i| format!("gsi{i}")))
        .collect()
}

/// A client that is never sent a request
///
/// Lets tests inspect request builders without AWS credentials or LocalStack.
#[allow(dead_code)]
pub fn offline_client() -> Client {
    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .build();
    Client::from_conf(config)
}
