/// LocalStack Table Creation Tests
///
/// Creates tables through the global client. Needs a running LocalStack and
/// `AWS_PROFILE=localstack`, so these are ignored by default:
/// `cargo test --test localstack_tests -- --ignored`
mod helpers;
use dynamo_index_schema::setup::create_table;
use helpers::*;

/// Drop a table left over from an earlier run
async fn drop_table(table_name: &str) {
    let client = dynamo_index_schema::dynamodb_client().await;
    let _ = client.delete_table().table_name(table_name).send().await;
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}

/// A table without secondary indexes is created with only the default pair
#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_create_table_without_secondary_indexes() {
    let table_name = "tests_schema_no_gsi";
    drop_table(table_name).await;

    let catalog = generate_index_catalog(0).unwrap();
    let output = create_table(table_name, &catalog).await.unwrap();
    let description = output.table_description().unwrap();

    assert_eq!(description.table_name(), Some(table_name));
    assert_eq!(description.attribute_definitions().len(), 2);
    assert!(description.global_secondary_indexes().is_empty());
}

/// Creating the same table twice succeeds and keeps the first definition
#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_create_table_twice() {
    let table_name = "tests_schema_two_gsi";
    drop_table(table_name).await;

    let catalog = generate_index_catalog(2).unwrap();
    let output = create_table(table_name, &catalog).await.unwrap();
    let mut names: Vec<&str> = output
        .table_description()
        .unwrap()
        .global_secondary_indexes()
        .iter()
        .filter_map(|gsi| gsi.index_name())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["gsi1", "gsi2"]);

    let again = create_table(table_name, &catalog).await.unwrap();
    assert!(again.table_description().is_none());
}
