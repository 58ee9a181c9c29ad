/// Index Schema Generator Tests
///
/// Covers the attribute set and index catalog contracts across a range of
/// secondary index counts.
mod helpers;
use helpers::*;

const MAX_N: u32 = 25;

/// Attribute set has `2 + 2N` entries, all strings, named by convention
#[test]
fn test_attribute_set_size_and_names() {
    for n in 0..=MAX_N {
        let attributes = generate_attribute_set(n).unwrap();
        assert_eq!(attributes.len(), 2 + 2 * n as usize, "n = {n}");

        let names: Vec<String> = attributes.names().map(str::to_string).collect();
        assert_eq!(names, expected_attribute_names(n));

        for (_, attribute_type) in attributes.iter() {
            assert_eq!(serde_json::to_value(attribute_type).unwrap(), "string");
        }
    }
}

/// Catalog has `N + 1` entries with `gsi{i}` naming and no gaps
#[test]
fn test_index_catalog_size_and_names() {
    for n in 0..=MAX_N {
        let catalog = generate_index_catalog(n).unwrap();
        assert_eq!(catalog.len(), n as usize + 1, "n = {n}");

        let ids: Vec<String> = catalog.iter().map(|(id, _)| id.to_string()).collect();
        assert_eq!(ids, expected_index_ids(n));
    }
}

/// Every secondary entry names itself and references declared attributes
#[test]
fn test_catalog_entries_are_consistent_with_attribute_set() {
    for n in 0..=MAX_N {
        let catalog = generate_index_catalog(n).unwrap();
        let attributes = generate_attribute_set(n).unwrap();

        for i in 1..=n {
            let pair = catalog.get(IndexId::gsi(i).unwrap()).unwrap();
            assert_eq!(pair.index_name.as_deref(), Some(format!("gsi{i}").as_str()));
            assert_eq!(pair.partition_key_attribute, format!("gsi{i}pk"));
            assert_eq!(pair.sort_key_attribute, format!("gsi{i}sk"));
            assert!(attributes.contains(&pair.partition_key_attribute));
            assert!(attributes.contains(&pair.sort_key_attribute));
        }

        // and the other way round: nothing declared that no index uses
        let referenced = catalog.attribute_set();
        for name in attributes.names() {
            assert!(referenced.contains(name), "{name} is not referenced");
        }
        assert_eq!(referenced, attributes);
    }
}

/// Calling a generator twice yields equal values
#[test]
fn test_generators_are_idempotent() {
    for n in [0u32, 1, 7, 20] {
        assert_eq!(
            generate_attribute_set(n).unwrap(),
            generate_attribute_set(n).unwrap()
        );
        assert_eq!(
            generate_index_catalog(n).unwrap(),
            generate_index_catalog(n).unwrap()
        );
    }
}

/// N = 0 yields only the default pair
#[test]
fn test_zero_indexes() {
    let attributes = generate_attribute_set(0).unwrap();
    assert_eq!(
        serde_json::to_value(&attributes).unwrap(),
        serde_json::json!({ "pk": "string", "sk": "string" })
    );

    let catalog = generate_index_catalog(0).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.secondary_indexes().count(), 0);
    let default = catalog.default_index();
    assert_eq!(default.partition_key_attribute, "pk");
    assert_eq!(default.sort_key_attribute, "sk");
    assert_eq!(default.index_name, None);
}

/// Negative and fractional counts are rejected by both generators
#[test]
fn test_invalid_counts() {
    for n in [-1.0, 1.5, -0.5] {
        let err = generate_attribute_set(n).unwrap_err();
        assert!(err.is_invalid_argument(), "n = {n}");
        let err = generate_index_catalog(n).unwrap_err();
        assert!(err.is_invalid_argument(), "n = {n}");
    }
    for n in [-1i64, i64::MIN] {
        let err = generate_index_catalog(n).unwrap_err();
        assert!(err.is_invalid_argument(), "n = {n}");
    }

    // integral floats are fine
    assert_eq!(generate_index_catalog(2.0).unwrap().len(), 3);
}

/// Two secondary indexes, spelled out
#[test]
fn test_two_indexes_scenario() {
    let attributes = generate_attribute_set(2).unwrap();
    assert_eq!(
        serde_json::to_value(&attributes).unwrap(),
        serde_json::json!({
            "pk": "string",
            "sk": "string",
            "gsi1pk": "string",
            "gsi1sk": "string",
            "gsi2pk": "string",
            "gsi2sk": "string",
        })
    );

    let catalog = generate_index_catalog(2).unwrap();
    assert_eq!(
        serde_json::to_value(&catalog).unwrap(),
        serde_json::json!({
            "defaultIndex": { "partitionKey": "pk", "sortKey": "sk" },
            "gsi1": { "partitionKey": "gsi1pk", "sortKey": "gsi1sk", "indexName": "gsi1" },
            "gsi2": { "partitionKey": "gsi2pk", "sortKey": "gsi2sk", "indexName": "gsi2" },
        })
    );
}

/// Entity definitions read catalog entries by their symbolic names
#[test]
fn test_three_indexes_entity_keys() {
    let catalog = generate_index_catalog(3).unwrap();
    let expected: IndexKeyPair = serde_json::from_value(serde_json::json!({
        "partitionKey": "gsi3pk",
        "sortKey": "gsi3sk",
        "indexName": "gsi3",
    }))
    .unwrap();

    assert_eq!(catalog.get_by_name("gsi3"), Some(&expected));
    assert_eq!(catalog.get_by_name("gsi4"), None);
}

/// Key field vocabulary lookup
#[test]
fn test_key_field_names() {
    let v2 = generate_key_field_names("v2").unwrap();
    assert_eq!(
        serde_json::to_value(v2).unwrap(),
        serde_json::json!({ "partitionKeyField": "partitionKey", "sortKeyField": "sortKey" })
    );

    let v3 = generate_key_field_names("v3").unwrap();
    assert_eq!(
        serde_json::to_value(v3).unwrap(),
        serde_json::json!({ "partitionKeyField": "hashKey", "sortKeyField": "rangeKey" })
    );

    let err = generate_key_field_names("v4").unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(matches!(err, Error::InvalidArgument(_)));
}

/// Generators may run concurrently from many tasks
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generation() {
    let handles: Vec<_> = (0..16u32)
        .map(|n| {
            tokio::spawn(async move {
                (
                    n,
                    generate_attribute_set(n).unwrap(),
                    generate_index_catalog(n).unwrap(),
                )
            })
        })
        .collect();

    for handle in handles {
        let (n, attributes, catalog) = handle.await.unwrap();
        assert_eq!(attributes, generate_attribute_set(n).unwrap());
        assert_eq!(catalog, generate_index_catalog(n).unwrap());
        assert_eq!(catalog.gsi_count(), GsiCount::new(n));
    }
}
