use sidx::{IndexWrite, prelude::*};
use std::{sync::Arc, thread};

fn table() -> TableModel {
    TableModel::try_new(
        "ORDERS",
        vec![
            ColumnModel::new("ID", LogicalType::BigInt).not_null(),
            ColumnModel::new("CUSTOMER", LogicalType::Varchar).not_null(),
            ColumnModel::new("PLACED", LogicalType::Timestamp),
            ColumnModel::new("TOTAL", LogicalType::Decimal),
        ],
        &[("ID", SortOrder::Asc)],
    )
    .expect("table should build")
}

fn registry(table: &TableModel) -> MaintainerRegistry {
    MaintainerRegistry::from_model(
        table,
        &[
            IndexModel::new("ORDERS_BY_CUSTOMER")
                .column("CUSTOMER", SortOrder::Asc)
                .column("PLACED", SortOrder::Desc)
                .include("TOTAL"),
            IndexModel::new("ORDERS_BY_TOTAL")
                .column("TOTAL", SortOrder::Desc)
                .salted(8),
        ],
    )
    .expect("registry should build")
}

const fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn registries_are_shareable_across_threads() {
    assert_send_sync::<MaintainerRegistry>();
    assert_send_sync::<IndexMaintainer>();

    let table = table();
    let registry = Arc::new(registry(&table));
    let (data_row_key, values) = table
        .encode_row(&[
            Value::Int(1),
            Value::from("acme"),
            Value::Timestamp(1_700_000_000_000_000_000),
            Value::Decimal(Decimal::new(1999, 2)),
        ])
        .expect("row should encode");

    let expected = registry
        .plan_mutations(&data_row_key, None, Some(&values))
        .expect("plan should succeed");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let data_row_key = data_row_key.clone();
            let values = values.clone();
            thread::spawn(move || {
                registry
                    .plan_mutations(&data_row_key, None, Some(&values))
                    .expect("plan should succeed")
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread should finish"), expected);
    }
}

#[test]
fn decoded_registry_plans_the_same_writes() {
    let table = table();
    let registry = registry(&table);
    let decoded = MaintainerRegistry::from_bytes(&registry.to_bytes().expect("encode"))
        .expect("decode");
    let (data_row_key, old) = table
        .encode_row(&[Value::Int(7), Value::from("acme"), Value::Timestamp(10)])
        .expect("old row");
    let (_, new) = table
        .encode_row(&[
            Value::Int(7),
            Value::from("acme"),
            Value::Timestamp(10),
            Value::Decimal(Decimal::new(5, 0)),
        ])
        .expect("new row");

    let writes = decoded
        .plan_mutations(&data_row_key, Some(&old), Some(&new))
        .expect("plan should succeed");

    assert_eq!(
        writes,
        registry
            .plan_mutations(&data_row_key, Some(&old), Some(&new))
            .expect("plan should succeed")
    );

    // Same customer key: one in-place put. New total: delete of the null-total
    // row plus a put.
    let per_index: Vec<(&str, bool)> = writes
        .iter()
        .map(|IndexWrite { index_table, mutation }| (index_table.as_str(), mutation.is_delete()))
        .collect();
    assert_eq!(
        per_index,
        vec![
            ("ORDERS_BY_CUSTOMER", false),
            ("ORDERS_BY_TOTAL", true),
            ("ORDERS_BY_TOTAL", false),
        ]
    );
}

#[test]
fn toml_config_flows_into_registry_limits() {
    let table = table();
    let config = IndexConfig::from_toml_str("max_key_bytes = 12\n").expect("config should parse");
    let registry = registry(&table)
        .with_config(config)
        .expect("config should apply");
    let (data_row_key, values) = table
        .encode_row(&[Value::Int(1), Value::from("a customer with a long name")])
        .expect("row should encode");

    let err = registry
        .plan_mutations(&data_row_key, None, Some(&values))
        .expect_err("customer key is too long");
    assert_eq!(err.class, sidx::ErrorClass::Unsupported);
}

#[test]
fn metrics_count_planned_writes_per_index() {
    metrics_reset_all();
    let table = table();
    let registry = registry(&table);
    let (data_row_key, values) = table
        .encode_row(&[Value::Int(3), Value::from("acme")])
        .expect("row should encode");

    registry
        .plan_mutations(&data_row_key, None, Some(&values))
        .expect("plan should succeed");
    registry
        .plan_mutations(&data_row_key, Some(&values), None)
        .expect("plan should succeed");

    let report = metrics_report();
    assert_eq!(report.ops.index_puts, 2);
    assert_eq!(report.ops.index_deletes, 2);
    assert_eq!(report.indexes.len(), 2);
    assert!(report.indexes.iter().all(|i| i.row_keys_built == 2));
}
