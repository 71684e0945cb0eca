//! Index row keys built by a maintainer must equal the row key the index
//! table would get if the same tuple were written to it directly.

use sidx::{
    core::key::{KeyField, KeySchema},
    prelude::*,
};

fn table(name: &str, columns: Vec<ColumnModel>, pk: &[(&str, SortOrder)]) -> TableModel {
    TableModel::try_new(name, columns, pk).expect("table should build")
}

fn decimal(mantissa: i64, scale: u32) -> Value {
    Value::Decimal(Decimal::new(mantissa, scale))
}

// Build the index row key through a serialized maintainer and compare it with
// the independently encoded index tuple.
fn assert_index_row_key(
    table: &TableModel,
    index: &IndexModel,
    row: &[Value],
    index_fields: &[KeyField],
    index_tuple: &[Value],
) -> Vec<u8> {
    let built = IndexMaintainer::try_from_model(table, index).expect("maintainer should build");
    let bytes = IndexMaintainer::serialize(&[built]).expect("maintainers should serialize");
    let maintainers = IndexMaintainer::deserialize(&bytes).expect("maintainers should decode");
    assert_eq!(maintainers.len(), 1);
    let maintainer = &maintainers[0];

    let (data_row_key, values) = table.encode_row(row).expect("row should encode");
    let index_row_key = maintainer
        .build_row_key(&values, &data_row_key)
        .expect("index row key should build");

    let direct = KeySchema::new(index_fields.to_vec())
        .build_key(index_tuple)
        .expect("index tuple should encode");
    assert_eq!(index_row_key, direct);
    assert_eq!(
        maintainer
            .parse_row_key(&index_row_key)
            .expect("index row key should parse"),
        index_tuple
    );
    assert_eq!(
        maintainer
            .build_data_row_key(&index_row_key)
            .expect("data row key should be recoverable"),
        data_row_key
    );

    index_row_key
}

fn var_fixed_table(pk: &[(&str, SortOrder)]) -> TableModel {
    table(
        "RK_TEST",
        vec![
            ColumnModel::new("K1", LogicalType::Varchar),
            ColumnModel::new("K2", LogicalType::Integer).not_null(),
            ColumnModel::new("V", LogicalType::Varchar),
        ],
        pk,
    )
}

fn var_decimal_table() -> TableModel {
    table(
        "RK_TEST",
        vec![
            ColumnModel::new("K1", LogicalType::Varchar),
            ColumnModel::new("K2", LogicalType::Decimal).not_null(),
            ColumnModel::new("V", LogicalType::Varchar),
        ],
        &[("K1", SortOrder::Asc), ("K2", SortOrder::Desc)],
    )
}

#[test]
fn row_key_var_only_index() {
    let table = table(
        "RK_TEST",
        vec![
            ColumnModel::new("K1", LogicalType::Varchar),
            ColumnModel::new("K2", LogicalType::Decimal),
        ],
        &[("K1", SortOrder::Asc), ("K2", SortOrder::Asc)],
    );

    assert_index_row_key(
        &table,
        &IndexModel::new("IDX")
            .column("K2", SortOrder::Asc)
            .column("K1", SortOrder::Asc),
        &[Value::from("a"), decimal(11, 1)],
        &[
            KeyField::nullable(LogicalType::Decimal),
            KeyField::nullable(LogicalType::Varchar),
        ],
        &[decimal(11, 1), Value::from("a")],
    );
}

#[test]
fn composite_row_key_var_fixed_index() {
    let table = var_fixed_table(&[("K1", SortOrder::Asc), ("K2", SortOrder::Asc)]);

    let key = assert_index_row_key(
        &table,
        &IndexModel::new("IDX")
            .column("K2", SortOrder::Asc)
            .column("K1", SortOrder::Asc),
        &[Value::from("a"), Value::Int(1)],
        &[
            KeyField::required(LogicalType::Integer),
            KeyField::nullable(LogicalType::Varchar),
        ],
        &[Value::Int(1), Value::from("a")],
    );

    assert_eq!(key, vec![0x80, 0x00, 0x00, 0x01, b'a']);
}

#[test]
fn single_key_value_index() {
    let table = var_fixed_table(&[("K1", SortOrder::Asc)]);

    let key = assert_index_row_key(
        &table,
        &IndexModel::new("IDX").column("V", SortOrder::Asc),
        &[Value::from("a"), Value::Int(1), Value::from("b")],
        &[
            KeyField::nullable(LogicalType::Varchar),
            KeyField::nullable(LogicalType::Varchar),
        ],
        &[Value::from("b"), Value::from("a")],
    );

    assert_eq!(key, b"b\x00a".to_vec());
}

#[test]
fn multi_key_value_index() {
    let table = table(
        "RK_TEST",
        vec![
            ColumnModel::new("K1", LogicalType::Char(1)).not_null(),
            ColumnModel::new("K2", LogicalType::Integer).not_null(),
            ColumnModel::new("V1", LogicalType::Decimal),
            ColumnModel::new("V2", LogicalType::Char(2)),
            ColumnModel::new("V3", LogicalType::BigInt),
        ],
        &[("K1", SortOrder::Asc), ("K2", SortOrder::Asc)],
    );

    assert_index_row_key(
        &table,
        &IndexModel::new("IDX")
            .column("V2", SortOrder::Asc)
            .column("K2", SortOrder::Asc)
            .column("V1", SortOrder::Asc),
        &[Value::from("a"), Value::Int(1), decimal(22, 1), Value::from("bb")],
        &[
            KeyField::nullable(LogicalType::Char(2)),
            KeyField::required(LogicalType::Integer),
            KeyField::nullable(LogicalType::Decimal),
            KeyField::required(LogicalType::Char(1)),
        ],
        &[Value::from("bb"), Value::Int(1), decimal(22, 1), Value::from("a")],
    );
}

#[test]
fn single_key_value_desc_index() {
    let table = var_fixed_table(&[("K1", SortOrder::Asc)]);

    let key = assert_index_row_key(
        &table,
        &IndexModel::new("IDX").column("V", SortOrder::Desc),
        &[Value::from("a"), Value::Int(1), Value::from("b")],
        &[
            KeyField::nullable(LogicalType::Varchar).with_order(SortOrder::Desc),
            KeyField::nullable(LogicalType::Varchar),
        ],
        &[Value::from("b"), Value::from("a")],
    );

    assert_eq!(key, vec![!b'b', 0xFF, b'a']);
}

#[test]
fn composite_row_key_var_fixed_desc_index() {
    let table = var_fixed_table(&[("K1", SortOrder::Asc), ("K2", SortOrder::Asc)]);

    assert_index_row_key(
        &table,
        &IndexModel::new("IDX")
            .column("K2", SortOrder::Desc)
            .column("K1", SortOrder::Asc),
        &[Value::from("a"), Value::Int(1)],
        &[
            KeyField::required(LogicalType::Integer).with_order(SortOrder::Desc),
            KeyField::nullable(LogicalType::Varchar),
        ],
        &[Value::Int(1), Value::from("a")],
    );
}

#[test]
fn composite_desc_row_key_var_fixed_desc_index() {
    let table = var_fixed_table(&[("K1", SortOrder::Asc), ("K2", SortOrder::Desc)]);

    assert_index_row_key(
        &table,
        &IndexModel::new("IDX")
            .column("K2", SortOrder::Desc)
            .column("K1", SortOrder::Asc),
        &[Value::from("a"), Value::Int(1)],
        &[
            KeyField::required(LogicalType::Integer).with_order(SortOrder::Desc),
            KeyField::nullable(LogicalType::Varchar),
        ],
        &[Value::Int(1), Value::from("a")],
    );
}

#[test]
fn composite_desc_row_key_var_desc_index() {
    assert_index_row_key(
        &var_decimal_table(),
        &IndexModel::new("IDX")
            .column("K2", SortOrder::Desc)
            .column("K1", SortOrder::Asc),
        &[Value::from("a"), decimal(11, 1), Value::from("b")],
        &[
            KeyField::required(LogicalType::Decimal).with_order(SortOrder::Desc),
            KeyField::nullable(LogicalType::Varchar),
        ],
        &[decimal(11, 1), Value::from("a")],
    );
}

#[test]
fn composite_desc_row_key_var_asc_index() {
    assert_index_row_key(
        &var_decimal_table(),
        &IndexModel::new("IDX")
            .column("K2", SortOrder::Asc)
            .column("K1", SortOrder::Asc),
        &[Value::from("a"), decimal(11, 1), Value::from("b")],
        &[
            KeyField::required(LogicalType::Decimal),
            KeyField::nullable(LogicalType::Varchar),
        ],
        &[decimal(11, 1), Value::from("a")],
    );
}

#[test]
fn salted_index_key_matches_direct_tuple_after_salt_byte() {
    let table = var_fixed_table(&[("K1", SortOrder::Asc)]);
    let maintainer = IndexMaintainer::try_from_model(
        &table,
        &IndexModel::new("IDX").column("V", SortOrder::Asc).salted(16),
    )
    .expect("maintainer should build");
    let (data_row_key, values) = table
        .encode_row(&[Value::from("a"), Value::Int(1), Value::from("b")])
        .expect("row should encode");

    let key = maintainer
        .build_row_key(&values, &data_row_key)
        .expect("index row key should build");

    assert!(key[0] < 16);
    assert_eq!(&key[1..], b"b\x00a");
    assert_eq!(
        maintainer.build_data_row_key(&key).expect("data row key"),
        data_row_key
    );
}
