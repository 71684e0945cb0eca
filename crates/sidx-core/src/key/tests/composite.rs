use crate::{
    key::{KeyField, KeySchema},
    types::{LogicalType, SortOrder},
    value::Value,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::cmp::Ordering;

fn order_strategy() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]
}

fn text_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        6 => "[\\x00-\\x02a-c]{0,4}".prop_map(Value::Text),
    ]
}

fn int_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        6 => (-3i64..=3).prop_map(Value::Int),
    ]
}

fn decimal_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        6 => (-300i64..=300, 0u32..=2).prop_map(|(m, s)| Value::Decimal(Decimal::new(m, s))),
    ]
}

// Compare two tuples under the declared per-field orders, nulls first.
fn compare_tuples(fields: &[KeyField], lhs: &[Value], rhs: &[Value]) -> Ordering {
    for ((field, l), r) in fields.iter().zip(lhs).zip(rhs) {
        let natural = match (l, r) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Text(a), Value::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            _ => unreachable!("strategies keep column kinds aligned"),
        };
        let ordered = if field.order.is_desc() {
            natural.reverse()
        } else {
            natural
        };
        if ordered != Ordering::Equal {
            return ordered;
        }
    }

    Ordering::Equal
}

fn mixed_schema(orders: [SortOrder; 3]) -> KeySchema {
    KeySchema::new(vec![
        KeyField::nullable(LogicalType::Varchar).with_order(orders[0]),
        KeyField::nullable(LogicalType::Integer).with_order(orders[1]),
        KeyField::nullable(LogicalType::Decimal).with_order(orders[2]),
    ])
}

fn tuple_strategy() -> impl Strategy<Value = Vec<Value>> {
    (text_strategy(), int_strategy(), decimal_strategy()).prop_map(|(a, b, c)| vec![a, b, c])
}

#[test]
fn descending_fixed_field_reverses_row_order() {
    let schema = KeySchema::new(vec![
        KeyField::required(LogicalType::Integer).with_order(SortOrder::Desc),
        KeyField::nullable(LogicalType::Varchar),
    ]);

    let one = schema
        .build_key(&[Value::Int(1), Value::from("a")])
        .expect("key should build");
    let two = schema
        .build_key(&[Value::Int(2), Value::from("a")])
        .expect("key should build");

    assert!(two < one);
}

#[test]
fn separator_collisions_inside_values_stay_unambiguous() {
    let schema = KeySchema::new(vec![
        KeyField::required(LogicalType::VarBinary),
        KeyField::required(LogicalType::VarBinary),
    ]);
    let left = vec![Value::Bytes(vec![0x00]), Value::Bytes(vec![0x00, 0x01])];
    let right = vec![Value::Bytes(vec![0x00, 0x00]), Value::Bytes(vec![0x01])];

    let left_bytes = schema.build_key(&left).expect("left should build");
    let right_bytes = schema.build_key(&right).expect("right should build");

    assert_ne!(left_bytes, right_bytes);
    assert_eq!(schema.parse_key(&left_bytes).expect("left parse"), left);
    assert_eq!(schema.parse_key(&right_bytes).expect("right parse"), right);
    assert!(left_bytes < right_bytes);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1024))]

    #[test]
    fn composite_parse_reverses_build(
        orders in proptest::array::uniform3(order_strategy()),
        tuple in tuple_strategy(),
    ) {
        let schema = mixed_schema(orders);
        let bytes = schema.build_key(&tuple).expect("tuple should build");

        prop_assert_eq!(schema.parse_key(&bytes).expect("key should parse"), tuple);
    }

    #[test]
    fn composite_order_matches_declared_tuple_order(
        orders in proptest::array::uniform3(order_strategy()),
        lhs in tuple_strategy(),
        rhs in tuple_strategy(),
    ) {
        let schema = mixed_schema(orders);
        let lhs_bytes = schema.build_key(&lhs).expect("lhs should build");
        let rhs_bytes = schema.build_key(&rhs).expect("rhs should build");

        prop_assert_eq!(
            compare_tuples(schema.fields(), &lhs, &rhs),
            lhs_bytes.cmp(&rhs_bytes)
        );
    }

    #[test]
    fn trailing_variable_field_order_holds_in_both_directions(
        order in order_strategy(),
        lhs in text_strategy(),
        rhs in text_strategy(),
    ) {
        let schema = KeySchema::new(vec![
            KeyField::required(LogicalType::Integer),
            KeyField::nullable(LogicalType::Varchar).with_order(order),
        ]);
        let lhs_tuple = vec![Value::Int(5), lhs];
        let rhs_tuple = vec![Value::Int(5), rhs];
        let lhs_bytes = schema.build_key(&lhs_tuple).expect("lhs should build");
        let rhs_bytes = schema.build_key(&rhs_tuple).expect("rhs should build");

        prop_assert_eq!(
            compare_tuples(schema.fields(), &lhs_tuple, &rhs_tuple),
            lhs_bytes.cmp(&rhs_bytes)
        );
        prop_assert_eq!(schema.parse_key(&lhs_bytes).expect("parse"), lhs_tuple);
    }
}
