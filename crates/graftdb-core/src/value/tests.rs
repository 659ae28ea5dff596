use crate::{
    record,
    value::{Value, canonical_cmp, canonical_eq, cmp_values},
};
use std::cmp::Ordering;

#[test]
fn canonical_eq_collapses_numeric_representations() {
    assert!(canonical_eq(&Value::Int(5), &Value::Uint(5)));
    assert!(canonical_eq(&Value::Uint(5), &Value::float(5.0).unwrap()));
    assert!(!canonical_eq(&Value::Int(-5), &Value::Uint(5)));
}

#[test]
fn canonical_eq_falls_back_for_non_keyable_values() {
    let a = Value::List(vec![Value::Uint(1), Value::Text("x".into())]);
    let b = Value::List(vec![Value::Uint(1), Value::Text("x".into())]);
    assert!(canonical_eq(&a, &b));
    assert!(!canonical_eq(&a, &Value::List(vec![Value::Uint(1)])));
}

#[test]
fn cmp_values_orders_across_numeric_variants() {
    assert_eq!(
        cmp_values(&Value::Int(-1), &Value::Uint(2)),
        Some(Ordering::Less)
    );
    assert_eq!(
        cmp_values(&Value::float(1.5).unwrap(), &Value::Uint(1)),
        Some(Ordering::Greater)
    );
    assert_eq!(cmp_values(&Value::Uint(1), &Value::Text("a".into())), None);
}

#[test]
fn canonical_cmp_is_total_and_rank_ordered() {
    let mut values = vec![
        Value::Text("b".into()),
        Value::Null,
        Value::Uint(1),
        Value::Text("a".into()),
        Value::Bool(true),
    ];
    values.sort_by(canonical_cmp);

    assert_eq!(
        values,
        vec![
            Value::Null,
            Value::Bool(true),
            Value::Uint(1),
            Value::Text("a".into()),
            Value::Text("b".into()),
        ]
    );
}

#[test]
fn records_compare_field_by_field() {
    let a = Value::Record(record! { "x" => 1u64 });
    let b = Value::Record(record! { "x" => 2u64 });
    assert_eq!(canonical_cmp(&a, &b), Ordering::Less);
    assert_eq!(canonical_cmp(&a, &a.clone()), Ordering::Equal);
}

#[test]
fn option_conversion_maps_none_to_null() {
    assert_eq!(Value::from(None::<u64>), Value::Null);
    assert_eq!(Value::from(Some(3u64)), Value::Uint(3));
}

#[test]
fn value_trees_survive_serde_round_trips() {
    use crate::{document::Document, types::Ulid};

    let mut doc = Document::new("author", record! { "_id" => Ulid::from_u128(7) });
    doc.mark_populated("avatar");

    let value = Value::Record(record! {
        "id" => Ulid::from_u128(42),
        "payload" => vec![0u8, 1, 255],
        "score" => Value::float(1.5).unwrap(),
        "tags" => vec![Value::Text("a".into()), Value::Null],
        "author" => Value::from(doc),
    });

    let encoded = serde_json::to_string(&value).expect("value serializes");
    let decoded: Value = serde_json::from_str(&encoded).expect("value deserializes");
    assert_eq!(decoded, value);
}
