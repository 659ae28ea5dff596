use crate::{
    key::CanonicalKey,
    types::{Float64, Ulid},
    value::Value,
};
use proptest::prelude::*;

#[test]
fn non_negative_int_and_uint_collapse() {
    let from_int = CanonicalKey::from_value(&Value::Int(10)).expect("int canonicalizes");
    let from_uint = CanonicalKey::from_value(&Value::Uint(10)).expect("uint canonicalizes");
    assert_eq!(from_int, from_uint);
    assert_eq!(from_int, CanonicalKey::Uint(10));
}

#[test]
fn integral_float_collapses_into_uint() {
    let float = Value::float(10.0).expect("finite");
    let key = CanonicalKey::from_value(&float).expect("float canonicalizes");
    assert_eq!(key, CanonicalKey::Uint(10));
}

#[test]
fn negative_integral_float_collapses_into_int() {
    let float = Value::float(-3.0).expect("finite");
    let key = CanonicalKey::from_value(&float).expect("float canonicalizes");
    assert_eq!(key, CanonicalKey::Int(-3));
}

#[test]
fn fractional_float_keeps_float_form() {
    let float = Value::float(2.5).expect("finite");
    let key = CanonicalKey::from_value(&float).expect("float canonicalizes");
    assert_eq!(key, CanonicalKey::Float(Float64::try_new(2.5).unwrap()));
}

#[test]
fn non_keyable_values_yield_none() {
    for value in [
        Value::Null,
        Value::Bool(true),
        Value::List(vec![Value::Uint(1)]),
    ] {
        assert!(CanonicalKey::from_value(&value).is_none(), "{value:?}");
    }
}

#[test]
fn text_bytes_and_identifier_keys_stay_disjoint() {
    let text = CanonicalKey::from("01ARZ3");
    let bytes = CanonicalKey::Bytes(b"01ARZ3".to_vec());
    let id = CanonicalKey::from(Ulid::from_u128(42));
    assert_ne!(text, bytes);
    assert_ne!(text, id);
    assert_ne!(bytes, id);
}

#[test]
fn to_value_round_trips_through_from_value() {
    let keys = [
        CanonicalKey::Int(-5),
        CanonicalKey::Uint(7),
        CanonicalKey::Text("abc".to_string()),
        CanonicalKey::Bytes(vec![0, 1, 2]),
        CanonicalKey::Ulid(Ulid::from_u128(9)),
    ];
    for key in keys {
        let back = CanonicalKey::from_value(&key.to_value()).expect("raw form canonicalizes");
        assert_eq!(back, key);
    }
}

proptest! {
    #[test]
    fn int_encoding_preserves_order(a in i64::MIN..0, b in i64::MIN..0) {
        let ka = CanonicalKey::from(a);
        let kb = CanonicalKey::from(b);
        prop_assert_eq!(ka.to_bytes().cmp(&kb.to_bytes()), a.cmp(&b));
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }

    #[test]
    fn uint_encoding_preserves_order(a in any::<u64>(), b in any::<u64>()) {
        let ka = CanonicalKey::from(a);
        let kb = CanonicalKey::from(b);
        prop_assert_eq!(ka.to_bytes().cmp(&kb.to_bytes()), a.cmp(&b));
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }

    #[test]
    fn mixed_int_representations_agree(n in 0i64..) {
        #[expect(clippy::cast_sign_loss)]
        let as_uint = CanonicalKey::from(n as u64);
        let as_int = CanonicalKey::from(n);
        prop_assert_eq!(as_int, as_uint);
    }

    #[test]
    fn encoding_equality_matches_key_equality(a in any::<u64>(), b in any::<i64>()) {
        let ka = CanonicalKey::from(a);
        let kb = CanonicalKey::from(b);
        prop_assert_eq!(ka.to_bytes() == kb.to_bytes(), ka == kb);
    }
}
