use crate::{key::CanonicalKey, record::Record, value::Value};
use std::cmp::Ordering;

/// Stable canonical rank used by all cross-variant ordering surfaces.
pub(crate) const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) => 2,
        Value::Uint(_) => 3,
        Value::Float64(_) => 4,
        Value::Text(_) => 5,
        Value::Bytes(_) => 6,
        Value::Ulid(_) => 7,
        Value::List(_) => 8,
        Value::Record(_) => 9,
        Value::Doc(_) => 10,
    }
}

/// Total canonical comparator.
///
/// Ordering rules:
/// 1. Canonical variant rank
/// 2. Variant-specific comparison for same-ranked values
///
/// Mixed-variant comparisons are rank-only and must remain deterministic.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = left.canonical_rank().cmp(&right.canonical_rank());
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

/// Store-equality check: two values are equal when the store would treat
/// them as the same reference key, falling back to canonical comparison for
/// non-keyable values.
#[must_use]
pub fn canonical_eq(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (CanonicalKey::from_value(left), CanonicalKey::from_value(right)) {
        return a == b;
    }

    canonical_cmp(left, right) == Ordering::Equal
}

/// Ordering comparator for predicate/sort evaluation.
///
/// Same-variant values compare naturally; mixed numeric variants compare
/// through a lossless widening; everything else is unordered.
#[must_use]
pub fn cmp_values(left: &Value, right: &Value) -> Option<Ordering> {
    if canonical_rank(left) == canonical_rank(right) {
        return Some(canonical_cmp_same_rank(left, right));
    }

    cmp_numeric(left, right)
}

/// Strict comparator for identical orderable variants.
///
/// Returns `None` for mismatched or non-orderable variants.
#[must_use]
pub(crate) fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Float64(a), Value::Float64(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
        (Value::Ulid(a), Value::Ulid(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
        (Value::Float64(a), Value::Float64(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        (Value::Ulid(a), Value::Ulid(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => canonical_cmp_value_list(a, b),
        (Value::Record(a), Value::Record(b)) => canonical_cmp_record(a, b),
        (Value::Doc(a), Value::Doc(b)) => {
            let cmp = a.type_name().cmp(b.type_name());
            if cmp != Ordering::Equal {
                return cmp;
            }
            canonical_cmp_record(a.fields(), b.fields())
        }
        _ => Ordering::Equal,
    }
}

fn canonical_cmp_value_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

fn canonical_cmp_record(left: &Record, right: &Record) -> Ordering {
    for ((left_name, left_value), (right_name, right_value)) in left.iter().zip(right.iter()) {
        let name_cmp = left_name.cmp(right_name);
        if name_cmp != Ordering::Equal {
            return name_cmp;
        }

        let value_cmp = canonical_cmp(left_value, right_value);
        if value_cmp != Ordering::Equal {
            return value_cmp;
        }
    }

    left.len().cmp(&right.len())
}

// Cross-variant numeric comparison through a lossless widening.
fn cmp_numeric(left: &Value, right: &Value) -> Option<Ordering> {
    let a = numeric_repr(left)?;
    let b = numeric_repr(right)?;

    Some(match (a, b) {
        (NumericRepr::Int(a), NumericRepr::Int(b)) => a.cmp(&b),
        (NumericRepr::Int(a), NumericRepr::F64(b)) => cmp_i128_f64(a, b),
        (NumericRepr::F64(a), NumericRepr::Int(b)) => cmp_i128_f64(b, a).reverse(),
        (NumericRepr::F64(a), NumericRepr::F64(b)) => a.partial_cmp(&b)?,
    })
}

enum NumericRepr {
    Int(i128),
    F64(f64),
}

const fn numeric_repr(value: &Value) -> Option<NumericRepr> {
    match value {
        Value::Int(i) => Some(NumericRepr::Int(*i as i128)),
        Value::Uint(u) => Some(NumericRepr::Int(*u as i128)),
        Value::Float64(f) => Some(NumericRepr::F64(f.get())),
        _ => None,
    }
}

#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn cmp_i128_f64(int: i128, float: f64) -> Ordering {
    // i64/u64 payloads widen losslessly into i128; the float side is finite.
    let truncated = float.trunc();
    if (truncated as i128) == int && float.fract() == 0.0 {
        return Ordering::Equal;
    }

    (int as f64).partial_cmp(&float).unwrap_or(Ordering::Equal)
}
