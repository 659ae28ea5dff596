use crate::core::{
    record::Record,
    value::{Value, canonical_eq, cmp_values},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// FilterExpr
///
/// Serialized, planner-agnostic predicate language.
///
/// This is the `match` half of a population plan: the engine never evaluates
/// it against its own state, it hands it to the document source ANDed with
/// the key clause. The reference evaluation below defines the semantics a
/// source must honor and powers in-memory sources.
///
/// No planner hints, no overloaded operators.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum FilterExpr {
    /// Always true.
    True,
    /// Always false.
    False,

    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),

    // ─────────────────────────────────────────────────────────────
    // Scalar comparisons
    // ─────────────────────────────────────────────────────────────
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    Lt { field: String, value: Value },
    Lte { field: String, value: Value },
    Gt { field: String, value: Value },
    Gte { field: String, value: Value },

    In { field: String, values: Vec<Value> },
    NotIn { field: String, values: Vec<Value> },

    // ─────────────────────────────────────────────────────────────
    // Collection predicates
    // ─────────────────────────────────────────────────────────────
    /// Collection contains value.
    Contains { field: String, value: Value },

    // ─────────────────────────────────────────────────────────────
    // Presence / nullability
    // ─────────────────────────────────────────────────────────────
    /// Field is present and explicitly null.
    IsNull { field: String },

    /// Field is present and not null.
    IsNotNull { field: String },

    /// Field is not present at all.
    IsMissing { field: String },
}

impl FilterExpr {
    // ─────────────────────────────────────────────────────────────
    // Boolean
    // ─────────────────────────────────────────────────────────────

    #[must_use]
    pub const fn and(exprs: Vec<Self>) -> Self {
        Self::And(exprs)
    }

    #[must_use]
    pub const fn or(exprs: Vec<Self>) -> Self {
        Self::Or(exprs)
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Self) -> Self {
        Self::Not(Box::new(expr))
    }

    // ─────────────────────────────────────────────────────────────
    // Scalar comparisons
    // ─────────────────────────────────────────────────────────────

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn in_list(
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_in(
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        Self::NotIn {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Collection
    // ─────────────────────────────────────────────────────────────

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Presence / nullability
    // ─────────────────────────────────────────────────────────────

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::IsNull {
            field: field.into(),
        }
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::IsNotNull {
            field: field.into(),
        }
    }

    pub fn is_missing(field: impl Into<String>) -> Self {
        Self::IsMissing {
            field: field.into(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Evaluation
    // ─────────────────────────────────────────────────────────────

    /// Reference evaluation against one record.
    ///
    /// Missing fields evaluate as `Null` for comparisons; ordering
    /// comparisons across incomparable variants are false.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::True => true,
            Self::False => false,

            Self::And(xs) => xs.iter().all(|x| x.matches(record)),
            Self::Or(xs) => xs.iter().any(|x| x.matches(record)),
            Self::Not(x) => !x.matches(record),

            Self::Eq { field, value } => canonical_eq(field_value(record, field), value),
            Self::Ne { field, value } => !canonical_eq(field_value(record, field), value),

            Self::Lt { field, value } => ordered(record, field, value, Ordering::is_lt),
            Self::Lte { field, value } => ordered(record, field, value, Ordering::is_le),
            Self::Gt { field, value } => ordered(record, field, value, Ordering::is_gt),
            Self::Gte { field, value } => ordered(record, field, value, Ordering::is_ge),

            Self::In { field, values } => {
                let actual = field_value(record, field);
                values.iter().any(|value| canonical_eq(actual, value))
            }
            Self::NotIn { field, values } => {
                let actual = field_value(record, field);
                !values.iter().any(|value| canonical_eq(actual, value))
            }

            Self::Contains { field, value } => field_value(record, field)
                .as_list()
                .is_some_and(|items| items.iter().any(|item| canonical_eq(item, value))),

            Self::IsNull { field } => {
                matches!(record.get_path(field), Some(Value::Null))
            }
            Self::IsNotNull { field } => {
                record.get_path(field).is_some_and(|value| !value.is_null())
            }
            Self::IsMissing { field } => record.get_path(field).is_none(),
        }
    }
}

fn field_value<'a>(record: &'a Record, field: &str) -> &'a Value {
    record.get_path(field).unwrap_or(&Value::Null)
}

fn ordered(record: &Record, field: &str, value: &Value, pick: impl Fn(Ordering) -> bool) -> bool {
    cmp_values(field_value(record, field), value).is_some_and(pick)
}

///
/// SortExpr
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SortExpr {
    pub fields: Vec<(String, OrderDirection)>,
}

impl SortExpr {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), OrderDirection::Asc)],
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), OrderDirection::Desc)],
        }
    }

    #[must_use]
    pub fn then(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.fields.push((field.into(), direction));
        self
    }

    /// Reference ordering for two records. Incomparable values tie.
    #[must_use]
    pub fn cmp_records(&self, left: &Record, right: &Record) -> Ordering {
        for (field, direction) in &self.fields {
            let a = left.get_path(field).unwrap_or(&Value::Null);
            let b = right.get_path(field).unwrap_or(&Value::Null);

            let cmp = cmp_values(a, b).unwrap_or(Ordering::Equal);
            let cmp = match direction {
                OrderDirection::Asc => cmp,
                OrderDirection::Desc => cmp.reverse(),
            };

            if cmp != Ordering::Equal {
                return cmp;
            }
        }

        Ordering::Equal
    }
}

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

///
/// Projection
///
/// The `select` half of a population plan, applied store-side.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Projection {
    /// Keep only the listed top-level fields.
    Include(Vec<String>),
    /// Drop the listed top-level fields.
    Exclude(Vec<String>),
}

impl Projection {
    pub fn include(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Include(fields.into_iter().map(Into::into).collect())
    }

    pub fn exclude(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Exclude(fields.into_iter().map(Into::into).collect())
    }

    /// Reference application to one record.
    #[must_use]
    pub fn apply(&self, record: &Record) -> Record {
        match self {
            Self::Include(keep) => Record::from_fields(
                record
                    .iter()
                    .filter(|(name, _)| keep.iter().any(|k| k == name))
                    .map(|(name, value)| (name.to_string(), value.clone())),
            ),
            Self::Exclude(drop) => Record::from_fields(
                record
                    .iter()
                    .filter(|(name, _)| !drop.iter().any(|k| k == name))
                    .map(|(name, value)| (name.to_string(), value.clone())),
            ),
        }
    }

    /// Extend an include list with fields the engine cannot work without
    /// (join keys, discriminator keys). Exclusions are left alone unless they
    /// name a required field.
    #[must_use]
    pub(crate) fn with_required(&self, required: &[&str]) -> Self {
        match self {
            Self::Include(keep) => {
                let mut keep = keep.clone();
                for field in required {
                    if !keep.iter().any(|k| k == field) {
                        keep.push((*field).to_string());
                    }
                }
                Self::Include(keep)
            }
            Self::Exclude(drop) => Self::Exclude(
                drop.iter()
                    .filter(|name| !required.iter().any(|field| field == &name.as_str()))
                    .cloned()
                    .collect(),
            ),
        }
    }
}
