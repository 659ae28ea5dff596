use crate::{key::CanonicalKey, value::Value};

///
/// FieldModel
/// Runtime field metadata used by descriptor resolution and hydration.
///

#[derive(Clone, Debug)]
pub struct FieldModel {
    name: String,
    kind: FieldKind,
}

impl FieldModel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

///
/// FieldKind
///
/// Minimal type surface needed by the resolver and hydrator.
/// Aligned with `Value` variants; reference declarations live here so the
/// descriptor walk never sniffs at runtime values.
///

#[derive(Clone, Debug)]
pub enum FieldKind {
    // Scalar primitives
    Bool,
    Int,
    Uint,
    Float64,
    Text,
    Bytes,
    Ulid,

    // Collections
    List(Box<Self>),
    Record(Vec<FieldModel>),

    /// Reference to a statically-named target type.
    Ref { target: String },
    /// Reference whose target type is read per-document from another field.
    RefVia { type_field: String },

    /// Unvalidated passthrough.
    Any,
}

impl FieldKind {
    /// Shorthand for a static reference field.
    #[must_use]
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Ref {
            target: target.into(),
        }
    }

    /// Shorthand for a dynamically-targeted reference field.
    #[must_use]
    pub fn reference_via(type_field: impl Into<String>) -> Self {
        Self::RefVia {
            type_field: type_field.into(),
        }
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Ref { .. } | Self::RefVia { .. })
    }

    /// Whether `value` satisfies this kind. `Null` satisfies every kind;
    /// numeric kinds accept any numeric representation, since stores differ
    /// on signedness; grafted documents satisfy reference kinds.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }

        match self {
            Self::Any => true,
            Self::Bool => matches!(value, Value::Bool(_)),
            Self::Int | Self::Uint | Self::Float64 => {
                matches!(value, Value::Int(_) | Value::Uint(_) | Value::Float64(_))
            }
            Self::Text => matches!(value, Value::Text(_)),
            Self::Bytes => matches!(value, Value::Bytes(_)),
            Self::Ulid => matches!(value, Value::Ulid(_)),
            Self::List(inner) => value
                .as_list()
                .is_some_and(|items| items.iter().all(|item| inner.matches(item))),
            Self::Record(fields) => value
                .as_record()
                .is_some_and(|record| record_matches(fields, record)),
            Self::Ref { .. } | Self::RefVia { .. } => {
                matches!(value, Value::Doc(_)) || CanonicalKey::from_value(value).is_some()
            }
        }
    }

    /// Stable label for diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float64 => "float64",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Ulid => "ulid",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Ref { .. } => "ref",
            Self::RefVia { .. } => "ref-via",
            Self::Any => "any",
        }
    }
}

pub(crate) fn record_matches(fields: &[FieldModel], record: &crate::record::Record) -> bool {
    fields.iter().all(|field| {
        record
            .get(field.name())
            .is_none_or(|value| field.kind().matches(value))
    })
}

/// Stable label for a value's shape, used in hydration diagnostics.
#[must_use]
pub(crate) const fn value_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Uint(_) => "uint",
        Value::Float64(_) => "float64",
        Value::Text(_) => "text",
        Value::Bytes(_) => "bytes",
        Value::Ulid(_) => "ulid",
        Value::List(_) => "list",
        Value::Record(_) => "record",
        Value::Doc(_) => "doc",
    }
}
