mod compare;

#[cfg(test)]
mod tests;

use crate::{
    document::Document,
    record::Record,
    types::{Float64, Ulid},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub use compare::{canonical_cmp, canonical_eq, cmp_values};

///
/// Value
///
/// One document field value.
///
/// Null → the field is present and explicitly empty.
/// Doc  → the grafted, hydrated form a populated reference slot takes;
///        never produced by a store, only by reassembly.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float64(Float64),
    Text(String),
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
    Ulid(Ulid),
    /// Ordered list of values. List order is preserved end to end; the
    /// reassembler relies on it for positional reattachment.
    List(Vec<Self>),
    /// Embedded sub-document (plain data, not a populated reference).
    Record(Record),
    Doc(Box<Document>),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Value::Float64`, rejecting non-finite payloads.
    #[must_use]
    pub fn float(v: f64) -> Option<Self> {
        Float64::try_new(v).map(Self::Float64)
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for values that can stand alone in a reference slot.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        match self {
            Self::List(_) | Self::Record(_) | Self::Doc(_) => false,
            _ => true,
        }
    }

    /// Stable canonical rank used by cross-variant ordering surfaces.
    #[must_use]
    pub(crate) const fn canonical_rank(&self) -> u8 {
        compare::canonical_rank(self)
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_uint(&self) -> Option<u64> {
        if let Self::Uint(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        if let Self::Record(record) = self {
            Some(record)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_doc(&self) -> Option<&Document> {
        if let Self::Doc(doc) = self {
            Some(doc)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_doc_mut(&mut self) -> Option<&mut Document> {
        if let Self::Doc(doc) = self {
            Some(doc)
        } else {
            None
        }
    }

    ///
    /// EMPTY
    ///

    #[must_use]
    pub const fn is_empty(&self) -> Option<bool> {
        match self {
            Self::List(xs) => Some(xs.is_empty()),
            Self::Text(s) => Some(s.is_empty()),
            Self::Bytes(b) => Some(b.is_empty()),
            Self::Null => Some(true),

            _ => None,
        }
    }
}

#[macro_export]
macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool       => Bool,
    i8         => Int,
    i16        => Int,
    i32        => Int,
    i64        => Int,
    &str       => Text,
    String     => Text,
    u8         => Uint,
    u16        => Uint,
    u32        => Uint,
    u64        => Uint,
    Float64    => Float64,
    Ulid       => Ulid,
    Record     => Record,
}

impl From<Vec<Self>> for Value {
    fn from(vec: Vec<Self>) -> Self {
        Self::List(vec)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Self::Doc(Box::new(doc))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// NOTE:
// Value::partial_cmp is NOT the canonical ordering for store semantics.
// Use canonical_cmp / cmp_values for ORDER BY and key-range surfaces.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare::strict_order_cmp(self, other)
    }
}
