#[cfg(test)]
mod tests;

use crate::{
    types::{Float64, Ulid},
    value::Value,
};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// CanonicalKey
///
/// Normalized, type-tagged encoding of a reference value. Two values the
/// store treats as the same identifier must produce identical canonical
/// keys; in particular every non-negative integer representation collapses
/// into `Uint`, and integral floats collapse into the integer variants.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CanonicalKey {
    /// Strictly negative integers; non-negative values normalize to `Uint`.
    Int(i64),
    Uint(u64),
    /// Finite, non-integral floats only.
    Float(Float64),
    Text(String),
    Bytes(Vec<u8>),
    Ulid(Ulid),
}

impl CanonicalKey {
    // ── Variant tags (do not reorder) ─────────────────
    pub(crate) const TAG_INT: u8 = 0;
    pub(crate) const TAG_UINT: u8 = 1;
    pub(crate) const TAG_FLOAT: u8 = 2;
    pub(crate) const TAG_TEXT: u8 = 3;
    pub(crate) const TAG_BYTES: u8 = 4;
    pub(crate) const TAG_ULID: u8 = 5;

    const fn tag(&self) -> u8 {
        match self {
            Self::Int(_) => Self::TAG_INT,
            Self::Uint(_) => Self::TAG_UINT,
            Self::Float(_) => Self::TAG_FLOAT,
            Self::Text(_) => Self::TAG_TEXT,
            Self::Bytes(_) => Self::TAG_BYTES,
            Self::Ulid(_) => Self::TAG_ULID,
        }
    }

    const fn variant_rank(&self) -> u8 {
        self.tag()
    }

    /// Canonicalize one document value into a key.
    ///
    /// Returns `None` for values that cannot identify another document
    /// (`Null`, collections, booleans, non-finite floats). Hydrated `Doc`
    /// values are not handled here; re-extraction from populated slots goes
    /// through the owning model's primary key.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Self::from_i64(*i)),
            Value::Uint(u) => Some(Self::Uint(*u)),
            Value::Float64(f) => Some(Self::from_float(*f)),
            Value::Text(s) => Some(Self::Text(s.clone())),
            Value::Bytes(b) => Some(Self::Bytes(b.clone())),
            Value::Ulid(u) => Some(Self::Ulid(*u)),

            _ => None,
        }
    }

    /// The raw value form of this key, used when a populated slot is swung
    /// back to its stored representation.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(i) => Value::Int(*i),
            Self::Uint(u) => Value::Uint(*u),
            Self::Float(f) => Value::Float64(*f),
            Self::Text(s) => Value::Text(s.clone()),
            Self::Bytes(b) => Value::Bytes(b.clone()),
            Self::Ulid(u) => Value::Ulid(*u),
        }
    }

    #[must_use]
    #[expect(clippy::cast_sign_loss)]
    const fn from_i64(i: i64) -> Self {
        if i < 0 { Self::Int(i) } else { Self::Uint(i as u64) }
    }

    fn from_float(f: Float64) -> Self {
        let v = f.get();
        if v.fract() == 0.0 {
            if let Some(u) = v.to_u64() {
                return Self::Uint(u);
            }
            if let Some(i) = v.to_i64() {
                return Self::from_i64(i);
            }
        }

        // non-integral (or integral beyond 64-bit range): keep the float form
        Self::Float(f)
    }

    /// Encode this key into its order-preserving `tag || payload` form.
    ///
    /// Within one variant, byte order equals `Ord`; across variants the tag
    /// byte dominates, matching `variant_rank`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 16);

        // ── Tag ─────────────────────────────────────
        buf.push(self.tag());

        // ── Payload ─────────────────────────────────
        match self {
            Self::Int(v) => {
                // Flip sign bit to preserve ordering in lexicographic bytes.
                let biased = (*v).cast_unsigned() ^ (1u64 << 63);
                buf.extend_from_slice(&biased.to_be_bytes());
            }

            Self::Uint(v) => {
                buf.extend_from_slice(&v.to_be_bytes());
            }

            Self::Float(v) => {
                buf.extend_from_slice(&v.to_ordered_bytes());
            }

            Self::Text(v) => {
                buf.extend_from_slice(v.as_bytes());
            }

            Self::Bytes(v) => {
                buf.extend_from_slice(v);
            }

            Self::Ulid(v) => {
                buf.extend_from_slice(&v.to_bytes());
            }
        }

        buf
    }
}

impl Ord for CanonicalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Ord::cmp(a, b),
            (Self::Uint(a), Self::Uint(b)) => Ord::cmp(a, b),
            (Self::Float(a), Self::Float(b)) => Ord::cmp(a, b),
            (Self::Text(a), Self::Text(b)) => Ord::cmp(a, b),
            (Self::Bytes(a), Self::Bytes(b)) => Ord::cmp(a, b),
            (Self::Ulid(a), Self::Ulid(b)) => Ord::cmp(a, b),

            _ => Ord::cmp(&self.variant_rank(), &other.variant_rank()), // fallback for cross-type comparison
        }
    }
}

impl PartialOrd for CanonicalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

/// Implements `From<T> for CanonicalKey` for simple conversions.
macro_rules! impl_from_key {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$ty> for CanonicalKey {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    }
}

impl_from_key! {
    &str   => Text,
    String => Text,
    u8     => Uint,
    u16    => Uint,
    u32    => Uint,
    u64    => Uint,
    Ulid   => Ulid,
}

impl From<i64> for CanonicalKey {
    fn from(v: i64) -> Self {
        Self::from_i64(v)
    }
}
