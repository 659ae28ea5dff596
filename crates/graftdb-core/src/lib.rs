//! Core data model for GraftDB: values, canonical reference keys, raw
//! records, hydrated documents, and the runtime type metadata consumed by the
//! population engine.

// public exports are one module level down
pub mod document;
pub mod key;
pub mod model;
pub mod record;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, encoders, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        document::Document,
        key::CanonicalKey,
        model::{DocumentModel, FieldKind, FieldModel, TypeRegistry, VirtualModel},
        record::Record,
        value::Value,
    };
}
