//! ## Crate layout
//! - `core`: re-export of `graftdb-core` — values, keys, records, documents,
//!   and model metadata.
//! - `plan`: the population plan language and its normalizer.
//! - `descriptor`: reference declarations resolved from field metadata.
//! - `resolve`: the extract → batch → execute → index → reassemble pipeline.
//! - `hydrate`: discriminator-aware record hydration.
//! - `source`: the fetch collaborator boundary.
//! - `expr`: serialized filter/sort/projection language handed to sources.
//! - `obs`: runtime telemetry (metrics) and sink abstractions.
//!
//! The `prelude` module mirrors the surface used by calling code.

pub use graftdb_core as core;

pub mod descriptor;
pub mod error;
pub mod expr;
pub mod hydrate;
pub mod obs;
pub mod plan;
pub mod resolve;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        core::{
            document::Document,
            key::CanonicalKey,
            model::{DocumentModel, FieldKind, FieldModel, TypeRegistry, VirtualModel},
            record::Record,
            value::Value,
        },
        error::ResolveError,
        expr::{FilterExpr, OrderDirection, Projection, SortExpr},
        plan::{PlanInput, PlanSpec, PopulatePlan},
        resolve::Resolver,
        source::{DocumentSource, FetchRequest},
    };
}
