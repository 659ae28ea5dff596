use crate::{
    core::{key::CanonicalKey, record::Record},
    expr::{FilterExpr, Projection, SortExpr},
};
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

///
/// SourceError
///
/// Failure surfaced by a document source. The engine wraps it into a
/// `ResolveError` and aborts the call; retry policy, if any, belongs to the
/// source itself.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// FetchRequest
///
/// One logical query against a target type: "records whose `key_field` is in
/// `keys`", ANDed with `filter`, projected by `select`, ordered by `sort`.
/// `limit`/`skip` bound the request's total row count — per-owner truncation
/// is the reassembler's job, never the store's.
///

#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub key_field: String,
    pub keys: BTreeSet<CanonicalKey>,
    pub filter: Option<FilterExpr>,
    pub select: Option<Projection>,
    pub sort: Option<SortExpr>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

///
/// DocumentSource
///
/// The "query a model" collaborator. Implementations own connection
/// handling, retries, and any I/O parallelism; the engine only demands that
/// returned records honor the request's filter/projection/sort semantics
/// (see `FilterExpr::matches` for the reference definition).
///

pub trait DocumentSource {
    /// Execute one fetch request against `target`.
    fn fetch(&self, target: &str, request: &FetchRequest) -> Result<Vec<Record>, SourceError>;
}
