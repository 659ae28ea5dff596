use crate::{core::model::HydrationError, plan::PlanSpecError, source::SourceError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ResolveError
///
/// Structured runtime error for one `resolve` call, with a stable internal
/// classification. All fatal failures surface through this type unchanged;
/// the engine never retries.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub origin: ResolveOrigin,
    pub message: String,
}

impl ResolveError {
    /// Construct a ResolveError with an explicit classification.
    pub fn new(kind: ResolveErrorKind, origin: ResolveOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Construct a fetch failure for one batch group.
    pub(crate) fn batch_fetch(target: &str, err: &SourceError) -> Self {
        Self::new(
            ResolveErrorKind::BatchFetch,
            ResolveOrigin::Fetch,
            format!("batch fetch against '{target}' failed: {err}"),
        )
    }

    /// Construct an internal invariant violation.
    pub(crate) fn invariant(origin: ResolveOrigin, message: impl Into<String>) -> Self {
        Self::new(ResolveErrorKind::InvariantViolation, origin, message)
    }

    #[must_use]
    pub const fn is_invalid_plan(&self) -> bool {
        matches!(self.kind, ResolveErrorKind::InvalidPlanSpec)
    }

    #[must_use]
    pub const fn is_batch_fetch(&self) -> bool {
        matches!(self.kind, ResolveErrorKind::BatchFetch)
    }

    #[must_use]
    pub const fn is_hydration(&self) -> bool {
        matches!(self.kind, ResolveErrorKind::Hydration)
    }

    #[must_use]
    pub fn display_with_kind(&self) -> String {
        format!("{}:{}: {}", self.origin, self.kind, self.message)
    }
}

impl From<PlanSpecError> for ResolveError {
    fn from(err: PlanSpecError) -> Self {
        Self::new(
            ResolveErrorKind::InvalidPlanSpec,
            ResolveOrigin::Plan,
            err.to_string(),
        )
    }
}

impl From<HydrationError> for ResolveError {
    fn from(err: HydrationError) -> Self {
        Self::new(
            ResolveErrorKind::Hydration,
            ResolveOrigin::Hydrate,
            err.to_string(),
        )
    }
}

///
/// ResolveErrorKind
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolveErrorKind {
    /// Malformed population input; surfaced before any fetch.
    InvalidPlanSpec,
    /// Underlying source failure; aborts the whole call.
    BatchFetch,
    /// A fetched record cannot become its target type.
    Hydration,
    InvariantViolation,
}

impl fmt::Display for ResolveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidPlanSpec => "invalid_plan_spec",
            Self::BatchFetch => "batch_fetch",
            Self::Hydration => "hydration",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ResolveOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolveOrigin {
    Plan,
    Extract,
    Batch,
    Fetch,
    Index,
    Hydrate,
    Reassemble,
}

impl fmt::Display for ResolveOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Plan => "plan",
            Self::Extract => "extract",
            Self::Batch => "batch",
            Self::Fetch => "fetch",
            Self::Index => "index",
            Self::Hydrate => "hydrate",
            Self::Reassemble => "reassemble",
        };
        write!(f, "{label}")
    }
}
