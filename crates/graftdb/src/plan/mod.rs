mod normalize;

pub use normalize::{PlanSpecError, normalize};

use crate::expr::{FilterExpr, Projection, SortExpr};
use serde::{Deserialize, Serialize};

///
/// PopulatePlan
///
/// One normalized node of a population plan tree. `path` is unique within a
/// tree level (the normalizer merges duplicates); descriptors are resolved
/// per extraction pass, never stored here.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PopulatePlan {
    pub path: String,
    /// Replaces a static target declaration for this path.
    pub target_override: Option<String>,
    pub select: Option<Projection>,
    pub filter: Option<FilterExpr>,
    pub options: PlanOptions,
    pub children: Vec<PopulatePlan>,
}

impl PopulatePlan {
    #[must_use]
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target_override: None,
            select: None,
            filter: None,
            options: PlanOptions::default(),
            children: Vec::new(),
        }
    }
}

///
/// PlanOptions
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PlanOptions {
    pub sort: Option<SortExpr>,
    /// Per owning document, not per batch.
    pub limit: Option<u32>,
    /// Per owning document, not per batch.
    pub skip: Option<u32>,
    /// Attach raw records instead of hydrated documents.
    pub lean: bool,
    /// Re-resolve paths already marked populated.
    pub force: bool,
}

///
/// PlanSpec
///
/// One declarative population request, the builder-friendly input shape.
/// Reusable across calls; `normalize` turns it (or any `PlanInput`) into
/// `PopulatePlan` trees.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PlanSpec {
    pub path: String,
    pub model: Option<String>,
    pub select: Option<Projection>,
    pub filter: Option<FilterExpr>,
    pub options: PlanOptions,
    pub populate: Option<Box<PlanInput>>,
}

impl PlanSpec {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Override the target model for this path.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn select(mut self, projection: Projection) -> Self {
        self.select = Some(projection);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterExpr) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortExpr) -> Self {
        self.options.sort = Some(sort);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.options.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn skip(mut self, skip: u32) -> Self {
        self.options.skip = Some(skip);
        self
    }

    #[must_use]
    pub const fn lean(mut self) -> Self {
        self.options.lean = true;
        self
    }

    #[must_use]
    pub const fn force(mut self) -> Self {
        self.options.force = true;
        self
    }

    /// Nest a child population request under this path.
    #[must_use]
    pub fn populate(mut self, input: impl Into<PlanInput>) -> Self {
        let input = input.into();
        self.populate = Some(Box::new(match self.populate.take() {
            Some(existing) => PlanInput::Many(vec![*existing, input]),
            None => input,
        }));
        self
    }
}

///
/// PlanInput
///
/// Every input shape `resolve` accepts: a bare path, a whitespace-separated
/// path list, a full spec, or a list of any of these.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum PlanInput {
    Path(String),
    Spec(Box<PlanSpec>),
    Many(Vec<PlanInput>),
}

impl From<&str> for PlanInput {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for PlanInput {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<PlanSpec> for PlanInput {
    fn from(spec: PlanSpec) -> Self {
        Self::Spec(Box::new(spec))
    }
}

impl From<Vec<Self>> for PlanInput {
    fn from(inputs: Vec<Self>) -> Self {
        Self::Many(inputs)
    }
}

impl From<Vec<PlanSpec>> for PlanInput {
    fn from(specs: Vec<PlanSpec>) -> Self {
        Self::Many(specs.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<&str>> for PlanInput {
    fn from(paths: Vec<&str>) -> Self {
        Self::Many(paths.into_iter().map(Into::into).collect())
    }
}
