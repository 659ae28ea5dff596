mod properties;

use crate::{
    core::{document::Document, model::TypeRegistry},
    resolve::Resolver,
    test_support::MemorySource,
};

// Run one resolve over the fixture registry and return the populated set.
pub(super) fn resolve(
    registry: &TypeRegistry,
    source: &MemorySource,
    docs: Vec<Document>,
    input: impl Into<crate::plan::PlanInput>,
) -> Vec<Document> {
    Resolver::new(registry, source)
        .resolve_many(docs, input)
        .expect("fixture resolve should succeed")
}
