pub(crate) mod batch;
pub(crate) mod execute;
pub(crate) mod extract;
pub(crate) mod index;
pub(crate) mod reassemble;

#[cfg(test)]
mod tests;

use crate::{
    core::{document::Document, model::TypeRegistry},
    error::{ResolveError, ResolveOrigin},
    hydrate,
    obs::{self, MetricsEvent},
    plan::{PlanInput, PopulatePlan, normalize},
    resolve::{
        extract::GroupId,
        reassemble::{Attachables, GroupResults},
    },
    source::DocumentSource,
};
use std::collections::BTreeMap;

///
/// Resolver
///
/// The population engine: resolves declared reference paths on
/// already-loaded documents against a caller-owned registry and source.
/// Every call owns its extraction/index/reassembly state — concurrent
/// independent resolvers are safe by construction.
///
/// Documents move in and the populated graph moves out; a failure at any
/// depth returns only the error, so no caller-visible document is ever
/// partially populated.
///

pub struct Resolver<'a, S: DocumentSource> {
    registry: &'a TypeRegistry,
    source: &'a S,
    debug: bool,
}

impl<'a, S: DocumentSource> Resolver<'a, S> {
    #[must_use]
    pub const fn new(registry: &'a TypeRegistry, source: &'a S) -> Self {
        Self {
            registry,
            source,
            debug: false,
        }
    }

    /// Enable verbose per-node tracing.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.debug {
            println!("[debug] {}", s.as_ref());
        }
    }

    /// Resolve population plans over a document set.
    pub fn resolve_many(
        &self,
        docs: Vec<Document>,
        input: impl Into<PlanInput>,
    ) -> Result<Vec<Document>, ResolveError> {
        let plans = normalize(input)?;

        self.resolve_many_planned(docs, &plans)
    }

    /// Resolve a single document; same semantics, same shape out.
    pub fn resolve_one(
        &self,
        doc: Document,
        input: impl Into<PlanInput>,
    ) -> Result<Document, ResolveError> {
        let mut docs = self.resolve_many(vec![doc], input)?;

        docs.pop().ok_or_else(|| {
            ResolveError::invariant(
                ResolveOrigin::Reassemble,
                "single-document resolve returned an empty set",
            )
        })
    }

    /// Resolve pre-normalized plans, reusable across calls.
    pub fn resolve_many_planned(
        &self,
        mut docs: Vec<Document>,
        plans: &[PopulatePlan],
    ) -> Result<Vec<Document>, ResolveError> {
        obs::sink::record(&MetricsEvent::ResolveStart);

        self.resolve_level(&mut docs, plans)?;

        obs::sink::record(&MetricsEvent::ResolveFinish {
            documents: docs.len() as u64,
        });

        Ok(docs)
    }

    // One breadth-first level: sibling plan nodes over one source set.
    fn resolve_level(
        &self,
        docs: &mut [Document],
        plans: &[PopulatePlan],
    ) -> Result<(), ResolveError> {
        for plan in plans {
            self.resolve_node(docs, plan)?;
        }

        Ok(())
    }

    fn resolve_node(&self, docs: &mut [Document], plan: &PopulatePlan) -> Result<(), ResolveError> {
        // 1. descriptors + keys, shaped per owner
        let extraction = extract::extract_node(self.registry, docs, plan);

        // 2. de-duplicated fetch groups
        let groups = batch::plan_batches(&extraction);
        if groups.is_empty() {
            obs::sink::record(&MetricsEvent::NodeSkippedEmpty {
                path: plan.path.clone(),
            });
        }
        self.debug_log(format!(
            "populate '{}': {} owner(s), {} group(s)",
            plan.path,
            extraction.owners.len(),
            groups.len()
        ));

        // 3. fan-out fetches, fail-fast
        let fetched = execute::execute_batches(self.source, self.registry, plan, groups)?;

        // 4-5. index and hydrate each group before anything is grafted
        let mut results: BTreeMap<GroupId, GroupResults> = BTreeMap::new();
        for group in fetched {
            let index = index::index_records(&group.id.key_field, &group.records);

            let values = if plan.options.lean {
                Attachables::Lean(group.records)
            } else {
                let expected = self.registry.get(&group.id.target).ok_or_else(|| {
                    ResolveError::invariant(
                        ResolveOrigin::Hydrate,
                        format!("batch group targets unregistered type '{}'", group.id.target),
                    )
                })?;

                let mut hydrated = Vec::with_capacity(group.records.len());
                for record in group.records {
                    hydrated.push(hydrate::hydrate(self.registry, expected, record)?);
                }

                obs::sink::record(&MetricsEvent::RecordsHydrated {
                    target: group.id.target.clone(),
                    records: hydrated.len() as u64,
                });

                Attachables::Docs(hydrated)
            };

            results.insert(group.id, GroupResults { index, values });
        }

        // 6. children resolve on the hydrated set before grafting, so a
        // failing child plan leaves the owners untouched; a null-attached
        // parent never recurses because it hydrated nothing
        if !plan.children.is_empty() {
            let child_plans = child_plans(plan);
            for group in results.values_mut() {
                if let Attachables::Docs(attached) = &mut group.values {
                    self.resolve_level(attached, &child_plans)?;
                }
            }
        }

        // 7. graft, preserving cardinality and owner order
        let grafted = reassemble::reassemble(docs, plan, &extraction, &results);
        obs::sink::record(&MetricsEvent::DocumentsGrafted {
            path: plan.path.clone(),
            documents: grafted,
        });

        Ok(())
    }
}

// Child plans may name their path absolute ("team.captain" under "team");
// recursion operates on the attached documents, so strip the parent prefix.
fn child_plans(plan: &PopulatePlan) -> Vec<PopulatePlan> {
    let prefix = format!("{}.", plan.path);

    plan.children
        .iter()
        .map(|child| {
            let mut child = child.clone();
            if let Some(stripped) = child.path.strip_prefix(&prefix) {
                child.path = stripped.to_string();
            }
            child
        })
        .collect()
}
