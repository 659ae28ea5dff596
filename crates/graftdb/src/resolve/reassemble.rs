use crate::{
    core::{
        document::Document,
        key::CanonicalKey,
        record::{Record, SlotWrite},
        value::Value,
    },
    plan::PopulatePlan,
    resolve::{
        extract::{GroupId, NodeExtraction, OwnerExtraction, OwnerShape, RelationFlavor},
        index::ResultIndex,
    },
};
use std::collections::BTreeMap;

///
/// Attachables
///
/// What one fetched group attaches: hydrated documents, or raw records when
/// the plan asked for `lean`.
///

#[derive(Debug)]
pub(crate) enum Attachables {
    Lean(Vec<Record>),
    Docs(Vec<Document>),
}

impl Attachables {
    fn materialize(&self, position: usize) -> Option<Value> {
        match self {
            Self::Lean(records) => records.get(position).cloned().map(Value::Record),
            Self::Docs(docs) => docs.get(position).cloned().map(Value::from),
        }
    }
}

///
/// GroupResults
///

#[derive(Debug)]
pub(crate) struct GroupResults {
    pub index: ResultIndex,
    pub values: Attachables,
}

/// Graft resolved values back onto the source documents.
///
/// Cardinality is preserved: scalar slots collapse to one value or `Null`,
/// array slots keep their original length with unresolved positions `Null`,
/// and flattened sub-document slots write element-wise. `skip`/`limit`
/// truncate per owning document, here and only here. Every processed owner
/// is marked populated. Returns the number of documents written to.
pub(crate) fn reassemble(
    docs: &mut [Document],
    plan: &PopulatePlan,
    extraction: &NodeExtraction,
    results: &BTreeMap<GroupId, GroupResults>,
) -> u64 {
    let mut grafted = 0u64;

    for owner in &extraction.owners {
        let write = match &owner.relation {
            RelationFlavor::Reference => reference_write(owner, plan, results),
            RelationFlavor::Virtual { just_one, count } => Some(SlotWrite::Scalar(virtual_value(
                owner, plan, results, *just_one, *count,
            ))),
        };

        let doc = &mut docs[owner.owner];
        if let Some(write) = write && doc.fields_mut().write_slots(&plan.path, write) {
            grafted += 1;
        }
        doc.mark_populated(plan.path.clone());
    }

    grafted
}

// First match for one slot key, in store order.
fn first_match(
    results: &BTreeMap<GroupId, GroupResults>,
    group: &GroupId,
    key: &CanonicalKey,
) -> Option<Value> {
    let group = results.get(group)?;
    let position = group.index.bucket(key).first()?;

    group.values.materialize(*position)
}

fn reference_write(
    owner: &OwnerExtraction,
    plan: &PopulatePlan,
    results: &BTreeMap<GroupId, GroupResults>,
) -> Option<SlotWrite> {
    match &owner.shape {
        // null/absent values resolve to null directly, no lookup involved
        OwnerShape::Missing | OwnerShape::Scalar => {
            let value = owner
                .slots
                .first()
                .and_then(|slot| first_match(results, &slot.group, &slot.key))
                .unwrap_or(Value::Null);

            Some(SlotWrite::Scalar(value))
        }

        OwnerShape::Array(len) => {
            let mut values = vec![Value::Null; *len];
            for slot in &owner.slots {
                let Some(position) = slot.slot else { continue };
                if let Some(value) = first_match(results, &slot.group, &slot.key) {
                    values[position] = value;
                }
            }
            truncate_per_owner(&mut values, plan);

            Some(SlotWrite::Scalar(Value::List(values)))
        }

        OwnerShape::Flattened(presence) => {
            let mut values: Vec<Option<Value>> = presence
                .iter()
                .map(|present| present.then_some(Value::Null))
                .collect();
            for slot in &owner.slots {
                let Some(position) = slot.slot else { continue };
                if let Some(value) = first_match(results, &slot.group, &slot.key) {
                    values[position] = Some(value);
                }
            }

            Some(SlotWrite::Items(values))
        }
    }
}

fn virtual_value(
    owner: &OwnerExtraction,
    plan: &PopulatePlan,
    results: &BTreeMap<GroupId, GroupResults>,
    just_one: bool,
    count: bool,
) -> Value {
    // concatenate buckets in join-key order, de-duplicating record positions
    // while keeping first occurrence (one record may match several keys)
    let mut positions: Vec<(&GroupId, usize)> = Vec::new();
    for slot in &owner.slots {
        if let Some(group) = results.get(&slot.group) {
            for position in group.index.bucket(&slot.key) {
                if !positions
                    .iter()
                    .any(|(id, seen)| *id == &slot.group && seen == position)
                {
                    positions.push((&slot.group, *position));
                }
            }
        }
    }

    if count {
        return Value::Uint(positions.len() as u64);
    }

    if just_one {
        return positions
            .first()
            .and_then(|(id, position)| results.get(*id)?.values.materialize(*position))
            .unwrap_or(Value::Null);
    }

    let mut values: Vec<Value> = positions
        .into_iter()
        .filter_map(|(id, position)| results.get(id)?.values.materialize(position))
        .collect();
    truncate_per_owner(&mut values, plan);

    Value::List(values)
}

// Per-owner skip-then-limit window; the store-side bound only caps the
// whole batch.
fn truncate_per_owner<T>(values: &mut Vec<T>, plan: &PopulatePlan) {
    if let Some(skip) = plan.options.skip {
        let skip = skip as usize;
        if skip >= values.len() {
            values.clear();
        } else {
            values.drain(..skip);
        }
    }

    if let Some(limit) = plan.options.limit {
        values.truncate(limit as usize);
    }
}
