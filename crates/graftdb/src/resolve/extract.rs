use crate::{
    core::{
        document::Document,
        key::CanonicalKey,
        model::TypeRegistry,
        record::SlotValues,
        value::Value,
    },
    descriptor::{ReferenceDescriptor, resolve_descriptor},
    plan::PopulatePlan,
};
use std::collections::BTreeMap;

///
/// GroupId
///
/// The fetch-routing identity of one batch group: all keys grouped under one
/// id resolve against the same concrete target through the same key field,
/// and therefore through one fetch request.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct GroupId {
    pub target: String,
    /// The target's primary key for stored references, the foreign field for
    /// virtual joins.
    pub key_field: String,
}

///
/// SlotKey
///
/// One extracted key with enough position to reattach uniquely.
///

#[derive(Clone, Debug)]
pub(crate) struct SlotKey {
    /// Array position within the owner's value, `None` for scalars and
    /// virtual join keys.
    pub slot: Option<usize>,
    pub group: GroupId,
    pub key: CanonicalKey,
}

///
/// OwnerShape
///
/// The original cardinality of the owner's value at the path, driving
/// cardinality-preserving reassembly.
///

#[derive(Clone, Debug)]
pub(crate) enum OwnerShape {
    /// Path absent on this document.
    Missing,
    Scalar,
    /// Array-valued reference of the recorded length.
    Array(usize),
    /// One-level flatten through an array of sub-documents; `true` marks
    /// elements that actually carried the terminal field.
    Flattened(Vec<bool>),
}

///
/// RelationFlavor
///

#[derive(Clone, Debug)]
pub(crate) enum RelationFlavor {
    Reference,
    Virtual { just_one: bool, count: bool },
}

///
/// OwnerExtraction
///
/// Everything extracted from one source document for one plan node.
/// Owned by the extractor for a single pass and discarded after reassembly.
///

#[derive(Debug)]
pub(crate) struct OwnerExtraction {
    pub owner: usize,
    pub shape: OwnerShape,
    pub relation: RelationFlavor,
    pub slots: Vec<SlotKey>,
}

///
/// NodeExtraction
///

#[derive(Debug, Default)]
pub(crate) struct NodeExtraction {
    pub owners: Vec<OwnerExtraction>,
}

// How the concrete target group is chosen for each extracted slot.
enum TargetSelector<'a> {
    Fixed(GroupId),
    ByField { type_field: &'a str },
}

impl TargetSelector<'_> {
    fn group_for(
        &self,
        registry: &TypeRegistry,
        doc: &Document,
        slot: Option<usize>,
    ) -> Option<GroupId> {
        match self {
            Self::Fixed(group) => Some(group.clone()),
            Self::ByField { type_field } => {
                let name = type_name_at(doc, type_field, slot)?;
                // unregistered dynamic targets resolve to null for the slot
                let model = registry.get(name)?;

                Some(GroupId {
                    target: name.to_string(),
                    key_field: model.primary_key().to_string(),
                })
            }
        }
    }
}

/// Walk the source documents and extract every resolvable key for one plan
/// node, recording owner, position, and concrete target per key.
///
/// Tolerated without error: unregistered document types, unknown or
/// non-reference paths, already-populated paths (unless `force`), null or
/// absent values, and unregistered dynamic target names.
pub(crate) fn extract_node(
    registry: &TypeRegistry,
    docs: &[Document],
    plan: &PopulatePlan,
) -> NodeExtraction {
    let mut owners = Vec::new();
    let mut descriptors: BTreeMap<String, Option<ReferenceDescriptor>> = BTreeMap::new();

    for (owner, doc) in docs.iter().enumerate() {
        let descriptor = descriptors
            .entry(doc.type_name().to_string())
            .or_insert_with(|| {
                registry.get(doc.type_name()).and_then(|model| {
                    resolve_descriptor(model, &plan.path, plan.target_override.as_deref())
                })
            });
        let Some(descriptor) = descriptor.as_ref() else {
            continue;
        };

        if doc.is_populated(&plan.path) && !plan.options.force {
            continue;
        }

        match descriptor {
            ReferenceDescriptor::Static { target } => {
                let Some(target_model) = registry.get(target) else {
                    // unknown static target: skip the path for this type only
                    continue;
                };
                let selector = TargetSelector::Fixed(GroupId {
                    target: target.clone(),
                    key_field: target_model.primary_key().to_string(),
                });
                let (shape, slots) = reference_slots(registry, doc, &plan.path, &selector);

                owners.push(OwnerExtraction {
                    owner,
                    shape,
                    relation: RelationFlavor::Reference,
                    slots,
                });
            }

            ReferenceDescriptor::DynamicByField { type_field } => {
                let selector = TargetSelector::ByField { type_field };
                let (shape, slots) = reference_slots(registry, doc, &plan.path, &selector);

                owners.push(OwnerExtraction {
                    owner,
                    shape,
                    relation: RelationFlavor::Reference,
                    slots,
                });
            }

            ReferenceDescriptor::Virtual {
                target,
                local_field,
                foreign_field,
                just_one,
                count,
            } => {
                if registry.get(target).is_none() {
                    continue;
                }
                let group = GroupId {
                    target: target.clone(),
                    key_field: foreign_field.clone(),
                };

                let mut slots = Vec::new();
                match doc.fields().read_slots(local_field) {
                    SlotValues::Missing => {}
                    SlotValues::Scalar(value) => {
                        collect_join_keys(registry, value, &group, &mut slots);
                    }
                    SlotValues::Items(items) => {
                        for item in items.into_iter().flatten() {
                            collect_join_keys(registry, item, &group, &mut slots);
                        }
                    }
                }

                owners.push(OwnerExtraction {
                    owner,
                    shape: OwnerShape::Scalar,
                    relation: RelationFlavor::Virtual {
                        just_one: *just_one,
                        count: *count,
                    },
                    slots,
                });
            }
        }
    }

    NodeExtraction { owners }
}

// Extract keys for a stored-reference path, preserving the value's shape.
fn reference_slots(
    registry: &TypeRegistry,
    doc: &Document,
    path: &str,
    selector: &TargetSelector<'_>,
) -> (OwnerShape, Vec<SlotKey>) {
    match doc.fields().read_slots(path) {
        SlotValues::Missing => (OwnerShape::Missing, Vec::new()),

        SlotValues::Scalar(Value::List(items)) => {
            let mut slots = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let Some(key) = slot_key(registry, item) else {
                    continue;
                };
                let Some(group) = selector.group_for(registry, doc, Some(index)) else {
                    continue;
                };
                slots.push(SlotKey {
                    slot: Some(index),
                    group,
                    key,
                });
            }

            (OwnerShape::Array(items.len()), slots)
        }

        SlotValues::Scalar(value) => {
            let mut slots = Vec::new();
            if let Some(key) = slot_key(registry, value)
                && let Some(group) = selector.group_for(registry, doc, None)
            {
                slots.push(SlotKey {
                    slot: None,
                    group,
                    key,
                });
            }

            (OwnerShape::Scalar, slots)
        }

        SlotValues::Items(items) => {
            let presence: Vec<bool> = items.iter().map(Option::is_some).collect();
            let mut slots = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let Some(value) = item else {
                    continue;
                };
                let Some(key) = slot_key(registry, value) else {
                    continue;
                };
                let Some(group) = selector.group_for(registry, doc, Some(index)) else {
                    continue;
                };
                slots.push(SlotKey {
                    slot: Some(index),
                    group,
                    key,
                });
            }

            (OwnerShape::Flattened(presence), slots)
        }
    }
}

// Canonicalize one slot value; populated slots re-extract through the
// attached document's primary key so forced re-resolution works.
fn slot_key(registry: &TypeRegistry, value: &Value) -> Option<CanonicalKey> {
    match value {
        Value::Doc(doc) => doc.primary_key(registry),
        other => CanonicalKey::from_value(other),
    }
}

// Flatten a virtual local-field value into join keys.
fn collect_join_keys(
    registry: &TypeRegistry,
    value: &Value,
    group: &GroupId,
    slots: &mut Vec<SlotKey>,
) {
    match value {
        Value::List(items) => {
            for item in items {
                collect_join_keys(registry, item, group, slots);
            }
        }
        other => {
            if let Some(key) = slot_key(registry, other) {
                slots.push(SlotKey {
                    slot: None,
                    group: group.clone(),
                    key,
                });
            }
        }
    }
}

// The per-slot target type name for a dynamic reference: a scalar type field
// applies to every element, array-parallel type fields align by position.
fn type_name_at<'a>(doc: &'a Document, type_field: &str, slot: Option<usize>) -> Option<&'a str> {
    match doc.fields().read_slots(type_field) {
        SlotValues::Scalar(Value::Text(name)) => Some(name.as_str()),
        SlotValues::Scalar(Value::List(names)) => names.get(slot?)?.as_text(),
        SlotValues::Items(items) => items.get(slot?).copied().flatten()?.as_text(),
        _ => None,
    }
}
