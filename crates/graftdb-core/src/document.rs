use crate::{
    key::CanonicalKey,
    model::TypeRegistry,
    record::{Record, SlotValues, SlotWrite},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// Document
///
/// A typed, hydrated instance: the unit the population engine reads keys
/// from and grafts resolved references back onto. `populated` records which
/// paths have already been resolved so re-population can short-circuit and
/// depopulation knows what to unwind.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Document {
    type_name: String,
    fields: Record,
    populated: BTreeSet<String>,
}

impl Document {
    #[must_use]
    pub fn new(type_name: impl Into<String>, fields: Record) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
            populated: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn fields(&self) -> &Record {
        &self.fields
    }

    pub const fn fields_mut(&mut self) -> &mut Record {
        &mut self.fields
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        self.fields.get_path(path)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.set(name, value);
    }

    /// The document's canonical primary key, per its registered model.
    #[must_use]
    pub fn primary_key(&self, registry: &TypeRegistry) -> Option<CanonicalKey> {
        let model = registry.get(&self.type_name)?;
        let value = self.fields.get(model.primary_key())?;

        CanonicalKey::from_value(value)
    }

    ///
    /// POPULATION MARKERS
    ///

    #[must_use]
    pub fn is_populated(&self, path: &str) -> bool {
        self.populated.contains(path)
    }

    pub fn mark_populated(&mut self, path: impl Into<String>) {
        self.populated.insert(path.into());
    }

    #[must_use]
    pub const fn populated_paths(&self) -> &BTreeSet<String> {
        &self.populated
    }

    /// Swing a populated path back to its raw stored form.
    ///
    /// Reference paths revert to the attached documents' primary keys;
    /// virtual paths are removed outright (the store never held them).
    /// Returns whether the document changed.
    pub fn depopulate(&mut self, path: &str, registry: &TypeRegistry) -> bool {
        if !self.populated.contains(path) {
            return false;
        }

        let is_virtual = registry
            .get(&self.type_name)
            .is_some_and(|model| model.virtual_named(path).is_some());

        let changed = if is_virtual {
            if path.contains('.') {
                self.fields.write_slots(path, SlotWrite::Scalar(Value::Null))
            } else {
                self.fields.remove(path).is_some()
            }
        } else {
            match depopulated_replacement(&self.fields, path, registry) {
                Some(write) => self.fields.write_slots(path, write),
                None => false,
            }
        };

        self.populated.remove(path);

        changed
    }
}

// Compute the raw replacement for every slot currently holding a grafted doc.
fn depopulated_replacement(
    fields: &Record,
    path: &str,
    registry: &TypeRegistry,
) -> Option<SlotWrite> {
    match fields.read_slots(path) {
        SlotValues::Missing => None,
        SlotValues::Scalar(value) => Some(SlotWrite::Scalar(raw_form(value, registry))),
        SlotValues::Items(items) => Some(SlotWrite::Items(
            items
                .into_iter()
                .map(|item| item.map(|value| raw_form(value, registry)))
                .collect(),
        )),
    }
}

fn raw_form(value: &Value, registry: &TypeRegistry) -> Value {
    match value {
        Value::Doc(doc) => doc
            .primary_key(registry)
            .map_or(Value::Null, |key| key.to_value()),
        Value::List(items) => {
            Value::List(items.iter().map(|item| raw_form(item, registry)).collect())
        }
        other => other.clone(),
    }
}
