use crate::{
    core::{key::CanonicalKey, record::Record, value::Value},
    source::{DocumentSource, FetchRequest, SourceError},
};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
};

///
/// FetchCall
///
/// One logged fetch, for asserting batch counts and key sets.
///

#[derive(Clone, Debug)]
pub(crate) struct FetchCall {
    pub target: String,
    pub key_field: String,
    pub keys: BTreeSet<CanonicalKey>,
}

///
/// MemorySource
///
/// Deterministic in-memory document source: evaluates the request against
/// registered record sets using the reference filter/sort/projection
/// semantics, and logs every fetch.
///

#[derive(Debug, Default)]
pub(crate) struct MemorySource {
    collections: BTreeMap<String, Vec<Record>>,
    fail_targets: BTreeSet<String>,
    log: RefCell<Vec<FetchCall>>,
}

impl MemorySource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, target: impl Into<String>, records: Vec<Record>) {
        self.collections
            .entry(target.into())
            .or_default()
            .extend(records);
    }

    /// Make every fetch against `target` fail, for fail-fast tests.
    pub(crate) fn fail_target(&mut self, target: impl Into<String>) {
        self.fail_targets.insert(target.into());
    }

    pub(crate) fn calls(&self) -> Vec<FetchCall> {
        self.log.borrow().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.log.borrow().len()
    }

    fn key_matches(record: &Record, request: &FetchRequest) -> bool {
        let Some(value) = record.get_path(&request.key_field) else {
            return false;
        };

        match value {
            Value::List(items) => items
                .iter()
                .filter_map(CanonicalKey::from_value)
                .any(|key| request.keys.contains(&key)),
            other => {
                CanonicalKey::from_value(other).is_some_and(|key| request.keys.contains(&key))
            }
        }
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, target: &str, request: &FetchRequest) -> Result<Vec<Record>, SourceError> {
        self.log.borrow_mut().push(FetchCall {
            target: target.to_string(),
            key_field: request.key_field.clone(),
            keys: request.keys.clone(),
        });

        if self.fail_targets.contains(target) {
            return Err(SourceError::new(format!(
                "injected failure for '{target}'"
            )));
        }

        let mut rows: Vec<Record> = self
            .collections
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|record| Self::key_matches(record, request))
            .filter(|record| {
                request
                    .filter
                    .as_ref()
                    .is_none_or(|filter| filter.matches(record))
            })
            .cloned()
            .collect();

        if let Some(sort) = &request.sort {
            rows.sort_by(|a, b| sort.cmp_records(a, b));
        }

        if let Some(skip) = request.skip {
            let skip = skip as usize;
            rows = if skip >= rows.len() {
                Vec::new()
            } else {
                rows.split_off(skip)
            };
        }

        if let Some(limit) = request.limit {
            rows.truncate(limit as usize);
        }

        if let Some(select) = &request.select {
            rows = rows.iter().map(|record| select.apply(record)).collect();
        }

        Ok(rows)
    }
}
