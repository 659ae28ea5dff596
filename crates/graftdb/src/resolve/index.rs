use crate::core::{key::CanonicalKey, record::Record, value::Value};
use std::collections::BTreeMap;

///
/// ResultIndex
///
/// `CanonicalKey -> record positions` for one fetched group. Positions
/// append in fetch order, so whatever ordering the source honored survives
/// inside each bucket.
///

#[derive(Debug, Default)]
pub(crate) struct ResultIndex {
    buckets: BTreeMap<CanonicalKey, Vec<usize>>,
}

impl ResultIndex {
    #[must_use]
    pub(crate) fn bucket(&self, key: &CanonicalKey) -> &[usize] {
        self.buckets.get(key).map_or(&[], Vec::as_slice)
    }
}

/// Index one group's records by the canonicalized value at `key_field`.
///
/// An array-valued key field buckets the record under every element (a
/// virtual foreign field may be an array). Records with no indexable key are
/// dropped — nothing could ever match them.
pub(crate) fn index_records(key_field: &str, records: &[Record]) -> ResultIndex {
    let mut index = ResultIndex::default();

    for (position, record) in records.iter().enumerate() {
        let Some(value) = record.get_path(key_field) else {
            continue;
        };

        match value {
            Value::List(items) => {
                for item in items {
                    if let Some(key) = CanonicalKey::from_value(item) {
                        index.buckets.entry(key).or_default().push(position);
                    }
                }
            }
            other => {
                if let Some(key) = CanonicalKey::from_value(other) {
                    index.buckets.entry(key).or_default().push(position);
                }
            }
        }
    }

    index
}
