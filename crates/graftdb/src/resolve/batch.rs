use crate::{
    core::key::CanonicalKey,
    resolve::extract::{GroupId, NodeExtraction},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// BatchGroup
///
/// One logical fetch request: the de-duplicated canonical keys to match
/// against one target type through one key field, plus how many owners
/// contributed a key (used to scale the store-side limit bound).
///

#[derive(Debug)]
pub(crate) struct BatchGroup {
    pub id: GroupId,
    pub keys: BTreeSet<CanonicalKey>,
    pub key_owners: usize,
}

/// Group extracted keys by fetch-routing identity, de-duplicating values.
///
/// Groups come back in deterministic `(target, key_field)` order; a node
/// whose owners carry no resolvable keys produces no groups at all, so no
/// fetch is ever issued for it.
pub(crate) fn plan_batches(extraction: &NodeExtraction) -> Vec<BatchGroup> {
    let mut grouped: BTreeMap<GroupId, BatchGroup> = BTreeMap::new();

    for owner in &extraction.owners {
        let mut touched: BTreeSet<GroupId> = BTreeSet::new();

        for slot in &owner.slots {
            let group = grouped
                .entry(slot.group.clone())
                .or_insert_with(|| BatchGroup {
                    id: slot.group.clone(),
                    keys: BTreeSet::new(),
                    key_owners: 0,
                });
            group.keys.insert(slot.key.clone());

            if touched.insert(slot.group.clone()) {
                group.key_owners += 1;
            }
        }
    }

    grouped.into_values().collect()
}
