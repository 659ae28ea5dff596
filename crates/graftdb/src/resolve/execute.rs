use crate::{
    core::{model::TypeRegistry, record::Record},
    error::ResolveError,
    obs::{self, MetricsEvent},
    plan::PopulatePlan,
    resolve::{
        batch::BatchGroup,
        extract::GroupId,
    },
    source::{DocumentSource, FetchRequest},
};

///
/// FetchedGroup
///

#[derive(Debug)]
pub(crate) struct FetchedGroup {
    pub id: GroupId,
    pub records: Vec<Record>,
}

/// Issue one fetch per batch group, in deterministic group order, failing
/// fast on the first source error. Groups with empty key sets never reach
/// this point (the planner does not create them).
pub(crate) fn execute_batches<S: DocumentSource>(
    source: &S,
    registry: &TypeRegistry,
    plan: &PopulatePlan,
    groups: Vec<BatchGroup>,
) -> Result<Vec<FetchedGroup>, ResolveError> {
    let mut fetched = Vec::with_capacity(groups.len());

    for group in groups {
        let request = build_request(registry, plan, &group);

        obs::sink::record(&MetricsEvent::BatchIssued {
            target: group.id.target.clone(),
            distinct_keys: group.keys.len() as u64,
        });

        let records = source
            .fetch(&group.id.target, &request)
            .map_err(|err| ResolveError::batch_fetch(&group.id.target, &err))?;

        obs::sink::record(&MetricsEvent::RecordsFetched {
            target: group.id.target.clone(),
            records: records.len() as u64,
        });

        fetched.push(FetchedGroup {
            id: group.id,
            records,
        });
    }

    Ok(fetched)
}

fn build_request(registry: &TypeRegistry, plan: &PopulatePlan, group: &BatchGroup) -> FetchRequest {
    // a projection must never drop the fields the engine joins and
    // discriminates on
    let select = plan.select.as_ref().map(|projection| {
        let mut required = vec![group.id.key_field.as_str()];
        if let Some(key) = registry
            .get(&group.id.target)
            .and_then(|model| model.discriminator_key())
        {
            required.push(key);
        }

        projection.with_required(&required)
    });

    // a store-side limit bounds the whole batch, so with several owners it
    // would starve whichever owner's matches sort last; pass the per-owner
    // window through only when a single owner contributed keys, and let the
    // reassembler truncate per owner otherwise
    let limit = plan.options.limit.and_then(|limit| {
        (group.key_owners <= 1).then(|| limit.saturating_add(plan.options.skip.unwrap_or(0)))
    });

    FetchRequest {
        key_field: group.id.key_field.clone(),
        keys: group.keys.clone(),
        filter: plan.filter.clone(),
        select,
        sort: plan.options.sort.clone(),
        limit,
        skip: None,
    }
}
