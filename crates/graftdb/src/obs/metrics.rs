use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static STATE: RefCell<MetricsState> = RefCell::new(MetricsState::default());
}

///
/// MetricsState
/// Process-local counter state; only the sink boundary writes it.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub(crate) struct MetricsState {
    pub resolve_calls: u64,
    pub documents_resolved: u64,
    pub batches_issued: u64,
    pub nodes_skipped_empty: u64,
    pub distinct_keys: u64,
    pub records_fetched: u64,
    pub records_hydrated: u64,
    pub documents_grafted: u64,
    pub targets: BTreeMap<String, TargetCounters>,
}

///
/// TargetCounters
/// Per-target-type accounting.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TargetCounters {
    pub batches_issued: u64,
    pub records_fetched: u64,
    pub records_hydrated: u64,
}

///
/// MetricsReport
/// Point-in-time snapshot for endpoint/test plumbing.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MetricsReport {
    pub resolve_calls: u64,
    pub documents_resolved: u64,
    pub batches_issued: u64,
    pub nodes_skipped_empty: u64,
    pub distinct_keys: u64,
    pub records_fetched: u64,
    pub records_hydrated: u64,
    pub documents_grafted: u64,
    pub targets: BTreeMap<String, TargetCounters>,
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut MetricsState) -> R) -> R {
    STATE.with_borrow_mut(f)
}

pub(crate) fn report() -> MetricsReport {
    STATE.with_borrow(|state| MetricsReport {
        resolve_calls: state.resolve_calls,
        documents_resolved: state.documents_resolved,
        batches_issued: state.batches_issued,
        nodes_skipped_empty: state.nodes_skipped_empty,
        distinct_keys: state.distinct_keys,
        records_fetched: state.records_fetched,
        records_hydrated: state.records_hydrated,
        documents_grafted: state.documents_grafted,
        targets: state.targets.clone(),
    })
}

pub(crate) fn reset_all() {
    STATE.with_borrow_mut(|state| *state = MetricsState::default());
}
