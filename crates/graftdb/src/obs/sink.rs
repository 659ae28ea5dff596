//! Metrics sink boundary.
//!
//! Resolver logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink; this
//! module is the only bridge between engine code and the counter state.

use crate::obs::metrics::{self, MetricsReport};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Debug)]
pub enum MetricsEvent {
    ResolveStart,
    ResolveFinish {
        documents: u64,
    },
    /// One fetch went out for a batch group.
    BatchIssued {
        target: String,
        distinct_keys: u64,
    },
    /// A plan node had no resolvable keys; no fetch was issued.
    NodeSkippedEmpty {
        path: String,
    },
    RecordsFetched {
        target: String,
        records: u64,
    },
    RecordsHydrated {
        target: String,
        records: u64,
    },
    DocumentsGrafted {
        path: String,
        documents: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: &MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: &MetricsEvent) {
        match event {
            MetricsEvent::ResolveStart => {
                metrics::with_state_mut(|m| {
                    m.resolve_calls = m.resolve_calls.saturating_add(1);
                });
            }

            MetricsEvent::ResolveFinish { documents } => {
                metrics::with_state_mut(|m| {
                    m.documents_resolved = m.documents_resolved.saturating_add(*documents);
                });
            }

            MetricsEvent::BatchIssued {
                target,
                distinct_keys,
            } => {
                metrics::with_state_mut(|m| {
                    m.batches_issued = m.batches_issued.saturating_add(1);
                    m.distinct_keys = m.distinct_keys.saturating_add(*distinct_keys);
                    let entry = m.targets.entry(target.clone()).or_default();
                    entry.batches_issued = entry.batches_issued.saturating_add(1);
                });
            }

            MetricsEvent::NodeSkippedEmpty { .. } => {
                metrics::with_state_mut(|m| {
                    m.nodes_skipped_empty = m.nodes_skipped_empty.saturating_add(1);
                });
            }

            MetricsEvent::RecordsFetched { target, records } => {
                metrics::with_state_mut(|m| {
                    m.records_fetched = m.records_fetched.saturating_add(*records);
                    let entry = m.targets.entry(target.clone()).or_default();
                    entry.records_fetched = entry.records_fetched.saturating_add(*records);
                });
            }

            MetricsEvent::RecordsHydrated { target, records } => {
                metrics::with_state_mut(|m| {
                    m.records_hydrated = m.records_hydrated.saturating_add(*records);
                    let entry = m.targets.entry(target.clone()).or_default();
                    entry.records_hydrated = entry.records_hydrated.saturating_add(*records);
                });
            }

            MetricsEvent::DocumentsGrafted { documents, .. } => {
                metrics::with_state_mut(|m| {
                    m.documents_grafted = m.documents_grafted.saturating_add(*documents);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: &MetricsEvent) {
    let sink = SINK_OVERRIDE.with_borrow(Clone::clone);
    if let Some(sink) = sink {
        sink.record(event);
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> MetricsReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous override is restored on all exits, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with_borrow_mut(|slot| {
                *slot = self.0.take();
            });
        }
    }

    let prev = SINK_OVERRIDE.with_borrow_mut(|slot| slot.replace(sink));
    let _guard = Guard(prev);

    f()
}
