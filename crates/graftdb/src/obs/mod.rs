//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! This module never touches resolver state directly; engine code records
//! events through [`sink::record`] and everything else flows from there.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{MetricsReport, TargetCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
