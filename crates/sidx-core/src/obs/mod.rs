//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Maintainers and registries never touch metrics state directly; every
//! counter update flows through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, IndexSummary};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
