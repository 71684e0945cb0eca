//! Metrics sink boundary.
//!
//! Maintainer and registry logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between key planning and the
//! thread-local metrics state.
use crate::{error::ErrorOrigin, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    RowKeyBuilt {
        index: &'a str,
        key_bytes: u64,
    },
    CoveredValuesBuilt {
        index: &'a str,
        cells: u64,
    },
    MutationPlanned {
        index: &'a str,
        puts: u64,
        deletes: u64,
    },
    MissingColumn {
        index: &'a str,
    },
    FormatFailure {
        origin: ErrorOrigin,
    },
    RegistryEncoded {
        table: &'a str,
        bytes: u64,
    },
    RegistryDecoded {
        table: &'a str,
        maintainers: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::RowKeyBuilt { index, key_bytes } => {
                metrics::with_state_mut(|m| {
                    m.ops.row_keys_built = m.ops.row_keys_built.saturating_add(1);
                    m.ops.row_key_bytes = m.ops.row_key_bytes.saturating_add(key_bytes);
                    let entry = m.indexes.entry(index.to_string()).or_default();
                    entry.row_keys_built = entry.row_keys_built.saturating_add(1);
                    entry.row_key_bytes = entry.row_key_bytes.saturating_add(key_bytes);
                });
            }

            MetricsEvent::CoveredValuesBuilt { index, cells } => {
                metrics::with_state_mut(|m| {
                    m.ops.covered_builds = m.ops.covered_builds.saturating_add(1);
                    m.ops.covered_cells = m.ops.covered_cells.saturating_add(cells);
                    let entry = m.indexes.entry(index.to_string()).or_default();
                    entry.covered_builds = entry.covered_builds.saturating_add(1);
                });
            }

            MetricsEvent::MutationPlanned {
                index,
                puts,
                deletes,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_puts = m.ops.index_puts.saturating_add(puts);
                    m.ops.index_deletes = m.ops.index_deletes.saturating_add(deletes);
                    let entry = m.indexes.entry(index.to_string()).or_default();
                    entry.index_puts = entry.index_puts.saturating_add(puts);
                    entry.index_deletes = entry.index_deletes.saturating_add(deletes);
                });
            }

            MetricsEvent::MissingColumn { index } => {
                metrics::with_state_mut(|m| {
                    m.ops.missing_columns = m.ops.missing_columns.saturating_add(1);
                    let entry = m.indexes.entry(index.to_string()).or_default();
                    entry.missing_columns = entry.missing_columns.saturating_add(1);
                });
            }

            MetricsEvent::FormatFailure { origin } => {
                metrics::with_state_mut(|m| {
                    m.ops.format_errors = m.ops.format_errors.saturating_add(1);
                    let entry = m
                        .format_errors_by_origin
                        .entry(origin.to_string())
                        .or_default();
                    *entry = entry.saturating_add(1);
                });
            }

            MetricsEvent::RegistryEncoded { bytes, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.registry_encodes = m.ops.registry_encodes.saturating_add(1);
                    m.ops.registry_bytes_encoded =
                        m.ops.registry_bytes_encoded.saturating_add(bytes);
                });
            }

            MetricsEvent::RegistryDecoded { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.registry_decodes = m.ops.registry_decodes.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
