use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for maintainer and registry activity.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) indexes: BTreeMap<String, IndexCounters>,
    pub(crate) format_errors_by_origin: BTreeMap<String, u64>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Key building
    pub row_keys_built: u64,
    pub row_key_bytes: u64,
    pub covered_builds: u64,
    pub covered_cells: u64,

    // Mutation planning
    pub index_puts: u64,
    pub index_deletes: u64,

    // Failures
    pub missing_columns: u64,
    pub format_errors: u64,

    // Registry blobs
    pub registry_encodes: u64,
    pub registry_decodes: u64,
    pub registry_bytes_encoded: u64,
}

///
/// IndexCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct IndexCounters {
    pub(crate) row_keys_built: u64,
    pub(crate) row_key_bytes: u64,
    pub(crate) covered_builds: u64,
    pub(crate) index_puts: u64,
    pub(crate) index_deletes: u64,
    pub(crate) missing_columns: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
/// Snapshot of the current thread's counters.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub indexes: Vec<IndexSummary>,

    /// Format failures keyed by the origin label that reported them.
    pub format_errors_by_origin: BTreeMap<String, u64>,
}

///
/// IndexSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IndexSummary {
    pub name: String,
    pub row_keys_built: u64,
    pub avg_row_key_bytes: f64,
    pub covered_builds: u64,
    pub index_puts: u64,
    pub index_deletes: u64,
    pub missing_columns: u64,
}

/// Build a metrics report by inspecting in-memory counters only.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let indexes = snap
        .indexes
        .iter()
        .map(|(name, c)| {
            let avg_row_key_bytes = if c.row_keys_built > 0 {
                c.row_key_bytes as f64 / c.row_keys_built as f64
            } else {
                0.0
            };

            IndexSummary {
                name: name.clone(),
                row_keys_built: c.row_keys_built,
                avg_row_key_bytes,
                covered_builds: c.covered_builds,
                index_puts: c.index_puts,
                index_deletes: c.index_deletes,
                missing_columns: c.missing_columns,
            }
        })
        .collect();

    EventReport {
        ops: snap.ops,
        indexes,
        format_errors_by_origin: snap.format_errors_by_origin,
    }
}
