//! Staleness-gated comparison of a fresh snapshot against persisted state.

use chrono::{NaiveDateTime, TimeDelta};

use crate::domain::entities::server::{ServerRecord, ServerSnapshot};

/// Default minimum age before a stored record may count as changed.
pub const DEFAULT_STALENESS_WINDOW_SECS: i64 = 3600;

/// Strictly older than `window`: a record exactly `window` old is still fresh.
pub fn is_stale(last_update: NaiveDateTime, now: NaiveDateTime, window: TimeDelta) -> bool {
    now - last_update > window
}

/// Whether `proposed` counts as a change against the row it is about to overwrite.
///
/// Both conditions must hold: the stored row is stale, and country, owner or
/// grade differ. The caller overwrites the row either way.
pub fn server_changed(
    proposed: &ServerSnapshot,
    previous: &ServerRecord,
    now: NaiveDateTime,
    window: TimeDelta,
) -> bool {
    is_stale(previous.last_update, now, window) && proposed.differs_from(previous)
}
