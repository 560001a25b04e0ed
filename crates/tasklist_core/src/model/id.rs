//! Task id allocation.
//!
//! # Invariants
//! - Allocated ids are strictly greater than every id already in the list.
//! - Ids track wall-clock milliseconds whenever the clock allows it.
//! - No id is allocated once the list already holds `i64::MAX`.

use crate::model::task::TaskId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Time source for id allocation.
pub trait Clock {
    fn now_epoch_ms(&self) -> i64;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Picks the id for a new task.
///
/// Returns `now_ms` unless an existing id is already at or beyond it; then
/// returns `max + 1` so two adds within one millisecond (or after a clock
/// step back) still get distinct, increasing ids.
///
/// Returns `None` when `max + 1` overflows.
pub fn next_task_id(
    now_ms: i64,
    existing: impl IntoIterator<Item = TaskId>,
) -> Option<TaskId> {
    match existing.into_iter().max() {
        Some(max) if max >= now_ms => max.checked_add(1),
        _ => Some(now_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::{next_task_id, Clock, SystemClock};

    #[test]
    fn uses_clock_value_when_ahead_of_existing_ids() {
        assert_eq!(next_task_id(1_000, [10, 500]), Some(1_000));
        assert_eq!(next_task_id(1_000, []), Some(1_000));
    }

    #[test]
    fn bumps_past_collisions_and_clock_steps_back() {
        assert_eq!(next_task_id(1_000, [1_000]), Some(1_001));
        assert_eq!(next_task_id(900, [1_000, 1_001]), Some(1_002));
    }

    #[test]
    fn refuses_to_allocate_past_max_id() {
        assert_eq!(next_task_id(1_000, [i64::MAX]), None);
        assert_eq!(next_task_id(i64::MAX, [i64::MAX - 1]), Some(i64::MAX));
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now_epoch_ms() > 0);
    }
}
