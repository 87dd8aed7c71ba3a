//! Crash-loop detection: a sliding window of restart timestamps per
//! service, sticky once tripped.

use chrono::Utc;

use crate::constants::{CRASH_LOOP_THRESHOLD, CRASH_LOOP_WINDOW_SECS};
use crate::error::AdaError;
use crate::paths::Paths;
use crate::state::StateStore;

/// Records a restart for `name`, prunes timestamps outside the crash-loop
/// window, and sets the sticky `crash_loop` flag if the threshold is met.
/// Returns the state of that flag after recording.
pub fn record_restart(paths: &Paths, name: &str) -> Result<bool, AdaError> {
    let store = StateStore::new(paths);
    let now = Utc::now().timestamp();
    let record = store.update(name, |record| {
        record.restart_count += 1;
        record.restart_times.push(now);
        record
            .restart_times
            .retain(|ts| now - *ts <= CRASH_LOOP_WINDOW_SECS);
        if record.restart_times.len() > CRASH_LOOP_THRESHOLD {
            record.crash_loop = true;
        }
    })?;
    Ok(record.crash_loop)
}

/// Clears the sticky crash-loop flag, the restart-time window, and the
/// restart counter, the only way any of them are ever reset.
pub fn clear_crash_loop(paths: &Paths, name: &str) -> Result<(), AdaError> {
    let store = StateStore::new(paths);
    store.update(name, |record| {
        record.crash_loop = false;
        record.restart_times.clear();
        record.restart_count = 0;
    })?;
    Ok(())
}

pub fn is_crash_looped(paths: &Paths, name: &str) -> Result<bool, AdaError> {
    let store = StateStore::new(paths);
    Ok(store.load(name)?.crash_loop)
}
