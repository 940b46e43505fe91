use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

/// Last id handed out in this process, in epoch milliseconds.
static LAST_ISSUED: AtomicU64 = AtomicU64::new(0);

/// Generate a recording id from the current epoch milliseconds.
///
/// Ids are strictly increasing within the process: two calls in the same
/// millisecond (or across a backwards clock step) yield `last + 1`.
pub fn next_recording_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0);

    let previous = LAST_ISSUED
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);

    now.max(previous.saturating_add(1)).to_string()
}
