//! Poll scheduling against the feed's 5-minute refresh cadence.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Length of one feed refresh window, in milliseconds.
pub const REFRESH_WINDOW_MS: i64 = 300_000;

/// Target wake-up offset past each refresh boundary, in milliseconds. Late
/// enough in the window that the feed has settled its latest values, with
/// slack left before the next boundary.
pub const POLL_OFFSET_MS: i64 = 240_000;

/// Computes how long to sleep so the next wake-up lands [`POLL_OFFSET_MS`]
/// past a 5-minute wall-clock boundary.
///
/// Recomputed from absolute time each cycle, so drift from slow fetches or
/// coarse sleeps never accumulates. The result is always between zero and
/// one full refresh window.
pub fn time_until_next_poll(now: DateTime<Utc>) -> Duration {
    let mut remainder = now.timestamp_millis().rem_euclid(REFRESH_WINDOW_MS);
    if remainder > POLL_OFFSET_MS {
        // Already past this window's target; aim for the next window instead
        // of waiting almost a full extra cycle.
        remainder -= REFRESH_WINDOW_MS;
    }
    Duration::from_millis((POLL_OFFSET_MS - remainder) as u64)
}
