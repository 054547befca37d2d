// SPDX-License-Identifier: MPL-2.0
//! Wall-clock adapter.

use crate::application::port::Clock;

/// System time in epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Converts a filesystem timestamp to epoch milliseconds.
#[must_use]
pub fn system_time_millis(time: std::time::SystemTime) -> i64 {
    chrono::DateTime::<chrono::Utc>::from(time).timestamp_millis()
}
