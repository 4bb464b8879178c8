// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Re-check interval for cached liveness results.

use chrono::{NaiveDate, TimeDelta};

/// Default re-check interval in days.
pub const DEFAULT_RECHECK_DAYS: u32 = 7;

/// True iff `checked_at` is present and less than `interval` old.
pub fn is_fresh(checked_at: Option<NaiveDate>, interval: TimeDelta, now: NaiveDate) -> bool {
    match checked_at {
        Some(checked) => now.signed_duration_since(checked) < interval,
        None => false,
    }
}

/// Decides whether a recorded check may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    interval: TimeDelta,
}

impl StalenessPolicy {
    pub fn new(interval_days: u32) -> Self {
        Self {
            interval: TimeDelta::days(i64::from(interval_days)),
        }
    }

    pub fn interval(&self) -> TimeDelta {
        self.interval
    }

    pub fn is_fresh(&self, checked_at: Option<NaiveDate>, now: NaiveDate) -> bool {
        is_fresh(checked_at, self.interval, now)
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECHECK_DAYS)
    }
}
