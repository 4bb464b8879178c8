// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch driver for the liveness and archival check.
//!
//! Plugins are processed one at a time in name order. The run returns a new
//! registry and never writes files itself; persisting the result once at the
//! end is the caller's job.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use pluginwatch_core::IndexEntry;
use pluginwatch_registry::Registry;
use tracing::{debug, info};

use crate::classifier::Reconciler;
use crate::report::RunStats;
use crate::staleness::StalenessPolicy;

/// Pause after a newly detected archival when none is configured.
pub const DEFAULT_ARCHIVE_BACKOFF: Duration = Duration::from_secs(10);

pub struct BatchDriver {
    reconciler: Reconciler,
    policy: StalenessPolicy,
    max_records: Option<usize>,
    archive_backoff: Duration,
}

impl BatchDriver {
    pub fn new(reconciler: Reconciler, policy: StalenessPolicy) -> Self {
        Self {
            reconciler,
            policy,
            max_records: None,
            archive_backoff: DEFAULT_ARCHIVE_BACKOFF,
        }
    }

    /// Process at most `max` records; the rest are copied through.
    pub fn max_records(mut self, max: Option<usize>) -> Self {
        self.max_records = max;
        self
    }

    pub fn archive_backoff(mut self, backoff: Duration) -> Self {
        self.archive_backoff = backoff;
        self
    }

    /// Check every stale record of `registry` against the host.
    ///
    /// `index` supplies the upstream archived flag and refreshed links for
    /// plugins it names; it may be empty.
    pub async fn run(
        &self,
        registry: &Registry,
        index: &[IndexEntry],
        today: NaiveDate,
    ) -> (Registry, RunStats) {
        let entries: BTreeMap<&str, &IndexEntry> =
            index.iter().map(|e| (e.name.as_str(), e)).collect();
        let limit = self.max_records.unwrap_or(usize::MAX);
        let planned = registry.len().min(limit);

        let mut stats = RunStats::default();
        let mut output = registry.clone();
        info!(host = %self.reconciler.host().name(), planned, "starting liveness check");

        for (position, record) in registry.iter().take(limit).enumerate() {
            stats.total += 1;
            let name = record.name.as_str();

            if self.policy.is_fresh(record.checked_at, today) {
                debug!(plugin = %name, checked_at = ?record.checked_at, "already checked");
                stats.skipped += 1;
                continue;
            }

            info!(plugin = %name, position = position + 1, total = planned, "checking");
            let outcome = self
                .reconciler
                .classify(name, Some(record), entries.get(name).copied(), today)
                .await;

            if outcome.no_vcs {
                stats.no_vcs += 1;
            }
            if outcome.archived {
                stats.archived += 1;
            }
            if outcome.newly_archived {
                stats.newly_archived += 1;
            }
            if outcome.dead_link {
                stats.dead_links += 1;
            }
            if outcome.timed_out() {
                stats.timeout += 1;
            }
            if outcome.failed() {
                stats.error += 1;
                stats
                    .error_urls
                    .extend(outcome.failures.iter().map(|f| f.url.clone()));
            }
            stats.advisories.extend(outcome.advisories.iter().cloned());

            let newly_archived = outcome.newly_archived;
            output.insert(outcome.record);

            if newly_archived && !self.archive_backoff.is_zero() {
                debug!(backoff = ?self.archive_backoff, "pausing after archival");
                tokio::time::sleep(self.archive_backoff).await;
            }
        }

        info!(
            total = stats.total,
            skipped = stats.skipped,
            archived = stats.archived,
            errors = stats.error,
            "check finished"
        );
        (output, stats)
    }
}
