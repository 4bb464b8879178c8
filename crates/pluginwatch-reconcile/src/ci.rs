// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CI detection pass.

use chrono::NaiveDate;
use pluginwatch_core::{RepoHost, RepoRef};
use pluginwatch_registry::Registry;
use tracing::{debug, info, warn};

use crate::report::RunStats;
use crate::staleness::StalenessPolicy;

/// Ask the host which CI system each stale, hosted plugin uses.
///
/// Records past `max_records` are copied through unchanged. A timeout drops
/// the repository URL; other host errors leave the record as it was.
pub async fn detect_ci_pass(
    registry: &Registry,
    host: &dyn RepoHost,
    policy: &StalenessPolicy,
    max_records: Option<usize>,
    today: NaiveDate,
) -> (Registry, RunStats) {
    let mut stats = RunStats::default();
    let mut output = registry.clone();
    let limit = max_records.unwrap_or(usize::MAX);

    for record in registry.iter().take(limit) {
        stats.total += 1;
        let name = record.name.as_str();

        if policy.is_fresh(record.checked_at, today) {
            debug!(plugin = %name, checked_at = ?record.checked_at, "recently checked, skipping");
            stats.skipped += 1;
            continue;
        }
        let Some(url) = record.vcs_url() else {
            info!(plugin = %name, "no repository, skipping");
            stats.no_vcs += 1;
            continue;
        };
        let Some(repo) = RepoRef::parse(url) else {
            debug!(plugin = %name, url = %url, "repository host not supported, skipping");
            stats.skipped += 1;
            continue;
        };

        let mut updated = record.clone();
        match host.detect_ci(&repo).await {
            Ok(ci) => {
                info!(plugin = %name, ci = %ci, "CI detected");
                updated.ci = Some(ci);
                updated.record_check(today);
                updated.touch(today);
            }
            Err(error) if error.is_timeout() => {
                info!(plugin = %name, url = %url, "repository timed out, dropping URL");
                updated.mark_vcs_missing();
                updated.touch(today);
                stats.timeout += 1;
            }
            Err(error) => {
                warn!(plugin = %name, url = %url, error = %error, "CI detection failed");
                stats.record_error(url);
            }
        }
        if updated.archived {
            stats.archived += 1;
        }
        output.insert(updated);
    }

    (output, stats)
}
