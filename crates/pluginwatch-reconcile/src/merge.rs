// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Index merge pass: fold the upstream plugin index into the registry.
//!
//! Purely local. Known plugins get their index-owned fields refreshed,
//! new plugins are imported, and override lists are applied. No network.

use chrono::NaiveDate;
use pluginwatch_core::{IndexEntry, RepoRef, Vcs};
use pluginwatch_registry::{OverrideLists, Registry};
use tracing::{debug, info};

use crate::classifier::{apply_override, record_from_entry, refresh_from_entry};
use crate::report::{Advisory, AdvisoryReason, MergeStats};
use crate::suspicious::suspicious_vcs;

/// Merge `index` into `registry`, touching every record it names.
pub fn merge_index(
    registry: &mut Registry,
    index: &[IndexEntry],
    overrides: &OverrideLists,
    today: NaiveDate,
) -> MergeStats {
    let mut stats = MergeStats {
        total: index.len(),
        ..MergeStats::default()
    };

    for (position, entry) in index.iter().enumerate() {
        let name = entry.name.as_str();
        debug!(plugin = %name, position = position + 1, total = index.len(), "merging index entry");

        if let Some(note) = entry.note() {
            info!(plugin = %name, note = %note, "index note");
            stats.with_note += 1;
        }
        if let Some(source) = entry.source_code() {
            debug!(plugin = %name, source = %source, "source link available");
            stats.with_source += 1;
        }
        if entry.obsolete().is_some() {
            info!(plugin = %name, "index marks plugin obsolete");
            stats.obsolete_in_index += 1;
        }
        if entry.is_archived() {
            stats.archived_in_index += 1;
        }

        let known = registry.contains(name);
        let mut record = match registry.get(name) {
            Some(existing) => {
                let mut record = existing.clone();
                refresh_from_entry(&mut record, entry);
                record
            }
            None => record_from_entry(entry),
        };
        if entry.is_archived() {
            record.mark_archived(None);
        }

        if let Some(kind) = overrides.classify(name) {
            debug!(plugin = %name, kind = ?kind, "override list applies");
            apply_override(&mut record, kind);
            stats.overridden += 1;
        } else if let Some(homepage) = entry.homepage().filter(|h| RepoRef::parse(h).is_some()) {
            let homepage = homepage.to_string();
            let derived_from_homepage = record.vcs_url() == Some(homepage.as_str());
            if suspicious_vcs(name, &homepage) && (record.vcs.is_none() || derived_from_homepage) {
                info!(plugin = %name, url = %homepage, "homepage repository name does not match plugin");
                stats.suspicious += 1;
                stats.advisories.push(Advisory {
                    plugin: name.to_string(),
                    url: homepage.clone(),
                    reason: AdvisoryReason::SuspiciousVcs,
                });
            } else if record.vcs.is_none() {
                record.vcs = Some(Vcs::Url(homepage));
            }
        }

        record.touch(today);
        if known {
            stats.updated += 1;
            debug!(plugin = %name, "record updated");
        } else {
            stats.imported += 1;
            debug!(plugin = %name, "record imported");
        }
        registry.insert(record);
    }

    info!(
        total = stats.total,
        imported = stats.imported,
        updated = stats.updated,
        suspicious = stats.suspicious,
        "index merged"
    );
    stats
}
