// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-plugin classification.
//!
//! [`Reconciler::classify`] takes one plugin's existing record and its
//! upstream index entry and produces the updated record. Manual overrides
//! are applied first and end classification. Otherwise three independent
//! checks run in order: archival, missing repository, dead links.
//!
//! Host failures are contained here. A timeout on the repository URL marks
//! the plugin as having no usable repository; any other host error leaves
//! the record as it was and is reported in [`Classification::failures`].

use std::sync::Arc;

use chrono::NaiveDate;
use pluginwatch_core::messages::{GONE_AWAY, homepage_inaccessible, unmaintained_since};
use pluginwatch_core::{
    ArchiveDateExtractor, HostError, IndexEntry, LinkProbe, PluginRecord, PluginwatchError, Probe,
    RepoHost, RepoRef, Vcs,
};
use pluginwatch_registry::{OverrideKind, OverrideLists};
use tracing::{debug, info, warn};

use crate::report::{Advisory, AdvisoryReason};

/// A host error attributed to the URL that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFailure {
    pub url: String,
    pub error: HostError,
}

/// Result of classifying one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub record: PluginRecord,
    /// Override list that decided the outcome, if any.
    pub override_applied: Option<OverrideKind>,
    pub archived: bool,
    /// Archived by this classification.
    pub newly_archived: bool,
    /// No usable repository after classification.
    pub no_vcs: bool,
    /// All links failed and the dead-link message was set.
    pub dead_link: bool,
    /// The repository lookup timed out and the URL was dropped.
    pub vcs_timeout: bool,
    /// Link checks that timed out.
    pub link_timeouts: usize,
    pub failures: Vec<HostFailure>,
    pub advisories: Vec<Advisory>,
}

impl Classification {
    fn new(record: PluginRecord) -> Self {
        Self {
            record,
            override_applied: None,
            archived: false,
            newly_archived: false,
            no_vcs: false,
            dead_link: false,
            vcs_timeout: false,
            link_timeouts: 0,
            failures: Vec::new(),
            advisories: Vec::new(),
        }
    }

    pub fn timed_out(&self) -> bool {
        self.vcs_timeout || self.link_timeouts > 0
    }

    pub fn failed(&self) -> bool {
        !self.failures.is_empty()
    }
}

enum LinkState {
    Alive,
    Dead,
    /// The host could not answer; no conclusion.
    Unknown,
}

/// Applies the classification rules with injected collaborators.
pub struct Reconciler {
    host: Arc<dyn RepoHost>,
    probe: Arc<dyn LinkProbe>,
    extractor: Arc<dyn ArchiveDateExtractor>,
    overrides: OverrideLists,
    strict: bool,
}

impl Reconciler {
    pub fn new(
        host: Arc<dyn RepoHost>,
        probe: Arc<dyn LinkProbe>,
        extractor: Arc<dyn ArchiveDateExtractor>,
    ) -> Self {
        Self {
            host,
            probe,
            extractor,
            overrides: OverrideLists::default(),
            strict: false,
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideLists) -> Self {
        self.overrides = overrides;
        self
    }

    /// Strict mode never adds the missing-repository message.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn overrides(&self) -> &OverrideLists {
        &self.overrides
    }

    pub fn host(&self) -> &dyn RepoHost {
        self.host.as_ref()
    }

    /// Classify one plugin. Never fails; problems are reported in the result.
    pub async fn classify(
        &self,
        name: &str,
        existing: Option<&PluginRecord>,
        entry: Option<&IndexEntry>,
        today: NaiveDate,
    ) -> Classification {
        let mut record = match (existing, entry) {
            (Some(record), Some(entry)) => {
                let mut record = record.clone();
                refresh_from_entry(&mut record, entry);
                record
            }
            (Some(record), None) => record.clone(),
            (None, Some(entry)) => record_from_entry(entry),
            (None, None) => PluginRecord::new(name),
        };
        record.name = name.to_string();

        if let Some(kind) = self.overrides.classify(name) {
            debug!(plugin = %name, kind = ?kind, "override list applies");
            apply_override(&mut record, kind);
            record.touch(today);
            let mut out = Classification::new(record);
            out.override_applied = Some(kind);
            out.archived = out.record.archived;
            out.no_vcs = out.record.vcs_missing();
            return out;
        }

        let before = record.clone();
        let mut out = Classification::new(PluginRecord::default());

        // Archival: upstream flag or host metadata.
        let mut answered: Option<RepoRef> = None;
        let mut host_archived = false;
        if !record.archived {
            if let Some(url) = record.vcs_url().map(str::to_string) {
                match RepoRef::parse(&url) {
                    Some(repo) => {
                        if repo.insecure {
                            warn!(plugin = %name, url = %url, "obsolete HTTP repository URL");
                            out.advisories.push(Advisory {
                                plugin: name.to_string(),
                                url: url.clone(),
                                reason: AdvisoryReason::InsecureVcs,
                            });
                        }
                        match self.host.repository(&repo).await {
                            Ok(meta) => {
                                host_archived = meta.archived;
                                if meta.archived {
                                    info!(
                                        plugin = %name,
                                        pushed_at = ?meta.pushed_at,
                                        updated_at = ?meta.updated_at,
                                        "host reports repository archived"
                                    );
                                }
                                answered = Some(repo);
                            }
                            Err(error) if error.is_timeout() => {
                                info!(plugin = %name, url = %url, "repository lookup timed out, dropping URL");
                                record.mark_vcs_missing();
                                out.vcs_timeout = true;
                            }
                            Err(error) => {
                                warn!(plugin = %name, url = %url, error = %error, "repository lookup failed");
                                out.failures.push(HostFailure { url, error });
                                out.archived = before.archived;
                                out.no_vcs = !before.has_usable_vcs();
                                out.record = before;
                                return out;
                            }
                        }
                    }
                    None => debug!(plugin = %name, url = %url, "repository URL is not on a supported host"),
                }
            }
        }

        let upstream_archived = entry.is_some_and(IndexEntry::is_archived);
        if upstream_archived || host_archived {
            let archived_at = match record.archived_at {
                Some(date) => Some(date),
                None => self.archive_date(&record).await,
            };
            out.newly_archived = record.mark_archived(archived_at);
            let sentence = unmaintained_since(record.archived_at);
            if record.append_obsolete_message(&sentence) {
                warn!(plugin = %name, message = %sentence, "plugin is archived");
            }
        }

        // Missing repository.
        if !record.has_usable_vcs() {
            out.no_vcs = true;
            if !self.strict && record.set_obsolete_message_if_absent(GONE_AWAY) {
                warn!(plugin = %name, "repository is missing");
            }
        }

        // Dead links, only while nothing explains the plugin yet.
        let unexplained = record
            .obsolete_message
            .as_deref()
            .is_none_or(|m| m.trim().is_empty());
        if unexplained && (record.source_code().is_some() || record.homepage().is_some()) {
            if let LinkState::Dead = self.links_state(&record, answered.as_ref(), &mut out).await {
                let uri = record
                    .homepage()
                    .or(record.source_code())
                    .unwrap_or_default()
                    .to_string();
                warn!(plugin = %name, uri = %uri, "all links are dead");
                record.obsolete_message = Some(homepage_inaccessible(&uri));
                out.dead_link = true;
            }
        }

        // A timed-out lookup is retried on the next run.
        if out.failures.is_empty() && !out.vcs_timeout {
            record.record_check(today);
        }
        record.touch(today);
        out.archived = record.archived;
        out.record = record;
        out
    }

    /// Scrape the archive date from the repository page. Failures are logged.
    async fn archive_date(&self, record: &PluginRecord) -> Option<NaiveDate> {
        let url = record.vcs_url()?;
        let repo = RepoRef::parse(url)?;
        let scrape_failure = PluginwatchError::ScrapeExtractionFailure {
            url: url.to_string(),
        };
        match self.host.repository_page(&repo).await {
            Ok(html) => {
                let date = self.extractor.extract_archived_date(&html);
                if date.is_none() {
                    warn!(plugin = %record.name, error = %scrape_failure, "archive banner not found");
                }
                date
            }
            Err(error) => {
                warn!(plugin = %record.name, error = %scrape_failure, cause = %error, "repository page unavailable");
                None
            }
        }
    }

    /// Source link first, then the homepage; alive as soon as one answers.
    async fn links_state(
        &self,
        record: &PluginRecord,
        answered: Option<&RepoRef>,
        out: &mut Classification,
    ) -> LinkState {
        let mut state = LinkState::Dead;
        for url in [record.source_code(), record.homepage()].into_iter().flatten() {
            match self.link_state(url, answered, out).await {
                LinkState::Alive => return LinkState::Alive,
                LinkState::Unknown => state = LinkState::Unknown,
                LinkState::Dead => {}
            }
        }
        state
    }

    async fn link_state(
        &self,
        url: &str,
        answered: Option<&RepoRef>,
        out: &mut Classification,
    ) -> LinkState {
        if let Some(repo) = RepoRef::parse(url) {
            if answered.is_some_and(|seen| seen.slug() == repo.slug()) {
                return LinkState::Alive;
            }
            return match self.host.repository(&repo).await {
                Ok(_) => LinkState::Alive,
                Err(HostError::NotFound { .. }) => LinkState::Dead,
                Err(error) if error.is_timeout() => {
                    out.link_timeouts += 1;
                    LinkState::Dead
                }
                Err(error) => {
                    warn!(url = %url, error = %error, "link lookup failed");
                    out.failures.push(HostFailure {
                        url: url.to_string(),
                        error,
                    });
                    LinkState::Unknown
                }
            };
        }

        match self.probe.probe(url).await {
            Probe::Reachable => LinkState::Alive,
            Probe::Timeout => {
                out.link_timeouts += 1;
                LinkState::Dead
            }
            Probe::Status(code) => {
                debug!(url = %url, status = code, "link answered with an error status");
                LinkState::Dead
            }
            Probe::Failed(reason) => {
                debug!(url = %url, reason = %reason, "link unreachable");
                LinkState::Dead
            }
        }
    }
}

/// Apply a manual override to a record.
pub fn apply_override(record: &mut PluginRecord, kind: OverrideKind) {
    match kind {
        OverrideKind::Lost => record.mark_vcs_missing(),
        OverrideKind::Archived => {
            record.mark_archived(None);
            record.backfill_vcs_from_homepage();
        }
        OverrideKind::Verified => {
            record.backfill_vcs_from_homepage();
        }
    }
}

/// Build a record for a plugin seen in the index for the first time.
///
/// The repository is the source link when present, else a hosted homepage.
/// With neither a source link nor a homepage the plugin has no repository.
/// The upstream archived flag is left for the caller to fold in.
pub fn record_from_entry(entry: &IndexEntry) -> PluginRecord {
    let mut record = PluginRecord::new(entry.name.as_str());
    record.homepage_uri = entry.homepage_uri.clone();
    record.source_code_uri = entry.source_code_uri.clone();
    record.note = entry.note().map(str::to_string);
    record.obsolete_message = entry.obsolete().map(str::to_string);
    record.vcs = match (entry.source_code(), entry.homepage()) {
        (Some(source), _) => Some(Vcs::Url(source.to_string())),
        (None, Some(homepage)) if RepoRef::parse(homepage).is_some() => {
            Some(Vcs::Url(homepage.to_string()))
        }
        (None, Some(_)) => None,
        (None, None) => Some(Vcs::Missing),
    };
    record
}

/// Refresh the index-owned fields of a known record.
pub fn refresh_from_entry(record: &mut PluginRecord, entry: &IndexEntry) {
    if entry.homepage_uri.is_some() {
        record.homepage_uri = entry.homepage_uri.clone();
    }
    if entry.source_code_uri.is_some() {
        record.source_code_uri = entry.source_code_uri.clone();
    }
    if let Some(note) = entry.note() {
        record.note = Some(note.to_string());
    }
    if let Some(obsolete) = entry.obsolete() {
        record.append_obsolete_message(obsolete);
    }
}
