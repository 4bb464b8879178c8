// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run statistics and advisories returned by each pass.

use std::fmt;

/// A finding that needs a human decision; never changes state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub plugin: String,
    pub url: String,
    pub reason: AdvisoryReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryReason {
    /// Repository name differs from the plugin name.
    SuspiciousVcs,
    /// Repository URL uses plain `http://`.
    InsecureVcs,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            AdvisoryReason::SuspiciousVcs => {
                write!(f, "{}: repository name does not match ({})", self.plugin, self.url)
            }
            AdvisoryReason::InsecureVcs => {
                write!(f, "{}: obsolete HTTP repository URL ({})", self.plugin, self.url)
            }
        }
    }
}

/// Counters of a liveness or CI run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub skipped: usize,
    pub no_vcs: usize,
    pub archived: usize,
    pub newly_archived: usize,
    pub dead_links: usize,
    pub timeout: usize,
    pub error: usize,
    pub error_urls: Vec<String>,
    pub advisories: Vec<Advisory>,
}

impl RunStats {
    pub(crate) fn record_error(&mut self, url: &str) {
        self.error += 1;
        self.error_urls.push(url.to_string());
    }
}

/// The end-of-run summary.
impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total: {}", self.total)?;
        writeln!(f, "  Skipped: {}", self.skipped)?;
        writeln!(f, "  No VCS: {}", self.no_vcs)?;
        writeln!(f, "  Archived: {}", self.archived)?;
        writeln!(f, "  Timeout error: {}", self.timeout)?;
        writeln!(f, "  Error: {}", self.error)?;
        writeln!(f, "  Error reported URL:")?;
        for url in &self.error_urls {
            writeln!(f, "\t{url}")?;
        }
        Ok(())
    }
}

/// Counters of an index merge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub total: usize,
    pub imported: usize,
    pub updated: usize,
    pub with_note: usize,
    pub with_source: usize,
    pub archived_in_index: usize,
    pub obsolete_in_index: usize,
    pub overridden: usize,
    pub suspicious: usize,
    pub advisories: Vec<Advisory>,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary: {} plugins", self.total)?;
        writeln!(f, "obsolete: {}", self.obsolete_in_index)?;
        writeln!(f, "archived: {}", self.archived_in_index)?;
        writeln!(f, "note: {}", self.with_note)?;
        writeln!(f, "source_code_uri: {}", self.with_source)?;
        writeln!(f, "imported: {}", self.imported)?;
        writeln!(f, "updated: {}", self.updated)?;
        writeln!(f, "overridden: {}", self.overridden)?;
        writeln!(f, "suspicious: {}", self.suspicious)
    }
}
