// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Archive-date extraction from repository pages.

use chrono::NaiveDate;

/// Pulls the archival date out of a repository's HTML page.
pub trait ArchiveDateExtractor: Send + Sync {
    fn extract_archived_date(&self, html: &str) -> Option<NaiveDate>;
}
