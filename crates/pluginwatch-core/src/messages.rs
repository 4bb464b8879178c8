// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Published obsolescence sentences.

use chrono::NaiveDate;

/// Message for a plugin without any usable repository.
pub const GONE_AWAY: &str = "Git repository has gone away.";

/// Message for an archived repository.
///
/// Without a known archive date the sentence omits it.
pub fn unmaintained_since(archived_at: Option<NaiveDate>) -> String {
    match archived_at {
        Some(date) => format!("Unmaintained since {}.", date.format("%Y-%m-%d")),
        None => "Unmaintained: the repository has been archived.".to_string(),
    }
}

/// Message for a plugin whose links are all dead.
pub fn homepage_inaccessible(uri: &str) -> String {
    format!("Given homepage URI ({uri}) was inaccessible. Only gem is available.")
}
