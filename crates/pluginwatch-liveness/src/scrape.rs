// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Archive date extraction from a repository's public page.
//!
//! The API reports that a repository is archived but not when. The page
//! carries a banner such as "This repository has been archived by the owner
//! on Jan 5, 2024. It is now read-only." and newer layouts wrap the date in
//! a `<relative-time datetime="...">` element.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use pluginwatch_core::ArchiveDateExtractor;
use regex::Regex;

static BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)archived by the owner on\s*(?:<[^>]*\bdatetime=.(?P<stamp>[0-9T:\-+.Z]+).[^>]*>|(?P<text>[A-Za-z]{3,9}\.? \d{1,2}, \d{4}|\d{4}-\d{2}-\d{2}))",
    )
    .expect("banner regex is valid")
});

/// Matches the archive banner of the GitHub web UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct BannerDateExtractor;

impl ArchiveDateExtractor for BannerDateExtractor {
    fn extract_archived_date(&self, html: &str) -> Option<NaiveDate> {
        let caps = BANNER.captures(html)?;
        if let Some(stamp) = caps.name("stamp") {
            return parse_stamp(stamp.as_str());
        }
        caps.name("text").and_then(|text| parse_text_date(text.as_str()))
    }
}

fn parse_stamp(stamp: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(stamp)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| parse_text_date(stamp.get(..10)?))
}

fn parse_text_date(text: &str) -> Option<NaiveDate> {
    let text = text.replace('.', "");
    ["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
}
