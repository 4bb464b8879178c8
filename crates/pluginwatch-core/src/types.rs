// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model shared by every pluginwatch crate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Host prefixes recognised as hosted-repository links.
const HOSTED_PREFIXES: [&str; 2] = ["https://github.com/", "http://github.com/"];

/// On-disk shape shared by `vcs` and `ci`: either a boolean flag or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum FlagOrText {
    Flag(bool),
    Text(String),
}

/// Version-control location of a plugin.
///
/// An absent `vcs` key means "not checked yet" and is modelled as
/// `Option::<Vcs>::None` on [`PluginRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlagOrText", into = "FlagOrText")]
pub enum Vcs {
    /// Checked, no usable repository (`vcs: false`). Terminal.
    Missing,
    /// Repository URL.
    Url(String),
}

impl TryFrom<FlagOrText> for Vcs {
    type Error = String;

    fn try_from(raw: FlagOrText) -> Result<Self, Self::Error> {
        match raw {
            FlagOrText::Flag(false) => Ok(Vcs::Missing),
            FlagOrText::Flag(true) => Err("`vcs: true` is not a repository URL".to_string()),
            FlagOrText::Text(url) if url.trim().is_empty() => Ok(Vcs::Missing),
            FlagOrText::Text(url) => Ok(Vcs::Url(url)),
        }
    }
}

impl From<Vcs> for FlagOrText {
    fn from(vcs: Vcs) -> Self {
        match vcs {
            Vcs::Missing => FlagOrText::Flag(false),
            Vcs::Url(url) => FlagOrText::Text(url),
        }
    }
}

/// Continuous-integration system detected in a plugin repository.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(try_from = "FlagOrText", into = "FlagOrText")]
pub enum CiSystem {
    #[strum(serialize = "github")]
    Github,
    #[strum(serialize = "circleci")]
    CircleCi,
    #[strum(serialize = "travis")]
    Travis,
    /// Checked, nothing configured (`ci: false`).
    #[strum(serialize = "false")]
    Unconfigured,
}

impl TryFrom<FlagOrText> for CiSystem {
    type Error = String;

    fn try_from(raw: FlagOrText) -> Result<Self, Self::Error> {
        match raw {
            FlagOrText::Flag(false) => Ok(CiSystem::Unconfigured),
            FlagOrText::Flag(true) => Err("`ci: true` does not name a CI system".to_string()),
            FlagOrText::Text(name) => name
                .parse::<CiSystem>()
                .map_err(|_| format!("unknown CI system `{name}`")),
        }
    }
}

impl From<CiSystem> for FlagOrText {
    fn from(ci: CiSystem) -> Self {
        match ci {
            CiSystem::Unconfigured => FlagOrText::Flag(false),
            other => FlagOrText::Text(other.to_string()),
        }
    }
}

/// One entry of the curated registry, keyed by plugin name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginRecord {
    /// Plugin name. Stored as the map key on disk, filled in at load time.
    #[serde(skip)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<Vcs>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci: Option<CiSystem>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<NaiveDate>,

    /// Published reason the plugin is unusable. Older files call it `obsolete`.
    #[serde(default, alias = "obsolete", skip_serializing_if = "Option::is_none")]
    pub obsolete_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDate>,
}

impl PluginRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Repository URL, if one is recorded.
    pub fn vcs_url(&self) -> Option<&str> {
        match &self.vcs {
            Some(Vcs::Url(url)) => Some(url.as_str()),
            _ => None,
        }
    }

    /// True when `vcs` is explicitly `false`.
    pub fn vcs_missing(&self) -> bool {
        matches!(self.vcs, Some(Vcs::Missing))
    }

    /// Non-empty homepage URI.
    pub fn homepage(&self) -> Option<&str> {
        non_empty(self.homepage_uri.as_deref())
    }

    /// Non-empty source-code URI.
    pub fn source_code(&self) -> Option<&str> {
        non_empty(self.source_code_uri.as_deref())
    }

    /// Whether the record has anything that could point at a repository.
    pub fn has_usable_vcs(&self) -> bool {
        match &self.vcs {
            Some(Vcs::Missing) => false,
            Some(Vcs::Url(_)) => true,
            None => self.homepage().is_some() || self.source_code().is_some(),
        }
    }

    /// Record the terminal "no usable repository" fact and forget the CI guess.
    pub fn mark_vcs_missing(&mut self) {
        self.vcs = Some(Vcs::Missing);
        self.ci = None;
    }

    /// Fill `vcs` from the homepage when nothing is recorded yet.
    ///
    /// Returns true when the field changed.
    pub fn backfill_vcs_from_homepage(&mut self) -> bool {
        if self.vcs_url().is_some() {
            return false;
        }
        match self.homepage().map(str::to_string) {
            Some(homepage) => {
                self.vcs = Some(Vcs::Url(homepage));
                true
            }
            None => false,
        }
    }

    /// Set `archived`, keeping any known `archived_at`.
    ///
    /// Returns true when the record was not archived before.
    pub fn mark_archived(&mut self, archived_at: Option<NaiveDate>) -> bool {
        let newly = !self.archived;
        self.archived = true;
        if self.archived_at.is_none() {
            self.archived_at = archived_at;
        }
        newly
    }

    /// Set the obsolescence message only when none exists yet.
    pub fn set_obsolete_message_if_absent(&mut self, message: &str) -> bool {
        if self.obsolete_message.as_deref().is_some_and(|m| !m.trim().is_empty()) {
            return false;
        }
        self.obsolete_message = Some(message.to_string());
        true
    }

    /// Append a sentence to the obsolescence message, or set it when absent.
    ///
    /// A sentence already present is not repeated.
    pub fn append_obsolete_message(&mut self, sentence: &str) -> bool {
        match self.obsolete_message.as_mut() {
            Some(existing) if !existing.trim().is_empty() => {
                if existing.contains(sentence) {
                    return false;
                }
                let trimmed_len = existing.trim_end().len();
                existing.truncate(trimmed_len);
                existing.push('\n');
                existing.push_str(sentence);
                true
            }
            _ => {
                self.obsolete_message = Some(sentence.to_string());
                true
            }
        }
    }

    /// Move `checked_at` forward to `date`; never backwards.
    pub fn record_check(&mut self, date: NaiveDate) {
        self.checked_at = Some(self.checked_at.map_or(date, |prev| prev.max(date)));
    }

    pub fn touch(&mut self, today: NaiveDate) {
        self.updated_at = Some(self.updated_at.map_or(today, |prev| prev.max(today)));
    }
}

/// One plugin object from the upstream plugin index (`plugins.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Empty when the feed omits it; such entries are skipped on load.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub homepage_uri: Option<String>,
    #[serde(default)]
    pub source_code_uri: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub note: Option<String>,
    /// Upstream obsolescence notice, when the index carries one.
    #[serde(default)]
    pub obsolete: Option<String>,
    #[serde(default)]
    pub downloads: Option<u64>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl IndexEntry {
    pub fn is_archived(&self) -> bool {
        self.archived.unwrap_or(false)
    }

    pub fn homepage(&self) -> Option<&str> {
        non_empty(self.homepage_uri.as_deref())
    }

    pub fn source_code(&self) -> Option<&str> {
        non_empty(self.source_code_uri.as_deref())
    }

    pub fn note(&self) -> Option<&str> {
        non_empty(self.note.as_deref())
    }

    pub fn obsolete(&self) -> Option<&str> {
        non_empty(self.obsolete.as_deref())
    }
}

/// `owner/repo` reference into the repository host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    /// The URL used plain `http://`.
    pub insecure: bool,
}

impl RepoRef {
    /// Parse a hosted-repository URL such as `https://github.com/owner/repo.git`.
    ///
    /// Returns `None` for any URL outside the known host.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        let (prefix, rest) = HOSTED_PREFIXES
            .iter()
            .find_map(|prefix| url.strip_prefix(prefix).map(|rest| (*prefix, rest)))?;

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let mut segments = rest.split('/').filter(|segment| !segment.is_empty());
        let owner = segments.next()?;
        let repo = segments.next()?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if repo.is_empty() {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            insecure: prefix.starts_with("http://"),
        })
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Authoritative repository metadata from the host API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoMetadata {
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outcome of a single bounded-time liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Reachable,
    /// The server answered with a non-success status.
    Status(u16),
    Timeout,
    /// Transport failure or unusable URL.
    Failed(String),
}

impl Probe {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Probe::Reachable)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn vcs_false_deserializes_as_missing() {
        let record: PluginRecord = serde_yaml::from_str("vcs: false\n").unwrap();
        assert_eq!(record.vcs, Some(Vcs::Missing));
        assert!(record.vcs_missing());
    }

    #[test]
    fn vcs_true_is_rejected() {
        let result: Result<PluginRecord, _> = serde_yaml::from_str("vcs: true\n");
        assert!(result.is_err());
    }

    #[test]
    fn vcs_url_roundtrips_through_yaml() {
        let mut record = PluginRecord::new("fluent-plugin-foo");
        record.vcs = Some(Vcs::Url("https://github.com/a/fluent-plugin-foo".into()));
        record.ci = Some(CiSystem::Unconfigured);
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert!(yaml.contains("vcs: https://github.com/a/fluent-plugin-foo"));
        assert!(yaml.contains("ci: false"));

        let mut parsed: PluginRecord = serde_yaml::from_str(&yaml).unwrap();
        parsed.name = record.name.clone();
        assert_eq!(parsed, record);
    }

    #[test]
    fn ci_names_parse() {
        let record: PluginRecord = serde_json::from_str(r#"{"ci": "circleci"}"#).unwrap();
        assert_eq!(record.ci, Some(CiSystem::CircleCi));
        let bad: Result<PluginRecord, _> = serde_json::from_str(r#"{"ci": "jenkins"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn unknown_record_keys_are_rejected() {
        let result: Result<PluginRecord, _> = serde_yaml::from_str("vsc: false\n");
        assert!(result.is_err());
    }

    #[test]
    fn legacy_obsolete_key_is_accepted() {
        let record: PluginRecord = serde_yaml::from_str("obsolete: gone\n").unwrap();
        assert_eq!(record.obsolete_message.as_deref(), Some("gone"));
    }

    #[test]
    fn dates_use_iso_format() {
        let record: PluginRecord =
            serde_yaml::from_str("checked_at: '2025-06-13'\narchived: true\n").unwrap();
        assert_eq!(record.checked_at, Some(date("2025-06-13")));
        assert!(record.archived);
    }

    #[test]
    fn append_keeps_original_message() {
        let mut record = PluginRecord::new("p");
        record.obsolete_message = Some("Unmaintained since 2023-05-01.".into());
        assert!(record.append_obsolete_message("Unmaintained since 2024-01-01."));
        let message = record.obsolete_message.unwrap();
        assert!(message.starts_with("Unmaintained since 2023-05-01."));
        assert!(message.ends_with("Unmaintained since 2024-01-01."));
    }

    #[test]
    fn append_does_not_repeat_sentence() {
        let mut record = PluginRecord::new("p");
        record.obsolete_message = Some("Unmaintained since 2023-05-01.".into());
        assert!(!record.append_obsolete_message("Unmaintained since 2023-05-01."));
        assert_eq!(
            record.obsolete_message.as_deref(),
            Some("Unmaintained since 2023-05-01.")
        );
    }

    #[test]
    fn set_if_absent_leaves_existing_message() {
        let mut record = PluginRecord::new("p");
        assert!(record.set_obsolete_message_if_absent("first"));
        assert!(!record.set_obsolete_message_if_absent("second"));
        assert_eq!(record.obsolete_message.as_deref(), Some("first"));
    }

    #[test]
    fn record_check_never_moves_backwards() {
        let mut record = PluginRecord::new("p");
        record.record_check(date("2025-06-13"));
        record.record_check(date("2025-01-01"));
        assert_eq!(record.checked_at, Some(date("2025-06-13")));
    }

    #[test]
    fn mark_vcs_missing_clears_ci() {
        let mut record = PluginRecord::new("p");
        record.vcs = Some(Vcs::Url("https://github.com/a/b".into()));
        record.ci = Some(CiSystem::Travis);
        record.mark_vcs_missing();
        assert!(record.vcs_missing());
        assert!(record.ci.is_none());
    }

    #[test]
    fn backfill_uses_homepage_only_when_vcs_unset() {
        let mut record = PluginRecord::new("p");
        record.homepage_uri = Some("https://github.com/a/p".into());
        assert!(record.backfill_vcs_from_homepage());
        assert_eq!(record.vcs_url(), Some("https://github.com/a/p"));

        record.homepage_uri = Some("https://example.com".into());
        assert!(!record.backfill_vcs_from_homepage());
        assert_eq!(record.vcs_url(), Some("https://github.com/a/p"));
    }

    #[test]
    fn repo_ref_parses_hosted_urls() {
        let repo = RepoRef::parse("https://github.com/bar/fluent-plugin-foo.git").unwrap();
        assert_eq!(repo.slug(), "bar/fluent-plugin-foo");
        assert!(!repo.insecure);

        let repo = RepoRef::parse("http://github.com/bar/baz/").unwrap();
        assert_eq!(repo.slug(), "bar/baz");
        assert!(repo.insecure);

        let repo = RepoRef::parse("https://github.com/bar/baz/tree/master").unwrap();
        assert_eq!(repo.slug(), "bar/baz");
    }

    #[test]
    fn repo_ref_rejects_other_hosts() {
        assert!(RepoRef::parse("https://gitlab.com/a/b").is_none());
        assert!(RepoRef::parse("https://github.com/only-owner").is_none());
        assert!(RepoRef::parse("").is_none());
    }

    #[test]
    fn index_entry_tolerates_nulls_and_extra_keys() {
        let entry: IndexEntry = serde_json::from_str(
            r#"{"name":"fluent-plugin-x","homepage_uri":null,"archived":null,"downloads":12,"extra":1}"#,
        )
        .unwrap();
        assert_eq!(entry.name, "fluent-plugin-x");
        assert!(!entry.is_archived());
        assert!(entry.homepage().is_none());
        assert_eq!(entry.downloads, Some(12));
    }

    #[test]
    fn usable_vcs_considers_uris_when_unchecked() {
        let mut record = PluginRecord::new("p");
        assert!(!record.has_usable_vcs());
        record.source_code_uri = Some("https://example.com/src".into());
        assert!(record.has_usable_vcs());
        record.vcs = Some(Vcs::Missing);
        assert!(!record.has_usable_vcs());
    }
}
