// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Location of the published plugin index.
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/fluent/fluentd-website/refs/heads/master/scripts/plugins.json";

/// Top-level pluginwatch configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginwatchConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Data file locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Upstream plugin index.
    #[serde(default)]
    pub index: IndexConfig,

    /// Re-check cadence and per-call budgets.
    #[serde(default)]
    pub checks: ChecksConfig,

    /// Repository host API.
    #[serde(default)]
    pub host: HostConfig,

    /// Manual classification lists, merged with `paths.overrides`.
    #[serde(default)]
    pub overrides: OverridesConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `info` or `debug`. Anything else is treated as `info`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Data file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Cached copy of the upstream index (JSON array).
    #[serde(default = "default_index_path")]
    pub index: String,

    /// Curated registry (`checked.yml`).
    #[serde(default = "default_registry_path")]
    pub registry: String,

    /// Published obsolete-plugins ledger.
    #[serde(default = "default_obsolete_path")]
    pub obsolete: String,

    /// Override lists file. `None` disables the file and uses only `[overrides]`.
    #[serde(default = "default_overrides_path")]
    pub overrides: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            index: default_index_path(),
            registry: default_registry_path(),
            obsolete: default_obsolete_path(),
            overrides: default_overrides_path(),
        }
    }
}

fn default_index_path() -> String {
    "data/plugins.json".to_string()
}

fn default_registry_path() -> String {
    "data/checked.yml".to_string()
}

fn default_obsolete_path() -> String {
    "data/obsolete-plugins.yml".to_string()
}

fn default_overrides_path() -> Option<String> {
    Some("data/overrides.toml".to_string())
}

/// Upstream plugin index settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Where to download the index from when no local copy exists.
    #[serde(default = "default_index_url")]
    pub url: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
        }
    }
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}

/// Re-check cadence and network budgets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksConfig {
    /// Records checked more recently than this are skipped.
    #[serde(default = "default_recheck_interval_days")]
    pub recheck_interval_days: u32,

    /// Hard budget for a single network call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause after a newly detected archival.
    #[serde(default = "default_archive_backoff_secs")]
    pub archive_backoff_secs: u64,

    /// Suppress the missing-VCS message.
    #[serde(default)]
    pub strict: bool,

    /// Process at most this many records per run.
    #[serde(default)]
    pub max_records: Option<usize>,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            recheck_interval_days: default_recheck_interval_days(),
            timeout_secs: default_timeout_secs(),
            archive_backoff_secs: default_archive_backoff_secs(),
            strict: false,
            max_records: None,
        }
    }
}

fn default_recheck_interval_days() -> u32 {
    7
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_archive_backoff_secs() -> u64 {
    10
}

/// Repository host (GitHub) settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_web_base")]
    pub web_base: String,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            web_base: default_web_base(),
            token_env: default_token_env(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_web_base() -> String {
    "https://github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_ACCESS_TOKEN".to_string()
}

/// Manual classification lists.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OverridesConfig {
    /// Known archived even though the host does not say so.
    #[serde(default)]
    pub archived: Vec<String>,

    /// Repository lost for good; forces `vcs: false`.
    #[serde(default)]
    pub lost: Vec<String>,

    /// Manually verified; left untouched apart from a `vcs` backfill.
    #[serde(default)]
    pub verified: Vec<String>,
}
