// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manually curated override lists.
//!
//! Some plugins cannot be classified automatically: their repository moved
//! without a redirect, or the host reports stale metadata. Maintainers pin
//! those in `data/overrides.toml`:
//!
//! ```toml
//! archived = ["fluent-plugin-aliyun-odps"]
//! lost = ["fluent-plugin-seq"]
//! verified = ["fluent-plugin-kinesis"]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use pluginwatch_core::PluginwatchError;
use serde::Deserialize;

/// Which override list names a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKind {
    /// Repository is known to be gone: force `vcs: false`.
    Lost,
    /// Repository is known to be archived.
    Archived,
    /// Repository was checked by hand and is fine as recorded.
    Verified,
}

/// The three named override sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideLists {
    #[serde(default)]
    pub archived: BTreeSet<String>,
    #[serde(default)]
    pub lost: BTreeSet<String>,
    #[serde(default)]
    pub verified: BTreeSet<String>,
}

impl OverrideLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from plain name lists, e.g. the `[overrides]` config section.
    pub fn from_lists(archived: &[String], lost: &[String], verified: &[String]) -> Self {
        Self {
            archived: archived.iter().cloned().collect(),
            lost: lost.iter().cloned().collect(),
            verified: verified.iter().cloned().collect(),
        }
    }

    /// Union of both sets of lists.
    pub fn union(mut self, other: OverrideLists) -> Self {
        self.archived.extend(other.archived);
        self.lost.extend(other.lost);
        self.verified.extend(other.verified);
        self
    }

    /// Look up `name`. Lost wins over archived, archived over verified.
    pub fn classify(&self, name: &str) -> Option<OverrideKind> {
        if self.lost.contains(name) {
            Some(OverrideKind::Lost)
        } else if self.archived.contains(name) {
            Some(OverrideKind::Archived)
        } else if self.verified.contains(name) {
            Some(OverrideKind::Verified)
        } else {
            None
        }
    }

    /// Names listed more than once.
    pub fn overlaps(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut repeated = BTreeSet::new();
        for name in self.archived.iter().chain(&self.lost).chain(&self.verified) {
            if !seen.insert(name) {
                repeated.insert(name.clone());
            }
        }
        repeated.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.archived.len() + self.lost.len() + self.verified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn parse_overrides(content: &str, origin: &str) -> Result<OverrideLists, PluginwatchError> {
    toml::from_str(content).map_err(|e| PluginwatchError::corrupt(origin, e))
}

/// Load override lists. A missing file yields empty lists and a warning.
pub fn load_overrides(path: &Path) -> Result<OverrideLists, PluginwatchError> {
    let shown = path.display().to_string();
    if !path.exists() {
        tracing::warn!(path = %shown, "override lists not found, continuing without them");
        return Ok(OverrideLists::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| PluginwatchError::io(&shown, e))?;
    let lists = parse_overrides(&content, &shown)?;

    for name in lists.overlaps() {
        tracing::warn!(plugin = %name, path = %shown, "plugin appears in more than one override list");
    }
    tracing::debug!(
        path = %shown,
        archived = lists.archived.len(),
        lost = lists.lost.len(),
        verified = lists.verified.len(),
        "override lists loaded"
    );
    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_lists() {
        let lists = parse_overrides(
            "archived = [\"a\"]\nlost = [\"l\"]\nverified = [\"v\", \"w\"]\n",
            "overrides.toml",
        )
        .unwrap();
        assert_eq!(lists.len(), 4);
        assert_eq!(lists.classify("a"), Some(OverrideKind::Archived));
        assert_eq!(lists.classify("l"), Some(OverrideKind::Lost));
        assert_eq!(lists.classify("w"), Some(OverrideKind::Verified));
        assert_eq!(lists.classify("other"), None);
    }

    #[test]
    fn unknown_list_is_corrupt() {
        let err = parse_overrides("unsupported = [\"x\"]\n", "overrides.toml").unwrap_err();
        assert!(matches!(err, PluginwatchError::CorruptData { .. }));
    }

    #[test]
    fn lost_takes_precedence() {
        let lists = OverrideLists::from_lists(
            &["p".to_string()],
            &["p".to_string()],
            &["p".to_string()],
        );
        assert_eq!(lists.classify("p"), Some(OverrideKind::Lost));
        assert_eq!(lists.overlaps(), vec!["p".to_string()]);
    }

    #[test]
    fn union_merges_file_and_config_lists() {
        let file = OverrideLists::from_lists(&["a".to_string()], &[], &[]);
        let config = OverrideLists::from_lists(&[], &["b".to_string()], &[]);
        let merged = file.union(config);
        assert_eq!(merged.classify("a"), Some(OverrideKind::Archived));
        assert_eq!(merged.classify("b"), Some(OverrideKind::Lost));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let lists = load_overrides(&dir.path().join("absent.toml")).unwrap();
        assert!(lists.is_empty());
    }

    #[test]
    fn shipped_lists_parse() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/overrides.toml");
        let lists = load_overrides(&path).unwrap();
        assert_eq!(lists.archived.len(), 3);
        assert_eq!(lists.lost.len(), 20);
        assert_eq!(lists.verified.len(), 25);
        assert_eq!(
            lists.classify("fluent-plugin-grafana-loki"),
            Some(OverrideKind::Lost)
        );
    }
}
