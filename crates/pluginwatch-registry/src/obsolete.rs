// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Obsolete-plugins ledger: plugin name to published reason.
//!
//! The file is written in a fixed block-literal layout so that multi-line
//! reasons stay readable in review:
//!
//! ```text
//! ---
//! fluent-plugin-foo: |+
//!   Unmaintained since 2023-05-01.
//!   Use fluent-plugin-bar instead.
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use pluginwatch_core::messages::{GONE_AWAY, unmaintained_since};
use pluginwatch_core::PluginwatchError;

use crate::atomic::write_atomic;
use crate::store::Registry;

/// Mapping of plugin name to a (possibly multi-line) obsolescence reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObsoleteLedger {
    entries: BTreeMap<String, String>,
}

/// What [`merge_from_registry`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerMergeStats {
    /// Entries created for plugins not in the ledger before.
    pub added: usize,
    /// Sentences appended to existing entries.
    pub appended: usize,
    /// Entries created with the missing-repository message.
    pub gone_away: usize,
    /// Archived plugins whose sentence was added or appended.
    pub unmaintained: usize,
}

impl ObsoleteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Set the reason for `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.entries.insert(name.into(), reason.into());
    }

    /// Add `sentence` to the entry for `name` on its own line.
    ///
    /// Creates the entry when absent. Returns false when the entry already
    /// contains the sentence.
    pub fn append(&mut self, name: &str, sentence: &str) -> bool {
        match self.entries.get_mut(name) {
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
                self.entries.insert(name.to_string(), sentence.to_string());
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for ObsoleteLedger {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Render the ledger in the block-literal layout, sorted by name.
pub fn render(ledger: &ObsoleteLedger) -> String {
    let mut out = String::from("---\n");
    for (name, reason) in ledger.iter() {
        out.push_str(name);
        out.push_str(": |+\n");
        for line in reason.trim().split('\n') {
            let line = line.trim_end();
            if !line.is_empty() {
                out.push_str("  ");
                out.push_str(line);
            }
            out.push('\n');
        }
    }
    out
}

/// Parse ledger text. `origin` names the source in error messages.
///
/// The block layout written by [`render`] and plain `name: reason` lines are
/// read directly; anything else goes through a generic YAML map parse.
pub fn parse(text: &str, origin: &str) -> Result<ObsoleteLedger, PluginwatchError> {
    match parse_blocks(text) {
        Ok(Some(entries)) => Ok(ObsoleteLedger { entries }),
        Ok(None) => parse_generic(text, origin),
        Err(reason) => Err(PluginwatchError::corrupt(origin, reason)),
    }
}

fn parse_generic(text: &str, origin: &str) -> Result<ObsoleteLedger, PluginwatchError> {
    tracing::debug!(path = %origin, "obsolete ledger is not in block layout, parsing as YAML");
    let raw: BTreeMap<String, Option<String>> =
        serde_yaml::from_str(text).map_err(|e| PluginwatchError::corrupt(origin, e))?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, reason)| reason.map(|r| (name, r.trim_end().to_string())))
        .collect())
}

/// Line-oriented reader for the block layout.
///
/// `Ok(None)` means the text uses YAML features outside that layout.
fn parse_blocks(text: &str) -> Result<Option<BTreeMap<String, String>>, String> {
    let mut entries = BTreeMap::new();
    let mut open: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if open.is_some() && (line.starts_with(' ') || line.trim().is_empty()) {
            if let Some((_, body)) = open.as_mut() {
                body.push(line);
            }
            continue;
        }
        if let Some((name, body)) = open.take() {
            insert_unique(&mut entries, name, close_block(&body))?;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" || trimmed == "..." {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            return Ok(None);
        }

        let Some((key, rest)) = split_key(line) else {
            return Ok(None);
        };
        let rest = rest.trim();
        if rest.starts_with('|') {
            open = Some((key.to_string(), Vec::new()));
            continue;
        }
        match plain_scalar(rest) {
            Some(value) => insert_unique(&mut entries, key.to_string(), value)?,
            None => return Ok(None),
        }
    }
    if let Some((name, body)) = open.take() {
        insert_unique(&mut entries, name, close_block(&body))?;
    }
    Ok(Some(entries))
}

fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = match line.split_once(": ") {
        Some(pair) => pair,
        None => (line.strip_suffix(':')?, ""),
    };
    let key = key.trim_end();
    if key.is_empty() || key.starts_with(['"', '\'', '?', '-', '{', '[']) {
        return None;
    }
    Some((key, rest))
}

fn plain_scalar(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.starts_with(['"', '>', '{', '[', '&', '*', '!']) {
        return None;
    }
    if let Some(inner) = raw.strip_prefix('\'') {
        let inner = inner.strip_suffix('\'')?;
        return Some(inner.replace("''", "'"));
    }
    // ` #` opens a comment in a plain scalar.
    let end = raw
        .match_indices('#')
        .map(|(at, _)| at)
        .find(|&at| raw[..at].ends_with([' ', '\t']))
        .unwrap_or(raw.len());
    let value = raw[..end].trim_end();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Strip the block indentation (taken from the first non-empty line).
fn close_block(body: &[&str]) -> String {
    let indent = body
        .iter()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .unwrap_or(0);
    let lines: Vec<&str> = body
        .iter()
        .map(|line| line.get(indent..).unwrap_or("").trim_end())
        .collect();
    lines.join("\n").trim_end().to_string()
}

fn insert_unique(
    entries: &mut BTreeMap<String, String>,
    name: String,
    value: String,
) -> Result<(), String> {
    if entries.contains_key(&name) {
        return Err(format!("duplicate entry `{name}`"));
    }
    entries.insert(name, value);
    Ok(())
}

/// Load the ledger, treating a missing file as empty.
pub fn load(path: &Path) -> Result<ObsoleteLedger, PluginwatchError> {
    let shown = path.display().to_string();
    if !path.exists() {
        tracing::info!(path = %shown, "obsolete ledger not found, starting empty");
        return Ok(ObsoleteLedger::new());
    }
    let text = std::fs::read_to_string(path).map_err(|e| PluginwatchError::io(&shown, e))?;
    let ledger = parse(&text, &shown)?;
    tracing::info!(path = %shown, entries = ledger.len(), "obsolete ledger loaded");
    Ok(ledger)
}

pub fn save(ledger: &ObsoleteLedger, path: &Path) -> Result<(), PluginwatchError> {
    write_atomic(path, &render(ledger))?;
    tracing::info!(path = %path.display(), entries = ledger.len(), "obsolete ledger saved");
    Ok(())
}

/// Fold registry state into the ledger. Entries are never removed.
///
/// Per record, in order: its own `obsolete_message` is carried over, a
/// plugin with no usable repository gets [`GONE_AWAY`] when it has no entry
/// yet (skipped in strict mode), and an archived plugin gets its archival
/// sentence appended.
pub fn merge_from_registry(
    ledger: &mut ObsoleteLedger,
    registry: &Registry,
    strict: bool,
) -> LedgerMergeStats {
    let mut stats = LedgerMergeStats::default();

    for record in registry.iter() {
        let name = record.name.as_str();

        let message = record.obsolete_message.as_deref().map(str::trim).unwrap_or("");
        if !message.is_empty() {
            let existed = ledger.contains(name);
            if ledger.append(name, message) {
                if existed {
                    stats.appended += 1;
                } else {
                    stats.added += 1;
                }
            }
        }

        if !record.has_usable_vcs() && !strict && !ledger.contains(name) {
            tracing::warn!(plugin = %name, "repository is missing");
            ledger.insert(name, GONE_AWAY);
            stats.added += 1;
            stats.gone_away += 1;
        }

        if record.archived {
            let sentence = unmaintained_since(record.archived_at);
            let existed = ledger.contains(name);
            if ledger.append(name, &sentence) {
                tracing::warn!(plugin = %name, message = %sentence, "plugin is archived");
                stats.unmaintained += 1;
                if existed {
                    stats.appended += 1;
                } else {
                    stats.added += 1;
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pluginwatch_core::{PluginRecord, Vcs};

    fn ledger(pairs: &[(&str, &str)]) -> ObsoleteLedger {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn render_uses_block_layout() {
        let text = render(&ledger(&[("plugin-a", "line1\nline2")]));
        assert_eq!(text, "---\nplugin-a: |+\n  line1\n  line2\n");
    }

    #[test]
    fn render_sorts_and_keeps_blank_lines_empty() {
        let text = render(&ledger(&[("b", "x\n\ny"), ("a", "  padded  \n")]));
        assert_eq!(text, "---\na: |+\n  padded\nb: |+\n  x\n\n  y\n");
    }

    #[test]
    fn multi_line_reason_roundtrips() {
        let original = ledger(&[("plugin-a", "line1\nline2")]);
        let parsed = parse(&render(&original), "obsolete.yml").unwrap();
        assert_eq!(parsed.get("plugin-a"), Some("line1\nline2"));
    }

    #[test]
    fn roundtrip_keeps_inner_blank_lines_and_indentation() {
        let original = ledger(&[
            ("a", "Unmaintained since 2023-05-01.\n\n  see: https://example.com"),
            ("b", "Git repository has gone away."),
        ]);
        let parsed = parse(&render(&original), "obsolete.yml").unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn parses_plain_and_quoted_scalars() {
        let text = "---\na: Git repository has gone away.\nb: 'it''s gone'\n";
        let parsed = parse(text, "obsolete.yml").unwrap();
        assert_eq!(parsed.get("a"), Some("Git repository has gone away."));
        assert_eq!(parsed.get("b"), Some("it's gone"));
    }

    #[test]
    fn trailing_comments_match_yaml_reading() {
        let text = "---\na: Use fluent-plugin-b instead. # moved 2024\nb: issue #12 is open\n";
        let parsed = parse(text, "obsolete.yml").unwrap();
        assert_eq!(parsed.get("a"), Some("Use fluent-plugin-b instead."));
        assert_eq!(parsed.get("b"), Some("issue #12 is open"));

        let yaml: BTreeMap<String, String> = serde_yaml::from_str(text).unwrap();
        assert_eq!(yaml.len(), parsed.len());
        for (name, reason) in &yaml {
            assert_eq!(parsed.get(name), Some(reason.as_str()));
        }

        let quoted = parse("c: 'kept' # note\n", "obsolete.yml").unwrap();
        assert_eq!(quoted.get("c"), Some("kept"));
    }

    #[test]
    fn falls_back_to_yaml_for_other_layouts() {
        let text = "a: \"double \\\"quoted\\\"\"\nb: >\n  folded\n  text\n";
        let parsed = parse(text, "obsolete.yml").unwrap();
        assert_eq!(parsed.get("a"), Some("double \"quoted\""));
        assert_eq!(parsed.get("b"), Some("folded text"));
    }

    #[test]
    fn duplicate_entries_are_corrupt() {
        let err = parse("a: one\na: two\n", "obsolete.yml").unwrap_err();
        assert!(matches!(err, PluginwatchError::CorruptData { .. }));
    }

    #[test]
    fn non_map_text_is_corrupt() {
        let err = parse("  - not\n  - a map\n", "obsolete.yml").unwrap_err();
        assert!(matches!(err, PluginwatchError::CorruptData { .. }));
    }

    #[test]
    fn empty_document_is_empty_ledger() {
        assert!(parse("---\n", "obsolete.yml").unwrap().is_empty());
        assert!(parse("", "obsolete.yml").unwrap().is_empty());
    }

    #[test]
    fn append_does_not_repeat() {
        let mut l = ledger(&[("a", "Unmaintained since 2023-05-01.")]);
        assert!(l.append("a", "Unmaintained since 2024-01-01."));
        assert!(!l.append("a", "Unmaintained since 2024-01-01."));
        assert_eq!(
            l.get("a"),
            Some("Unmaintained since 2023-05-01.\nUnmaintained since 2024-01-01.")
        );
    }

    fn registry_with(records: Vec<PluginRecord>) -> Registry {
        Registry::from_records(records)
    }

    #[test]
    fn merge_adds_gone_away_for_missing_vcs() {
        let mut missing = PluginRecord::new("fluent-plugin-gone");
        missing.vcs = Some(Vcs::Missing);
        let mut bare = PluginRecord::new("fluent-plugin-bare");
        bare.homepage_uri = Some(String::new());
        let mut ok = PluginRecord::new("fluent-plugin-ok");
        ok.vcs = Some(Vcs::Url("https://github.com/a/fluent-plugin-ok".into()));
        let registry = registry_with(vec![missing, bare, ok]);

        let mut l = ObsoleteLedger::new();
        let stats = merge_from_registry(&mut l, &registry, false);
        assert_eq!(stats.gone_away, 2);
        assert_eq!(l.get("fluent-plugin-gone"), Some(GONE_AWAY));
        assert_eq!(l.get("fluent-plugin-bare"), Some(GONE_AWAY));
        assert!(!l.contains("fluent-plugin-ok"));
    }

    #[test]
    fn strict_merge_skips_gone_away() {
        let mut missing = PluginRecord::new("fluent-plugin-gone");
        missing.vcs = Some(Vcs::Missing);
        let mut l = ObsoleteLedger::new();
        let stats = merge_from_registry(&mut l, &registry_with(vec![missing]), true);
        assert_eq!(stats, LedgerMergeStats::default());
        assert!(l.is_empty());
    }

    #[test]
    fn merge_appends_archival_sentence_to_existing_entry() {
        let mut archived = PluginRecord::new("p");
        archived.vcs = Some(Vcs::Url("https://github.com/a/p".into()));
        archived.archived = true;
        archived.archived_at = NaiveDate::from_ymd_opt(2024, 1, 1);

        let mut l = ledger(&[("p", "Unmaintained since 2023-05-01.")]);
        let stats = merge_from_registry(&mut l, &registry_with(vec![archived.clone()]), false);
        assert_eq!(stats.appended, 1);
        assert_eq!(
            l.get("p"),
            Some("Unmaintained since 2023-05-01.\nUnmaintained since 2024-01-01.")
        );

        let again = merge_from_registry(&mut l, &registry_with(vec![archived]), false);
        assert_eq!(again, LedgerMergeStats::default());
    }

    #[test]
    fn merge_never_removes_entries() {
        let mut l = ledger(&[("unrelated", "manual note")]);
        merge_from_registry(&mut l, &Registry::new(), false);
        assert_eq!(l.get("unrelated"), Some("manual note"));
    }

    #[test]
    fn merge_carries_record_message() {
        let mut record = PluginRecord::new("p");
        record.vcs = Some(Vcs::Url("https://example.com/p".into()));
        record.obsolete_message = Some("Given homepage URI (https://example.com/p) was inaccessible. Only gem is available.".into());
        let mut l = ObsoleteLedger::new();
        let stats = merge_from_registry(&mut l, &registry_with(vec![record]), false);
        assert_eq!(stats.added, 1);
        assert!(l.get("p").unwrap().starts_with("Given homepage URI"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obsolete-plugins.yml");
        let original = ledger(&[("a", "one\ntwo"), ("b", "three")]);
        save(&original, &path).unwrap();
        assert_eq!(load(&path).unwrap(), original);
        assert!(load(&dir.path().join("absent.yml")).unwrap().is_empty());
    }
}
