// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry store for curated plugin records.
//!
//! The `Registry` holds `PluginRecord`s keyed by plugin name. Files are YAML
//! (`checked.yml`) unless the extension is `.json`. Records are typed at the
//! load boundary: anything that does not fit the record shape is
//! `CorruptData`.

use std::collections::BTreeMap;
use std::path::Path;

use pluginwatch_core::{PluginRecord, PluginwatchError, Vcs};

use crate::atomic::write_atomic;

/// On-disk encoding of a registry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFormat {
    Yaml,
    Json,
}

impl RegistryFormat {
    /// Pick the format from the file extension (`.json` or YAML otherwise).
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RegistryFormat::Json,
            _ => RegistryFormat::Yaml,
        }
    }
}

/// In-memory registry of plugin records, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    records: BTreeMap<String, PluginRecord>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from records, keyed by `record.name`.
    pub fn from_records(records: impl IntoIterator<Item = PluginRecord>) -> Self {
        let mut registry = Self::new();
        for record in records {
            registry.insert(record);
        }
        registry
    }

    /// Insert or replace the record stored under `record.name`.
    pub fn insert(&mut self, record: PluginRecord) -> Option<PluginRecord> {
        self.records.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&PluginRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// All records, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &PluginRecord> {
        self.records.values()
    }

    /// Plugin names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse registry content. `origin` names the source in error messages.
    pub fn parse(
        content: &str,
        format: RegistryFormat,
        origin: &str,
    ) -> Result<Self, PluginwatchError> {
        if content.trim().is_empty() || content.trim() == "---" {
            return Ok(Self::new());
        }

        let raw: BTreeMap<String, PluginRecord> = match format {
            RegistryFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| PluginwatchError::corrupt(origin, e))?
            }
            RegistryFormat::Json => {
                serde_json::from_str(content).map_err(|e| PluginwatchError::corrupt(origin, e))?
            }
        };

        let mut records = BTreeMap::new();
        for (name, mut record) in raw {
            if name.trim().is_empty() {
                return Err(PluginwatchError::corrupt(origin, "empty plugin name"));
            }
            record.name = name.clone();
            records.insert(name, record);
        }
        Ok(Self { records })
    }

    /// Serialize the registry in the given format.
    pub fn render(&self, format: RegistryFormat) -> Result<String, PluginwatchError> {
        match format {
            RegistryFormat::Yaml => serde_yaml::to_string(&self.records)
                .map(|body| format!("---\n{body}"))
                .map_err(|e| PluginwatchError::Config(format!("cannot encode registry: {e}"))),
            RegistryFormat::Json => serde_json::to_string_pretty(&self.records)
                .map(|body| format!("{body}\n"))
                .map_err(|e| PluginwatchError::Config(format!("cannot encode registry: {e}"))),
        }
    }
}

/// Load a registry file. A missing file is an I/O error.
pub fn load(path: &Path) -> Result<Registry, PluginwatchError> {
    let shown = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| PluginwatchError::io(&shown, e))?;
    let registry = Registry::parse(&content, RegistryFormat::for_path(path), &shown)?;
    tracing::info!(path = %shown, records = registry.len(), "registry loaded");
    Ok(registry)
}

/// Load a registry file, treating a missing file as an empty registry.
pub fn load_or_default(path: &Path) -> Result<Registry, PluginwatchError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "registry file not found, starting empty");
        return Ok(Registry::new());
    }
    load(path)
}

/// Serialize and atomically overwrite `path`.
pub fn save(registry: &Registry, path: &Path) -> Result<(), PluginwatchError> {
    let content = registry.render(RegistryFormat::for_path(path))?;
    write_atomic(path, &content)?;
    tracing::info!(path = %path.display(), records = registry.len(), "registry saved");
    Ok(())
}

/// Combine two registries plugin by plugin.
///
/// Names present on one side only are kept as they are; shared names go
/// through [`merge_record`].
pub fn merge(existing: &Registry, incoming: &Registry) -> Registry {
    let mut merged = existing.clone();
    for record in incoming.iter() {
        let combined = match existing.get(&record.name) {
            Some(ours) => merge_record(ours, record),
            None => record.clone(),
        };
        merged.insert(combined);
    }
    merged
}

/// Merge one incoming record into an existing one.
///
/// Verified facts on the existing side (`vcs`, `archived`, `checked_at`) win
/// unless the incoming record carries a strictly newer check. `vcs: false`
/// and `archived: true` are never undone; obsolescence text is only appended.
pub fn merge_record(existing: &PluginRecord, incoming: &PluginRecord) -> PluginRecord {
    let incoming_newer = match (existing.checked_at, incoming.checked_at) {
        (Some(ours), Some(theirs)) => theirs > ours,
        (None, Some(_)) => true,
        _ => false,
    };

    let mut merged = existing.clone();

    merged.vcs = match (&existing.vcs, &incoming.vcs) {
        (Some(Vcs::Missing), _) => Some(Vcs::Missing),
        (None, theirs) => theirs.clone(),
        (Some(Vcs::Url(_)), Some(theirs)) if incoming_newer => Some(theirs.clone()),
        (ours, _) => ours.clone(),
    };

    merged.ci = if merged.vcs_missing() {
        None
    } else if incoming_newer && incoming.ci.is_some() {
        incoming.ci
    } else {
        existing.ci.or(incoming.ci)
    };

    merged.archived = existing.archived || incoming.archived;
    merged.archived_at = existing.archived_at.or(incoming.archived_at);
    merged.checked_at = existing.checked_at.max(incoming.checked_at);
    merged.updated_at = existing.updated_at.max(incoming.updated_at);

    if let Some(theirs) = incoming.obsolete_message.as_deref() {
        if !theirs.trim().is_empty() {
            merged.append_obsolete_message(theirs.trim_end());
        }
    }

    if incoming.homepage_uri.is_some() {
        merged.homepage_uri = incoming.homepage_uri.clone();
    }
    if incoming.source_code_uri.is_some() {
        merged.source_code_uri = incoming.source_code_uri.clone();
    }
    if incoming.note.is_some() {
        merged.note = incoming.note.clone();
    }

    merged
}
