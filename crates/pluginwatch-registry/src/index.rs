// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream plugin index (`plugins.json`) loading and fetching.

use std::collections::BTreeMap;
use std::path::Path;

use pluginwatch_core::{IndexEntry, PluginwatchError};

use crate::atomic::write_atomic;

/// Parse a JSON array of index objects.
///
/// Entries are de-duplicated by name (the last occurrence wins) and returned
/// sorted by name. Objects without a name are dropped with a warning.
pub fn parse_index(content: &str, origin: &str) -> Result<Vec<IndexEntry>, PluginwatchError> {
    let entries: Vec<IndexEntry> =
        serde_json::from_str(content).map_err(|e| PluginwatchError::corrupt(origin, e))?;

    let total = entries.len();
    let mut by_name = BTreeMap::new();
    for entry in entries {
        if entry.name.trim().is_empty() {
            tracing::warn!(path = %origin, "index entry without a name skipped");
            continue;
        }
        by_name.insert(entry.name.clone(), entry);
    }
    if by_name.len() < total {
        tracing::debug!(path = %origin, total, unique = by_name.len(), "index entries de-duplicated");
    }
    Ok(by_name.into_values().collect())
}

/// Load and parse a local index file.
pub fn load_index(path: &Path) -> Result<Vec<IndexEntry>, PluginwatchError> {
    let shown = path.display().to_string();
    tracing::info!(path = %shown, "loading plugin index");
    let content = std::fs::read_to_string(path).map_err(|e| PluginwatchError::io(&shown, e))?;
    parse_index(&content, &shown)
}

/// Load the index from `path`, downloading it from `url` first when absent.
///
/// The downloaded body is validated before it is written, so a bad response
/// never leaves a broken local copy behind.
pub async fn fetch_or_load_index(
    path: &Path,
    url: &str,
    client: &reqwest::Client,
) -> Result<Vec<IndexEntry>, PluginwatchError> {
    if path.exists() {
        return load_index(path);
    }

    tracing::info!(path = %path.display(), url = %url, "fetching plugin index");
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            PluginwatchError::NetworkTimeout { url: url.to_string() }
        } else {
            PluginwatchError::Http {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PluginwatchError::Http {
            url: url.to_string(),
            message: format!("index download returned {status}"),
        });
    }
    let body = response.text().await.map_err(|e| PluginwatchError::Http {
        url: url.to_string(),
        message: format!("failed to read index body: {e}"),
    })?;

    let entries = parse_index(&body, url)?;
    write_atomic(path, &body)?;
    tracing::info!(path = %path.display(), entries = entries.len(), "plugin index saved");
    Ok(entries)
}

/// Keep the first `max` entries of a sorted index.
pub fn truncate(mut entries: Vec<IndexEntry>, max: Option<usize>) -> Vec<IndexEntry> {
    if let Some(max) = max {
        entries.truncate(max);
    }
    entries
}
