// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pluginwatch merge` command implementation.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Args;
use pluginwatch_config::PluginwatchConfig;
use pluginwatch_core::PluginwatchError;
use pluginwatch_reconcile::{MergeStats, merge_index};
use pluginwatch_registry::{fetch_or_load_index, index, store};
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct MergeArgs {
    /// Plugin index (JSON array). Downloaded when the file does not exist.
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Registry to update.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Write the result here instead of over the registry.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Merge only the first N index entries.
    #[arg(long)]
    pub max_records: Option<usize>,
}

pub async fn run_merge(
    config: &PluginwatchConfig,
    args: &MergeArgs,
    today: NaiveDate,
) -> Result<MergeStats, PluginwatchError> {
    let index_path = crate::resolve_path(&args.index, &config.paths.index);
    let registry_path = crate::resolve_path(&args.registry, &config.paths.registry);
    let output = args.output.clone().unwrap_or_else(|| registry_path.clone());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.checks.timeout_secs))
        .build()
        .map_err(|e| PluginwatchError::Config(format!("failed to build HTTP client: {e}")))?;
    let entries = fetch_or_load_index(&index_path, &config.index.url, &client).await?;
    let entries = index::truncate(entries, args.max_records.or(config.checks.max_records));

    let overrides = crate::load_override_lists(config)?;
    let mut registry = store::load_or_default(&registry_path)?;
    info!(entries = entries.len(), overrides = overrides.len(), "merging plugin index");
    let stats = merge_index(&mut registry, &entries, &overrides, today);

    store::save(&registry, &output)?;
    Ok(stats)
}
