// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pluginwatch check` command implementation.
//!
//! Runs the batch driver over the registry with the GitHub host client and
//! the HTTP link probe, then writes the registry once at the end.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Args;
use pluginwatch_config::PluginwatchConfig;
use pluginwatch_core::PluginwatchError;
use pluginwatch_liveness::{BannerDateExtractor, GithubClient, HttpLinkProbe};
use pluginwatch_reconcile::{BatchDriver, Reconciler, RunStats, StalenessPolicy};
use pluginwatch_registry::{load_index, store};
use tracing::{debug, info};

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Registry to check.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Plugin index supplying upstream archival flags. Optional.
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Write the result here instead of over the registry.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Check at most N records.
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Do not flag plugins without a repository.
    #[arg(long)]
    pub strict: bool,
}

pub async fn run_check(
    config: &PluginwatchConfig,
    args: &CheckArgs,
    token: &str,
    today: NaiveDate,
) -> Result<RunStats, PluginwatchError> {
    let registry_path = crate::resolve_path(&args.registry, &config.paths.registry);
    let index_path = crate::resolve_path(&args.index, &config.paths.index);
    let output = args.output.clone().unwrap_or_else(|| registry_path.clone());

    let registry = store::load(&registry_path)?;
    let index = if index_path.exists() {
        load_index(&index_path)?
    } else {
        debug!(path = %index_path.display(), "no local index, using registry links only");
        Vec::new()
    };
    let overrides = crate::load_override_lists(config)?;

    let timeout = Duration::from_secs(config.checks.timeout_secs);
    let host = GithubClient::new(token, timeout)?
        .with_base_urls(&config.host.api_base, &config.host.web_base);
    let probe = HttpLinkProbe::new(timeout)?;

    let strict = args.strict || config.checks.strict;
    let reconciler = Reconciler::new(Arc::new(host), Arc::new(probe), Arc::new(BannerDateExtractor))
        .with_overrides(overrides)
        .strict(strict);
    let driver = BatchDriver::new(
        reconciler,
        StalenessPolicy::new(config.checks.recheck_interval_days),
    )
    .max_records(args.max_records.or(config.checks.max_records))
    .archive_backoff(Duration::from_secs(config.checks.archive_backoff_secs));

    info!(records = registry.len(), strict, "starting check");
    let (checked, stats) = driver.run(&registry, &index, today).await;
    store::save(&checked, &output)?;
    Ok(stats)
}
