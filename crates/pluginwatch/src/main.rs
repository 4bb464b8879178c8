// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! pluginwatch binary entry point.
//!
//! Loads configuration, initializes tracing, and runs one maintenance pass
//! over the plugin registry. Fatal errors exit with status 1.

mod check;
mod ci;
mod merge;
mod obsolete;
mod summary;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pluginwatch_config::PluginwatchConfig;
use pluginwatch_core::PluginwatchError;
use pluginwatch_registry::{OverrideLists, load_overrides};

/// Fluentd plugin registry maintenance.
#[derive(Parser, Debug)]
#[command(name = "pluginwatch", version, about = "Fluentd plugin registry maintenance", long_about = None)]
struct Cli {
    /// Log level: `info` or `debug`. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fold the upstream plugin index into the registry.
    Merge(merge::MergeArgs),
    /// Check stale records for archival and dead links.
    Check(check::CheckArgs),
    /// Detect the CI system of hosted repositories.
    Ci(ci::CiArgs),
    /// Publish obsolete-plugin messages from the registry.
    Obsolete(obsolete::ObsoleteArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => pluginwatch_config::load_and_validate_path(path),
        None => pluginwatch_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            pluginwatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(cli.log_level.as_deref().unwrap_or(&config.log.level));
    if cli.plain {
        colored::control::set_override(false);
    }

    let today = Utc::now().date_naive();
    if let Err(e) = dispatch(cli.command, &config, today).await {
        tracing::error!(error = %e, "run aborted");
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn dispatch(
    command: Commands,
    config: &PluginwatchConfig,
    today: NaiveDate,
) -> Result<(), PluginwatchError> {
    match command {
        Commands::Merge(args) => {
            let stats = merge::run_merge(config, &args, today).await?;
            summary::print_merge(&stats);
        }
        Commands::Check(args) => {
            let token = require_credential(&config.host.token_env)?;
            let stats = check::run_check(config, &args, &token, today).await?;
            summary::print_run(&stats);
        }
        Commands::Ci(args) => {
            let token = require_credential(&config.host.token_env)?;
            let stats = ci::run_ci(config, &args, &token, today).await?;
            summary::print_run(&stats);
        }
        Commands::Obsolete(args) => {
            let (stats, entries) = obsolete::run_obsolete(config, &args)?;
            summary::print_ledger(&stats, entries);
        }
    }
    Ok(())
}

/// Read the host credential. Absent and blank values are both rejected.
fn require_credential(var: &str) -> Result<String, PluginwatchError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PluginwatchError::MissingCredential {
            var: var.to_string(),
        }),
    }
}

/// Override lists from the configured file plus the `[overrides]` section.
pub(crate) fn load_override_lists(
    config: &PluginwatchConfig,
) -> Result<OverrideLists, PluginwatchError> {
    let from_file = match &config.paths.overrides {
        Some(path) => load_overrides(Path::new(path))?,
        None => OverrideLists::new(),
    };
    let inline = OverrideLists::from_lists(
        &config.overrides.archived,
        &config.overrides.lost,
        &config.overrides.verified,
    );
    Ok(from_file.union(inline))
}

/// `flag` when given, else the configured path.
pub(crate) fn resolve_path(flag: &Option<PathBuf>, configured: &str) -> PathBuf {
    flag.clone().unwrap_or_else(|| PathBuf::from(configured))
}

fn normalize_level(level: &str) -> &'static str {
    if level.eq_ignore_ascii_case("debug") {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = normalize_level(log_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pluginwatch={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
