// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pluginwatch obsolete` command implementation.

use std::path::PathBuf;

use clap::Args;
use pluginwatch_config::PluginwatchConfig;
use pluginwatch_core::PluginwatchError;
use pluginwatch_registry::{LedgerMergeStats, merge_from_registry, obsolete, store};

#[derive(Args, Debug, Default)]
pub struct ObsoleteArgs {
    /// Registry to read.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Existing obsolete ledger. Missing means empty.
    #[arg(long)]
    pub obsolete: Option<PathBuf>,

    /// Write the ledger here instead of over `--obsolete`.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Do not add the missing-repository message.
    #[arg(long)]
    pub strict: bool,
}

/// Returns the merge counters and the ledger size after the merge.
pub fn run_obsolete(
    config: &PluginwatchConfig,
    args: &ObsoleteArgs,
) -> Result<(LedgerMergeStats, usize), PluginwatchError> {
    let registry_path = crate::resolve_path(&args.registry, &config.paths.registry);
    let ledger_path = crate::resolve_path(&args.obsolete, &config.paths.obsolete);
    let output = args.output.clone().unwrap_or_else(|| ledger_path.clone());

    let registry = store::load(&registry_path)?;
    let mut ledger = obsolete::load(&ledger_path)?;
    let stats = merge_from_registry(&mut ledger, &registry, args.strict || config.checks.strict);

    obsolete::save(&ledger, &output)?;
    Ok((stats, ledger.len()))
}
