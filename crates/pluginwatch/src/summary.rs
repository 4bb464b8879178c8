// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run summaries printed to stdout.

use colored::Colorize;
use pluginwatch_reconcile::{Advisory, MergeStats, RunStats};
use pluginwatch_registry::LedgerMergeStats;

pub fn print_merge(stats: &MergeStats) {
    print!("{stats}");
    print_advisories(&stats.advisories);
}

pub fn print_run(stats: &RunStats) {
    print!("{stats}");
    if stats.newly_archived > 0 || stats.dead_links > 0 {
        println!(
            "  {} newly archived, {} with dead links",
            stats.newly_archived.to_string().yellow(),
            stats.dead_links.to_string().yellow()
        );
    }
    if stats.error > 0 {
        println!(
            "  {}",
            format!("{} plugins could not be checked and were left as they were", stats.error).red()
        );
    }
    print_advisories(&stats.advisories);
}

pub fn print_ledger(stats: &LedgerMergeStats, entries: usize) {
    println!("Obsolete plugins: {entries}");
    println!("  Added: {}", stats.added);
    println!("  Appended: {}", stats.appended);
    println!("  Gone away: {}", stats.gone_away);
    println!("  Unmaintained: {}", stats.unmaintained);
}

fn print_advisories(advisories: &[Advisory]) {
    if advisories.is_empty() {
        return;
    }
    println!("{}", "Advisories:".bold());
    for advisory in advisories {
        println!("  {} {advisory}", "!".yellow());
    }
}
