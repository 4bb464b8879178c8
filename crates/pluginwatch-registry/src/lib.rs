// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent stores for pluginwatch.
//!
//! The curated registry (`checked.yml`), the upstream plugin index
//! (`plugins.json`), the obsolete-plugins ledger, and the manual override
//! lists. Every file is overwritten whole through a temp file and rename.

pub mod atomic;
pub mod index;
pub mod obsolete;
pub mod overrides;
pub mod store;

pub use atomic::write_atomic;
pub use index::{fetch_or_load_index, load_index, parse_index};
pub use obsolete::{LedgerMergeStats, ObsoleteLedger, merge_from_registry};
pub use overrides::{OverrideKind, OverrideLists, load_overrides};
pub use store::{Registry, RegistryFormat, merge, merge_record};
