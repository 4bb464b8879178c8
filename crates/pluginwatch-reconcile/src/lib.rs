// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation passes over the plugin registry.
//!
//! - [`merge::merge_index`]: fold the upstream index into the registry.
//! - [`driver::BatchDriver`]: archival and liveness check of stale records.
//! - [`ci::detect_ci_pass`]: CI system detection.
//!
//! All passes are sequential and take the current date as a parameter.

pub mod ci;
pub mod classifier;
pub mod driver;
pub mod merge;
pub mod report;
pub mod staleness;
pub mod suspicious;

#[cfg(test)]
mod fakes;

pub use ci::detect_ci_pass;
pub use classifier::{Classification, HostFailure, Reconciler};
pub use driver::{BatchDriver, DEFAULT_ARCHIVE_BACKOFF};
pub use merge::merge_index;
pub use report::{Advisory, AdvisoryReason, MergeStats, RunStats};
pub use staleness::{StalenessPolicy, is_fresh};
pub use suspicious::suspicious_vcs;
