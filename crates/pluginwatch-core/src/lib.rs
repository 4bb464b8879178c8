// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for pluginwatch.
//!
//! Holds the typed plugin record model, the error taxonomy, and the capability
//! traits (repository host, link probe, archive-date extraction) that the
//! reconciliation crates are written against.

pub mod error;
pub mod messages;
pub mod traits;
pub mod types;

pub use error::{HostError, PluginwatchError};
pub use traits::{ArchiveDateExtractor, LinkProbe, RepoHost};
pub use types::{CiSystem, IndexEntry, PluginRecord, Probe, RepoMetadata, RepoRef, Vcs};
