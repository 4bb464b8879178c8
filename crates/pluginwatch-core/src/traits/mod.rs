// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for the external collaborators of a reconciliation run.
//!
//! The network-facing traits use `#[async_trait]` so implementations can be
//! held as trait objects by the batch driver and swapped for fakes in tests.

pub mod extract;
pub mod host;
pub mod probe;

pub use extract::ArchiveDateExtractor;
pub use host::RepoHost;
pub use probe::LinkProbe;
