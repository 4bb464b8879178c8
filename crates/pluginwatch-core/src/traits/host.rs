// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository host capability (GitHub in production).

use async_trait::async_trait;

use crate::error::HostError;
use crate::types::{CiSystem, RepoMetadata, RepoRef};

/// Read-only access to a repository hosting service.
///
/// Metadata lookups are authoritative for archival state and are preferred
/// over bare page fetches for hosted URLs.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Short identifier used in log lines (e.g. "github").
    fn name(&self) -> &str;

    /// Fetch `archived`, `pushed_at`, and `updated_at` for a repository.
    async fn repository(&self, repo: &RepoRef) -> Result<RepoMetadata, HostError>;

    /// Fetch the public HTML page of a repository.
    async fn repository_page(&self, repo: &RepoRef) -> Result<String, HostError>;

    /// Detect which CI system the repository is configured with.
    async fn detect_ci(&self, repo: &RepoRef) -> Result<CiSystem, HostError>;
}
