// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use pluginwatch_core::{
    ArchiveDateExtractor, CiSystem, HostError, LinkProbe, Probe, RepoHost, RepoMetadata, RepoRef,
};

/// Repository host answering from fixed tables keyed by `owner/repo`.
#[derive(Default)]
pub struct FakeHost {
    pub repos: HashMap<String, Result<RepoMetadata, HostError>>,
    pub pages: HashMap<String, String>,
    pub ci: HashMap<String, Result<CiSystem, HostError>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn with_repo(mut self, slug: &str, archived: bool) -> Self {
        self.repos.insert(
            slug.to_string(),
            Ok(RepoMetadata {
                archived,
                ..RepoMetadata::default()
            }),
        );
        self
    }

    pub fn with_error(mut self, slug: &str, error: HostError) -> Self {
        self.repos.insert(slug.to_string(), Err(error));
        self
    }

    pub fn with_page(mut self, slug: &str, html: &str) -> Self {
        self.pages.insert(slug.to_string(), html.to_string());
        self
    }

    pub fn with_ci(mut self, slug: &str, ci: Result<CiSystem, HostError>) -> Self {
        self.ci.insert(slug.to_string(), ci);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepoHost for FakeHost {
    fn name(&self) -> &str {
        "fake"
    }

    async fn repository(&self, repo: &RepoRef) -> Result<RepoMetadata, HostError> {
        self.calls.lock().unwrap().push(format!("repo {}", repo.slug()));
        self.repos
            .get(&repo.slug())
            .cloned()
            .unwrap_or(Err(HostError::NotFound { repo: repo.slug() }))
    }

    async fn repository_page(&self, repo: &RepoRef) -> Result<String, HostError> {
        self.calls.lock().unwrap().push(format!("page {}", repo.slug()));
        self.pages
            .get(&repo.slug())
            .cloned()
            .ok_or(HostError::NotFound { repo: repo.slug() })
    }

    async fn detect_ci(&self, repo: &RepoRef) -> Result<CiSystem, HostError> {
        self.calls.lock().unwrap().push(format!("ci {}", repo.slug()));
        self.ci
            .get(&repo.slug())
            .cloned()
            .unwrap_or(Ok(CiSystem::Unconfigured))
    }
}

/// Link probe answering from a URL table; unknown URLs fail.
#[derive(Default)]
pub struct FakeLinks {
    pub answers: HashMap<String, Probe>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeLinks {
    pub fn with(mut self, url: &str, probe: Probe) -> Self {
        self.answers.insert(url.to_string(), probe);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkProbe for FakeLinks {
    async fn probe(&self, url: &str) -> Probe {
        self.calls.lock().unwrap().push(url.to_string());
        self.answers
            .get(url)
            .cloned()
            .unwrap_or(Probe::Failed("no route".into()))
    }
}

/// Extractor that reads the page body as an ISO date.
pub struct IsoPageExtractor;

impl ArchiveDateExtractor for IsoPageExtractor {
    fn extract_archived_date(&self, html: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(html.trim(), "%Y-%m-%d").ok()
    }
}
