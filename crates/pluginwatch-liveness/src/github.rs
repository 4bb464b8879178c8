// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GitHub REST client implementing [`RepoHost`].

use std::time::Duration;

use async_trait::async_trait;
use pluginwatch_core::{CiSystem, HostError, PluginwatchError, RepoHost, RepoMetadata, RepoRef};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

/// Base URL for the GitHub REST API.
pub const API_BASE_URL: &str = "https://api.github.com";

/// Base URL for public repository pages.
pub const WEB_BASE_URL: &str = "https://github.com";

const API_VERSION: &str = "2022-11-28";

const USER_AGENT: &str = concat!("pluginwatch/", env!("CARGO_PKG_VERSION"));

/// Repository paths that identify a CI system, checked in order.
const CI_MARKERS: [(&str, CiSystem); 3] = [
    (".github/workflows", CiSystem::Github),
    (".circleci", CiSystem::CircleCi),
    (".travis.yml", CiSystem::Travis),
];

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Authenticated GitHub client.
///
/// The token is sent only to the API host; repository pages are fetched
/// anonymously.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    token: String,
    api_base: String,
    web_base: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, PluginwatchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PluginwatchError::Config(format!("failed to build HTTP client: {e}")))?;

        let token = token.into();
        if token.trim().is_empty() {
            return Err(PluginwatchError::Config("repository host token is empty".into()));
        }

        Ok(Self {
            client,
            token,
            api_base: API_BASE_URL.to_string(),
            web_base: WEB_BASE_URL.to_string(),
        })
    }

    /// Overrides the API and web base URLs (GitHub Enterprise, wiremock).
    pub fn with_base_urls(mut self, api_base: impl Into<String>, web_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.web_base = web_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn api_get(&self, url: &str) -> Result<reqwest::Response, HostError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;
        debug!(url = %url, status = %response.status(), "host API response");
        Ok(response)
    }
}

#[async_trait]
impl RepoHost for GithubClient {
    fn name(&self) -> &str {
        "github"
    }

    async fn repository(&self, repo: &RepoRef) -> Result<RepoMetadata, HostError> {
        let url = format!("{}/repos/{}", self.api_base, repo.slug());
        let response = self.api_get(&url).await?;
        let response = check_status(response, repo).await?;
        response
            .json::<RepoMetadata>()
            .await
            .map_err(|e| HostError::Unexpected {
                repo: repo.slug(),
                detail: format!("undecodable repository metadata: {e}"),
            })
    }

    async fn repository_page(&self, repo: &RepoRef) -> Result<String, HostError> {
        let url = format!("{}/{}", self.web_base, repo.slug());
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, repo).await?;
        response.text().await.map_err(|e| transport_error(&url, e))
    }

    async fn detect_ci(&self, repo: &RepoRef) -> Result<CiSystem, HostError> {
        for (path, ci) in CI_MARKERS {
            let url = format!("{}/repos/{}/contents/{}", self.api_base, repo.slug(), path);
            let response = self.api_get(&url).await?;
            if response.status() == StatusCode::NOT_FOUND {
                continue;
            }
            check_status(response, repo).await?;
            debug!(repo = %repo, ci = %ci, "CI configuration found");
            return Ok(ci);
        }
        Ok(CiSystem::Unconfigured)
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> HostError {
    if e.is_timeout() {
        HostError::Timeout { url: url.to_string() }
    } else {
        HostError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// Map non-success statuses onto [`HostError`].
async fn check_status(
    response: reqwest::Response,
    repo: &RepoRef,
) -> Result<reqwest::Response, HostError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => Err(HostError::NotFound { repo: repo.slug() }),
        StatusCode::UNAUTHORIZED => Err(HostError::Unauthorized),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            warn!(repo = %repo, status = %status, message = %message, "repository host refused request");
            Err(HostError::RateLimited { repo: repo.slug() })
        }
        _ => Err(HostError::Unexpected {
            repo: repo.slug(),
            detail: format!("{status}: {message}"),
        }),
    }
}
