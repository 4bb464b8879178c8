// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for pluginwatch.
//!
//! Only file-level and credential-level errors are fatal to a run. Everything
//! raised while processing a single plugin is recovered at the plugin boundary.

use thiserror::Error;

/// The primary error type used across pluginwatch crates.
#[derive(Debug, Error)]
pub enum PluginwatchError {
    /// A persisted file could not be parsed into the expected shape.
    #[error("corrupt data in {path}: {reason}")]
    CorruptData { path: String, reason: String },

    /// A required credential is not present in the environment.
    #[error("missing credential: set the {var} environment variable")]
    MissingCredential { var: String },

    /// A single network call exceeded its time budget.
    #[error("request to {url} timed out")]
    NetworkTimeout { url: String },

    /// The repository host API refused or failed a request.
    #[error("repository host error: {0}")]
    HostApi(#[from] HostError),

    /// The archive date could not be found on a repository page.
    #[error("could not extract archive date from {url}")]
    ScrapeExtractionFailure { url: String },

    /// Invalid configuration values.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors while reading or writing a data file.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic HTTP failures outside the repository host API.
    #[error("http error for {url}: {message}")]
    Http { url: String, message: String },
}

impl PluginwatchError {
    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PluginwatchError::CorruptData { .. }
                | PluginwatchError::MissingCredential { .. }
                | PluginwatchError::Config(_)
                | PluginwatchError::Io { .. }
        )
    }

    pub fn corrupt(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        PluginwatchError::CorruptData {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        PluginwatchError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures reported by a [`RepoHost`](crate::traits::RepoHost).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Repository does not exist (or is private).
    #[error("repository {repo} not found")]
    NotFound { repo: String },

    /// API rate limit reached (HTTP 403/429).
    #[error("rate limited while fetching {repo}")]
    RateLimited { repo: String },

    /// The bearer credential was rejected.
    #[error("credential rejected by repository host")]
    Unauthorized,

    /// The request did not complete within the timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Transport failure (DNS, TLS, connection reset).
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Any other non-success status or undecodable body.
    #[error("unexpected response for {repo}: {detail}")]
    Unexpected { repo: String, detail: String },
}

impl HostError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HostError::Timeout { .. })
    }
}

