// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain HTTP liveness probe.

use std::time::Duration;

use async_trait::async_trait;
use pluginwatch_core::{LinkProbe, PluginwatchError, Probe};
use tracing::debug;

/// Per-URL time budget when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("pluginwatch/", env!("CARGO_PKG_VERSION"));

/// [`LinkProbe`] backed by a GET request. Redirects are followed.
#[derive(Debug, Clone)]
pub struct HttpLinkProbe {
    client: reqwest::Client,
}

impl HttpLinkProbe {
    pub fn new(timeout: Duration) -> Result<Self, PluginwatchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PluginwatchError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProbe for HttpLinkProbe {
    async fn probe(&self, url: &str) -> Probe {
        let parsed = match reqwest::Url::parse(url.trim()) {
            Ok(parsed) => parsed,
            Err(e) => return Probe::Failed(format!("invalid URL: {e}")),
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return Probe::Failed(format!("unsupported scheme `{}`", parsed.scheme()));
        }

        let outcome = match self.client.get(parsed).send().await {
            Ok(response) if response.status().is_success() => Probe::Reachable,
            Ok(response) => Probe::Status(response.status().as_u16()),
            Err(e) if e.is_timeout() => Probe::Timeout,
            Err(e) => Probe::Failed(e.to_string()),
        };
        debug!(url = %url, outcome = ?outcome, "link probed");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe() -> HttpLinkProbe {
        HttpLinkProbe::new(Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn success_is_reachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/plugin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let url = format!("{}/plugin", server.uri());
        assert_eq!(probe().probe(&url).await, Probe::Reachable);
        assert!(probe().is_reachable(&url).await);
    }

    #[tokio::test]
    async fn redirect_is_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/old", server.uri());
        assert!(probe().is_reachable(&url).await);
    }

    #[tokio::test]
    async fn not_found_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/gone", server.uri());
        assert_eq!(probe().probe(&url).await, Probe::Status(404));
        assert!(!probe().is_reachable(&url).await);
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fast = HttpLinkProbe::new(Duration::from_millis(200)).unwrap();
        let url = format!("{}/slow", server.uri());
        assert_eq!(fast.probe(&url).await, Probe::Timeout);
    }

    #[tokio::test]
    async fn unusable_urls_fail_without_requests() {
        let p = probe();
        assert!(matches!(p.probe("").await, Probe::Failed(_)));
        assert!(matches!(p.probe("ftp://example.com/x").await, Probe::Failed(_)));
        assert!(matches!(p.probe("not a url").await, Probe::Failed(_)));
    }

    #[tokio::test]
    async fn refused_connection_fails() {
        // Port 9 (discard) is closed on test hosts.
        let outcome = probe().probe("http://127.0.0.1:9/").await;
        assert!(matches!(outcome, Probe::Failed(_) | Probe::Timeout));
    }
}
