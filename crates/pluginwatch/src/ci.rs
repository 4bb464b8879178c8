// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pluginwatch ci` command implementation.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Args;
use pluginwatch_config::PluginwatchConfig;
use pluginwatch_core::PluginwatchError;
use pluginwatch_liveness::GithubClient;
use pluginwatch_reconcile::{RunStats, StalenessPolicy, detect_ci_pass};
use pluginwatch_registry::store;

#[derive(Args, Debug, Default)]
pub struct CiArgs {
    /// Registry to update.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Write the result here instead of over the registry.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn run_ci(
    config: &PluginwatchConfig,
    args: &CiArgs,
    token: &str,
    today: NaiveDate,
) -> Result<RunStats, PluginwatchError> {
    let registry_path = crate::resolve_path(&args.registry, &config.paths.registry);
    let output = args.output.clone().unwrap_or_else(|| registry_path.clone());

    let registry = store::load(&registry_path)?;
    let host = GithubClient::new(token, Duration::from_secs(config.checks.timeout_secs))?
        .with_base_urls(&config.host.api_base, &config.host.web_base);
    let policy = StalenessPolicy::new(config.checks.recheck_interval_days);

    let (updated, stats) =
        detect_ci_pass(&registry, &host, &policy, config.checks.max_records, today).await;
    store::save(&updated, &output)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluginwatch_core::{CiSystem, PluginRecord, Vcs};
    use pluginwatch_registry::Registry;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn writes_detected_ci() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/o/fluent-plugin-a/contents/.circleci"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = PluginwatchConfig::default();
        config.paths.registry = dir.path().join("checked.yml").display().to_string();
        config.host.api_base = server.uri();
        config.host.web_base = server.uri();

        let mut record = PluginRecord::new("fluent-plugin-a");
        record.vcs = Some(Vcs::Url("https://github.com/o/fluent-plugin-a".into()));
        let registry = Registry::from_records([record, PluginRecord::new("fluent-plugin-b")]);
        store::save(&registry, std::path::Path::new(&config.paths.registry)).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let stats = run_ci(&config, &CiArgs::default(), "token", today).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.no_vcs, 1);

        let updated = store::load(std::path::Path::new(&config.paths.registry)).unwrap();
        assert_eq!(updated.get("fluent-plugin-a").unwrap().ci, Some(CiSystem::CircleCi));
        assert!(updated.get("fluent-plugin-b").unwrap().ci.is_none());
    }
}
