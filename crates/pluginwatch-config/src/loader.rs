// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./pluginwatch.toml` > `~/.config/pluginwatch/pluginwatch.toml` >
//! `/etc/pluginwatch/pluginwatch.toml`, with environment variable overrides via
//! the `PLUGINWATCH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PluginwatchConfig;

/// Config sections that env vars can target, e.g. `PLUGINWATCH_CHECKS_STRICT`.
const ENV_SECTIONS: [&str; 6] = ["log", "paths", "index", "checks", "host", "overrides"];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pluginwatch/pluginwatch.toml`
/// 3. `~/.config/pluginwatch/pluginwatch.toml`
/// 4. `./pluginwatch.toml`
/// 5. `PLUGINWATCH_*` environment variables
pub fn load_config() -> Result<PluginwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PluginwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PluginwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PluginwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PluginwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Config files in merge order, lowest precedence first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/pluginwatch/pluginwatch.toml")];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("pluginwatch").join("pluginwatch.toml"));
    }
    files.push(PathBuf::from("pluginwatch.toml"));
    files
}

/// Build the Figment used for standard config loading.
pub fn build_figment() -> Figment {
    config_file_candidates()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(PluginwatchConfig::default())),
            |figment, file| figment.merge(Toml::file(file)),
        )
        .merge(env_provider())
}

/// Environment provider mapping `PLUGINWATCH_<SECTION>_<KEY>` to `section.key`.
///
/// Only the leading section name is split off, so keys that contain
/// underscores (`recheck_interval_days`) survive intact.
fn env_provider() -> Env {
    Env::prefixed("PLUGINWATCH_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_override_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PLUGINWATCH_CHECKS_RECHECK_INTERVAL_DAYS", "3");
            jail.set_env("PLUGINWATCH_CHECKS_STRICT", "true");
            jail.set_env("PLUGINWATCH_HOST_TOKEN_ENV", "GITHUB_FLUENT_ACCESS_TOKEN");

            let config = load_config().expect("env overrides should load");
            assert_eq!(config.checks.recheck_interval_days, 3);
            assert!(config.checks.strict);
            assert_eq!(config.host.token_env, "GITHUB_FLUENT_ACCESS_TOKEN");
            Ok(())
        });
    }

    #[test]
    fn local_file_is_layered_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "pluginwatch.toml",
                r#"
[paths]
registry = "custom/checked.yml"
"#,
            )?;

            let config = load_config().expect("local file should load");
            assert_eq!(config.paths.registry, "custom/checked.yml");
            assert_eq!(config.paths.index, "data/plugins.json");
            Ok(())
        });
    }
}
