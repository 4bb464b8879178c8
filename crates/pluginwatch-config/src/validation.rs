// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::PluginwatchConfig;

/// Validate a deserialized configuration.
///
/// Collects every error instead of failing fast.
pub fn validate_config(config: &PluginwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, value) in [
        ("paths.index", &config.paths.index),
        ("paths.registry", &config.paths.registry),
        ("paths.obsolete", &config.paths.obsolete),
        ("host.api_base", &config.host.api_base),
        ("host.web_base", &config.host.web_base),
        ("host.token_env", &config.host.token_env),
    ] {
        if value.trim().is_empty() {
            errors.push(invalid(key, "must not be empty"));
        }
    }

    if !config.index.url.starts_with("http://") && !config.index.url.starts_with("https://") {
        errors.push(invalid(
            "index.url",
            format!("`{}` is not an http(s) URL", config.index.url),
        ));
    }

    if config.checks.timeout_secs == 0 {
        errors.push(invalid("checks.timeout_secs", "must be at least 1"));
    }

    if config.checks.recheck_interval_days == 0 {
        errors.push(invalid("checks.recheck_interval_days", "must be at least 1"));
    }

    if config.checks.max_records == Some(0) {
        errors.push(invalid("checks.max_records", "must be at least 1 when set"));
    }

    for (list, names) in [
        ("archived", &config.overrides.archived),
        ("lost", &config.overrides.lost),
        ("verified", &config.overrides.verified),
    ] {
        if names.iter().any(|name| name.trim().is_empty()) {
            errors.push(invalid(
                format!("overrides.{list}"),
                "contains an empty plugin name",
            ));
        }
    }

    warn_on_overlapping_overrides(config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn invalid(key: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        key: key.into(),
        message: message.into(),
    }
}

/// A name listed twice is legal (lost > archived > verified) but worth a look.
fn warn_on_overlapping_overrides(config: &PluginwatchConfig) {
    let lost: HashSet<&String> = config.overrides.lost.iter().collect();
    let archived: HashSet<&String> = config.overrides.archived.iter().collect();

    for name in &config.overrides.archived {
        if lost.contains(name) {
            tracing::warn!(plugin = %name, "listed as both lost and archived; lost wins");
        }
    }
    for name in &config.overrides.verified {
        if lost.contains(name) || archived.contains(name) {
            tracing::warn!(plugin = %name, "verified override shadowed by another list");
        }
    }
}
