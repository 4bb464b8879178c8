// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment errors are turned into [`ConfigError`]s that miette can render
//! with a source excerpt and, for misspelled keys, a suggestion.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a candidate must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {section}")]
    #[diagnostic(
        code(pluginwatch::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// `[checks]`-style section name, or "the top level".
        section: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a pluginwatch setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(pluginwatch::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(code(pluginwatch::config::missing_key))]
    MissingKey { key: String },

    /// A value that deserialized fine but cannot be used.
    #[error("invalid `{key}`: {message}")]
    #[diagnostic(
        code(pluginwatch::config::invalid_value),
        help("fix `{key}` in pluginwatch.toml or the matching PLUGINWATCH_ variable")
    )]
    Validation { key: String, message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(pluginwatch::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Known keys here: {valid_keys}"),
        None => format!("known keys here: {valid_keys}"),
    }
}

/// Locates keys in the TOML files that fed the figment.
struct Sources<'a> {
    files: &'a [(String, String)],
}

impl<'a> Sources<'a> {
    /// Path and content of the file the error came from, if it was a file.
    fn origin(&self, error: &figment::Error) -> Option<(&'a str, &'a str)> {
        let path = match error.metadata.as_ref()?.source.as_ref()? {
            figment::Source::File(path) => path.display().to_string(),
            _ => return None,
        };
        self.files
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(p, content)| (p.as_str(), content.as_str()))
    }

    fn locate(
        &self,
        error: &figment::Error,
        field: &str,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let Some((path, content)) = self.origin(error) else {
            return (None, None);
        };
        let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
        match find_key_offset(content, &section, field) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.to_string())),
            ),
            None => (None, None),
        }
    }
}

fn dotted(path: &[String]) -> String {
    path.join(".")
}

/// Convert a figment error (which may hold several) into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let sources = Sources {
        files: toml_sources,
    };

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = sources.locate(&error, field);
                let section = if error.path.is_empty() {
                    "the top level".to_string()
                } else {
                    format!("[{}]", dotted(&error.path))
                };
                ConfigError::UnknownKey {
                    key: field.clone(),
                    section,
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => {
                let mut path = error.path.clone();
                path.push(field.to_string());
                ConfigError::MissingKey { key: dotted(&path) }
            }
            Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                key: dotted(&error.path),
                found: found.to_string(),
                expected: expected.clone(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Byte offset of `field` as a key inside the `[section]` named by `path`.
///
/// An empty `path` means keys before the first section header.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let wanted = dotted(path);
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let trimmed = line.trim_start();

        if let Some(header) = trimmed.strip_prefix('[') {
            current = header
                .split(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            continue;
        }
        if current != wanted {
            continue;
        }
        let Some((key, _)) = trimmed.split_once('=') else {
            continue;
        };
        if key.trim_end() == field {
            return Some(start + line.len() - trimmed.len());
        }
    }
    None
}

/// Closest known key to `unknown`, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print each error to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
    if errors.len() > 1 {
        eprintln!("{} configuration errors", errors.len());
    }
}
