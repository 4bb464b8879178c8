// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-level tests for the registry and the obsolete ledger.

use pluginwatch_core::{CiSystem, PluginwatchError, Vcs};
use pluginwatch_registry::{obsolete, store};

const CHECKED_YML: &str = r#"---
fluent-plugin-archived:
  homepage_uri: https://github.com/x/fluent-plugin-archived
  vcs: https://github.com/x/fluent-plugin-archived
  ci: travis
  archived: true
  archived_at: '2024-01-01'
  checked_at: '2025-06-13'
fluent-plugin-gone:
  homepage_uri: ''
  vcs: false
  updated_at: '2025-06-01'
fluent-plugin-ok:
  homepage_uri: https://github.com/x/fluent-plugin-ok
  vcs: https://github.com/x/fluent-plugin-ok
  ci: github
  checked_at: '2025-06-13'
"#;

#[test]
fn historical_registry_loads_and_saves_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("checked.yml");
    let output = dir.path().join("out/checked.yml");
    std::fs::write(&input, CHECKED_YML).unwrap();

    let registry = store::load(&input).unwrap();
    assert_eq!(registry.len(), 3);
    let ok = registry.get("fluent-plugin-ok").unwrap();
    assert_eq!(ok.ci, Some(CiSystem::Github));
    assert_eq!(ok.vcs, Some(Vcs::Url("https://github.com/x/fluent-plugin-ok".into())));

    store::save(&registry, &output).unwrap();
    let reloaded = store::load(&output).unwrap();
    assert_eq!(reloaded, registry);
}

#[test]
fn corrupt_registry_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("checked.yml");
    std::fs::write(&input, "fluent-plugin-a:\n  vcs: true\n").unwrap();

    let err = store::load(&input).unwrap_err();
    assert!(matches!(err, PluginwatchError::CorruptData { .. }));
    assert!(err.to_string().contains("checked.yml"));
    assert!(err.is_fatal());
}

#[test]
fn registry_to_ledger_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let checked = dir.path().join("checked.yml");
    let ledger_path = dir.path().join("obsolete-plugins.yml");
    std::fs::write(&checked, CHECKED_YML).unwrap();
    std::fs::write(
        &ledger_path,
        "---\nfluent-plugin-archived: |+\n  Unmaintained since 2023-05-01.\n\n",
    )
    .unwrap();

    let registry = store::load(&checked).unwrap();
    let mut ledger = obsolete::load(&ledger_path).unwrap();
    let stats = obsolete::merge_from_registry(&mut ledger, &registry, false);
    obsolete::save(&ledger, &ledger_path).unwrap();

    assert_eq!(stats.gone_away, 1);
    assert_eq!(stats.appended, 1);

    let text = std::fs::read_to_string(&ledger_path).unwrap();
    assert_eq!(
        text,
        "---\n\
         fluent-plugin-archived: |+\n  \
         Unmaintained since 2023-05-01.\n  \
         Unmaintained since 2024-01-01.\n\
         fluent-plugin-gone: |+\n  \
         Git repository has gone away.\n"
    );
}
