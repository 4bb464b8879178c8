// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository-name mismatch heuristic.

/// Whether `url` probably points at a different project than `name`.
///
/// One trailing `/` and then a `.git` suffix are ignored; the remaining last
/// path segment must equal the plugin name exactly.
pub fn suspicious_vcs(name: &str, url: &str) -> bool {
    let url = url.strip_suffix('/').unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);
    url.rsplit('/').next() != Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_git_url_is_fine() {
        assert!(!suspicious_vcs(
            "fluent-plugin-foo",
            "https://github.com/bar/fluent-plugin-foo.git"
        ));
    }

    #[test]
    fn other_repo_is_suspicious() {
        assert!(suspicious_vcs(
            "fluent-plugin-foo",
            "https://github.com/bar/other-repo/"
        ));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert!(!suspicious_vcs(
            "fluent-plugin-foo",
            "https://github.com/bar/fluent-plugin-foo/"
        ));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(suspicious_vcs(
            "fluent-plugin-foo",
            "https://github.com/bar/Fluent-Plugin-Foo"
        ));
    }

    #[test]
    fn owner_page_is_suspicious() {
        assert!(suspicious_vcs("fluent-plugin-foo", "https://github.com/bar"));
    }
}
