// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-file overwrite via write-then-rename.

use std::io::Write;
use std::path::Path;

use pluginwatch_core::PluginwatchError;
use tempfile::NamedTempFile;

/// Write `contents` to `path` atomically.
///
/// The data lands in a temp file next to the target and is renamed over it
/// only once fully written, so readers see either the old or the new file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), PluginwatchError> {
    let shown = path.display().to_string();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| PluginwatchError::io(&shown, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| PluginwatchError::io(&shown, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.flush())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| PluginwatchError::io(&shown, e))?;
    tmp.persist(path)
        .map_err(|e| PluginwatchError::io(&shown, e.error))?;

    tracing::debug!(path = %shown, bytes = contents.len(), "file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yml");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/out.yml");

        write_atomic(&path, "content").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yml");
        write_atomic(&path, "content").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }
}
