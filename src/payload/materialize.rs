//! Locating caption files written to disk by an external tool.

use crate::error::{Result, UndertekstError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a scratch directory under `parent`, removed when dropped.
pub fn scratch_dir(parent: &Path) -> Result<TempDir> {
    std::fs::create_dir_all(parent)?;
    let dir = tempfile::Builder::new()
        .prefix("captions-")
        .tempdir_in(parent)?;
    Ok(dir)
}

/// Locate the caption file for `language_code` in `dir`.
///
/// Looks for `<video_id>.<lang>.json3` first, then any file in the
/// directory whose name ends with `.<lang>.json3`.
pub fn find_caption_file(dir: &Path, video_id: &str, language_code: &str) -> Result<PathBuf> {
    let suffix = format!(".{}.json3", language_code);

    let expected = dir.join(format!("{}{}", video_id, suffix));
    if expected.exists() {
        return Ok(expected);
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| UndertekstError::Retrieval(format!("Cannot read directory: {e}")))?;

    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            return Ok(entry.path());
        }
    }

    Err(UndertekstError::Retrieval(format!(
        "No {} caption file written for {}",
        language_code, video_id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_expected_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dQw4w9WgXcQ.ko.json3");
        std::fs::write(&path, "{}").unwrap();

        let found = find_caption_file(dir.path(), "dQw4w9WgXcQ", "ko").unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_falls_back_to_suffix_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("renamed.en-US.json3"), "{}").unwrap();
        std::fs::write(dir.path().join("renamed.en.vtt"), "").unwrap();

        let found = find_caption_file(dir.path(), "dQw4w9WgXcQ", "en-US").unwrap();
        assert!(found.ends_with("renamed.en-US.json3"));
    }

    #[test]
    fn test_language_must_match_exactly() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.en-US.json3"), "{}").unwrap();

        let err = find_caption_file(dir.path(), "dQw4w9WgXcQ", "en").unwrap_err();
        assert!(matches!(err, UndertekstError::Retrieval(_)));
    }

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = scratch_dir(&parent.path().join("nested")).unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());

        drop(scratch);
        assert!(!path.exists());
    }
}
