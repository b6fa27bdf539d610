//! Discovery of build artifacts to upload.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ConfigError, ReleaseError, Result};

/// Recursively collect every regular file under `dir`, sorted by path.
///
/// Hidden files (names starting with `.`) are skipped.
pub fn collect_artifacts(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ReleaseError::Configuration(ConfigError::InvalidValue {
            setting: "artifacts dir".to_string(),
            value: dir.display().to_string(),
            reason: "not a directory".to_string(),
        }));
    }

    let mut artifacts = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ReleaseError::Artifact {
                path,
                source: e.into(),
            }
        })?;

        let hidden = entry.file_name().to_str().is_some_and(|n| n.starts_with('.'));
        if entry.file_type().is_file() && !hidden {
            artifacts.push(entry.into_path());
        }
    }

    log::debug!("Found {} artifact(s) under {}", artifacts.len(), dir.display());
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collects_nested_files_in_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("win/x64")).unwrap();
        fs::write(root.join("win/x64/RELEASES"), "manifest").unwrap();
        fs::write(root.join("win/x64/Setup.exe"), "exe").unwrap();
        fs::write(root.join("app.zip"), "zip").unwrap();
        fs::write(root.join(".DS_Store"), "junk").unwrap();

        let artifacts = collect_artifacts(root).unwrap();
        let relative: Vec<PathBuf> = artifacts
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("app.zip"),
                PathBuf::from("win/x64/RELEASES"),
                PathBuf::from("win/x64/Setup.exe"),
            ]
        );
    }

    #[test]
    fn test_missing_directory_is_configuration_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = collect_artifacts(&temp_dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ReleaseError::Configuration(_)));
    }
}
