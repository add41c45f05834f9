//! Reference-document discovery and upload.
//!
//! The loader scans one directory non-recursively, keeps `.csv`/`.txt`
//! entries, and uploads them sequentially through the provider. File names
//! are sorted before uploading so history construction does not depend on
//! platform directory-listing order. Initialization is all-or-nothing: a
//! single failed upload, or an empty match set, fails the whole operation.

use std::fs;
use std::path::{Path, PathBuf};

use chat_provider::{ChatProvider, UploadedFile};

use crate::error::SessionInitError;

fn is_reference_file(file_name: &str) -> bool {
    file_name.ends_with(".csv") || file_name.ends_with(".txt")
}

/// Enumerate matching reference files in `directory`, sorted by name.
pub fn reference_file_paths(directory: &Path) -> Result<Vec<PathBuf>, SessionInitError> {
    let entries = fs::read_dir(directory).map_err(|source| SessionInitError::ReadDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SessionInitError::ReadDir {
            path: directory.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_reference_file);
        if matches {
            paths.push(path);
        }
    }

    paths.sort();

    if paths.is_empty() {
        return Err(SessionInitError::NoMatchingFiles {
            path: directory.to_path_buf(),
        });
    }

    Ok(paths)
}

/// Upload every matching reference file, in sorted order, one at a time.
pub fn upload_reference_files(
    provider: &dyn ChatProvider,
    directory: &Path,
) -> Result<Vec<UploadedFile>, SessionInitError> {
    let paths = reference_file_paths(directory)?;

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let uploaded = provider.upload_file(path)?;
        tracing::debug!(path = %path.display(), name = %uploaded.name, "uploaded reference file");
        files.push(uploaded);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chat_provider_mock::MockProvider;
    use tempfile::TempDir;

    use super::*;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("temp dir should be created");
        for name in files {
            fs::write(dir.path().join(name), b"fixture").expect("fixture file should be written");
        }
        dir
    }

    #[test]
    fn only_csv_and_txt_entries_match() {
        let dir = dir_with(&["notes.txt", "menu.csv", "image.png", "README.md"]);

        let paths = reference_file_paths(dir.path()).expect("matching files should be found");
        let names: Vec<_> = paths
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect();

        assert_eq!(names, vec!["menu.csv", "notes.txt"]);
    }

    #[test]
    fn matches_are_sorted_by_file_name() {
        let dir = dir_with(&["zebra.txt", "alpha.txt", "mid.csv"]);

        let paths = reference_file_paths(dir.path()).expect("matching files should be found");
        let names: Vec<_> = paths
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect();

        assert_eq!(names, vec!["alpha.txt", "mid.csv", "zebra.txt"]);
    }

    #[test]
    fn subdirectories_are_not_descended_into() {
        let dir = dir_with(&["notes.txt"]);
        fs::create_dir(dir.path().join("nested")).expect("nested dir should be created");
        fs::write(dir.path().join("nested").join("inner.txt"), b"fixture")
            .expect("nested fixture should be written");

        let paths = reference_file_paths(dir.path()).expect("matching files should be found");
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn zero_matching_files_is_an_error() {
        let dir = dir_with(&["image.png"]);

        assert!(matches!(
            reference_file_paths(dir.path()),
            Err(SessionInitError::NoMatchingFiles { .. })
        ));
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let dir = TempDir::new().expect("temp dir should be created");
        let missing = dir.path().join("does-not-exist");

        assert!(matches!(
            reference_file_paths(&missing),
            Err(SessionInitError::ReadDir { .. })
        ));
    }

    #[test]
    fn uploads_preserve_sorted_enumeration_order() {
        let dir = dir_with(&["zebra.txt", "alpha.csv"]);
        let provider = MockProvider::default();

        let files =
            upload_reference_files(&provider, dir.path()).expect("uploads should succeed");

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].display_name, "alpha.csv");
        assert_eq!(files[1].display_name, "zebra.txt");
    }

    #[test]
    fn one_failed_upload_fails_the_whole_operation() {
        let dir = dir_with(&["alpha.txt", "beta.txt"]);
        let provider = MockProvider::default().with_failing_uploads();

        assert!(matches!(
            upload_reference_files(&provider, dir.path()),
            Err(SessionInitError::Upload(_))
        ));
    }
}
