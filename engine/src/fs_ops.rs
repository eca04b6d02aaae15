//! Filesystem operations module.
//!
//! This module provides low-level operations for:
//! - Copying files with modification time preservation
//! - Creating parent directories on demand
//! - Resolving a destination path under a collision mode

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use crate::error::EngineError;
use crate::model::CollisionMode;

/// Highest numeric suffix tried by `find_available_name`.
const MAX_RENAME_ATTEMPTS: u32 = 10_000;

/// Copy a file from source to destination, preserving its modification time.
///
/// # Arguments
/// * `src` - Source file path
/// * `dst` - Destination file path
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// Returns EngineError if the copy fails
pub fn copy_file_with_metadata(src: &Path, dst: &Path) -> Result<u64, EngineError> {
    ensure_parent_dir_exists(dst)?;

    let mut src_file = fs::File::open(src).map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let src_mtime = src_file
        .metadata()
        .map_err(|e| EngineError::ReadError {
            path: src.to_path_buf(),
            source: e,
        })?
        .modified()
        .ok();

    let mut dst_file = fs::File::create(dst).map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let bytes_copied = io::copy(&mut src_file, &mut dst_file).map_err(|e| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            EngineError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            }
        } else {
            EngineError::ReadError {
                path: src.to_path_buf(),
                source: e,
            }
        }
    })?;

    if let Some(mtime) = src_mtime {
        let _ = filetime::set_file_mtime(dst, filetime::FileTime::from_system_time(mtime));
    }

    Ok(bytes_copied)
}

/// Ensure the parent directory of a path exists, creating it if necessary.
///
/// # Errors
/// Returns EngineError if directory creation fails or the parent is a file
pub fn ensure_parent_dir_exists(path: &Path) -> Result<(), EngineError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };

    match fs::metadata(parent) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(EngineError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "Parent path exists but is not a directory",
            ),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })
        }
        Err(e) => Err(EngineError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: e,
        }),
    }
}

/// Find a free sibling name by appending `_1`, `_2`, ... to the file stem.
///
/// Returns `path` unchanged if it is free, or if no free name was found
/// within the attempt limit.
pub fn find_available_name(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or(Path::new(""));

    (1..=MAX_RENAME_ATTEMPTS)
        .map(|counter| parent.join(format!("{}_{}{}", stem, counter, ext)))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Decide where a file should be written under the given collision mode.
///
/// Returns `None` when the file must be skipped.
pub fn resolve_destination(dest: &Path, mode: CollisionMode) -> Option<PathBuf> {
    if !dest.exists() {
        return Some(dest.to_path_buf());
    }

    match mode {
        CollisionMode::Skip => None,
        CollisionMode::Rename => Some(find_available_name(dest)),
        CollisionMode::Overwrite => Some(dest.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_copy_file_with_metadata() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("source.txt");
        let dst_file = temp_dir.path().join("nested").join("dest.txt");

        let mut file = fs::File::create(&src_file).expect("Failed to create source");
        file.write_all(b"test content").expect("Failed to write source");
        drop(file);

        let bytes = copy_file_with_metadata(&src_file, &dst_file).expect("Failed to copy");
        assert_eq!(bytes, 12);

        let content = fs::read_to_string(&dst_file).expect("Failed to read dest");
        assert_eq!(content, "test content");

        let src_mtime = fs::metadata(&src_file).unwrap().modified().unwrap();
        let dst_mtime = fs::metadata(&dst_file).unwrap().modified().unwrap();
        assert_eq!(src_mtime, dst_mtime);
    }

    #[test]
    fn test_copy_missing_source_is_read_error() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = copy_file_with_metadata(
            &temp_dir.path().join("missing.txt"),
            &temp_dir.path().join("out.txt"),
        );
        assert!(matches!(result, Err(EngineError::ReadError { .. })));
    }

    #[test]
    fn test_ensure_parent_dir_exists() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("subdir").join("file.txt");

        ensure_parent_dir_exists(&path).expect("Failed to create parent");

        assert!(path.parent().unwrap().exists());
    }

    #[test]
    fn test_ensure_parent_dir_rejects_file_parent() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = ensure_parent_dir_exists(&blocker.join("file.txt"));
        assert!(matches!(result, Err(EngineError::DirectoryCreationFailed { .. })));
    }

    #[test]
    fn test_find_available_name_appends_counter() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("report.txt");
        assert_eq!(find_available_name(&path), path);

        fs::write(&path, "a").unwrap();
        assert_eq!(find_available_name(&path), temp_dir.path().join("report_1.txt"));

        fs::write(temp_dir.path().join("report_1.txt"), "b").unwrap();
        assert_eq!(find_available_name(&path), temp_dir.path().join("report_2.txt"));
    }

    #[test]
    fn test_find_available_name_without_extension() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("Makefile");
        fs::write(&path, "all:").unwrap();
        assert_eq!(find_available_name(&path), temp_dir.path().join("Makefile_1"));
    }

    #[test]
    fn test_resolve_destination_per_mode() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let free = temp_dir.path().join("free.txt");
        let taken = temp_dir.path().join("taken.txt");
        fs::write(&taken, "x").unwrap();

        for mode in CollisionMode::ALL {
            assert_eq!(resolve_destination(&free, mode), Some(free.clone()));
        }
        assert_eq!(resolve_destination(&taken, CollisionMode::Skip), None);
        assert_eq!(resolve_destination(&taken, CollisionMode::Overwrite), Some(taken.clone()));
        assert_eq!(
            resolve_destination(&taken, CollisionMode::Rename),
            Some(temp_dir.path().join("taken_1.txt"))
        );
    }
}
