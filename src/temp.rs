//! Temporary file management module
//!
//! This module provides RAII-based temporary file handling with automatic cleanup.
//! The metadata writer stages its output in a temporary file next to the final
//! destination and persists it with a rename.

use std::fs::{self, File};
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Guard for temporary resources that automatically cleans up on drop
#[derive(Debug)]
pub(crate) enum TempGuard {
    /// Temporary file that will be deleted when dropped
    File(PathBuf),
    /// Temporary directory that will be deleted recursively when dropped
    #[cfg(test)]
    Directory(PathBuf),
}

impl TempGuard {
    /// Get the path to the temporary resource
    pub(crate) fn path(&self) -> &Path {
        match self {
            TempGuard::File(path) => path,
            #[cfg(test)]
            TempGuard::Directory(path) => path,
        }
    }

    /// Moves the temporary resource to its final location
    ///
    /// The guard is consumed. When the rename succeeds there is nothing left to
    /// clean up; when it fails the resource is removed on drop.
    pub(crate) fn persist(self, destination: &Path) -> io::Result<()> {
        fs::rename(self.path(), destination)
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        // Silently ignore errors during cleanup, the resource may already be persisted
        match self {
            TempGuard::File(path) => {
                let _ = fs::remove_file(path);
            }
            #[cfg(test)]
            TempGuard::Directory(path) => {
                let _ = fs::remove_dir_all(path);
            }
        }
    }
}

impl Deref for TempGuard {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.path()
    }
}

/// Creates a temporary file inside `dir` and returns a guard that will clean it up on drop
///
/// The file name is made unique using a ULID (monotonic, sortable unique identifier)
/// and starts with a dot so media servers scanning the folder skip it.
///
/// # Examples
///
/// ```ignore
/// let temp = create_temp_file_in(show_dir, "show_details", "json")?;
/// fs::write(temp.path(), contents)?;
/// temp.persist(&show_dir.join("show_details.json"))?;
/// ```
pub(crate) fn create_temp_file_in(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> io::Result<TempGuard> {
    let ulid = ulid::Ulid::new();
    let filename = format!(".{}_{}.{}", prefix, ulid, extension);

    let path = dir.join(filename);

    File::create(&path)?;

    Ok(TempGuard::File(path))
}

/// Creates a fresh directory in the system's temporary directory
#[cfg(test)]
pub(crate) fn create_temp_dir(prefix: &str) -> io::Result<TempGuard> {
    let ulid = ulid::Ulid::new();
    let path = std::env::temp_dir().join(format!("{}_{}", prefix, ulid));

    fs::create_dir_all(&path)?;

    Ok(TempGuard::Directory(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_file_in() {
        let dir = create_temp_dir("temp_test").unwrap();
        let temp = create_temp_file_in(&dir, "test", "txt").unwrap();
        let path = temp.path().to_path_buf();

        assert!(path.is_file());
        assert_eq!(path.parent(), Some(dir.path()));

        let filename = path.file_name().unwrap().to_str().unwrap();
        assert!(filename.starts_with(".test_"));
        assert!(filename.ends_with(".txt"));

        drop(temp);
        assert!(!path.exists());
    }

    #[test]
    fn test_multiple_temp_files_unique() {
        let dir = create_temp_dir("temp_test").unwrap();
        let temp1 = create_temp_file_in(&dir, "test", "txt").unwrap();
        let temp2 = create_temp_file_in(&dir, "test", "txt").unwrap();

        assert_ne!(temp1.path(), temp2.path());
        assert!(temp1.path().exists());
        assert!(temp2.path().exists());
    }

    #[test]
    fn test_persist_moves_file_and_survives_drop() {
        let dir = create_temp_dir("temp_test").unwrap();
        let destination = dir.join("final.json");
        fs::write(&destination, "old").unwrap();

        let temp = create_temp_file_in(&dir, "final", "json").unwrap();
        let staged = temp.path().to_path_buf();
        fs::write(temp.path(), "new").unwrap();
        temp.persist(&destination).unwrap();

        assert!(!staged.exists());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "new");
    }

    #[test]
    fn test_temp_dir_cleanup_on_drop() {
        let path = {
            let dir = create_temp_dir("cleanup_test").unwrap();
            fs::create_dir(dir.join("nested")).unwrap();
            fs::write(dir.join("nested").join("file.txt"), "x").unwrap();
            dir.path().to_path_buf()
        };

        assert!(!path.exists());
    }
}
