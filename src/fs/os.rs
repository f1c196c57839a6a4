//! Filesystem capability backed by the real disk.

use super::{FileSystem, atomic_write, clean_path};
use crate::error::Result;
use crate::glob;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Disk-backed [`FileSystem`]. Writes are atomic (temp file + rename).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        atomic_write(path, content)
    }

    fn resolve_path(&self, path: &Path) -> io::Result<PathBuf> {
        if path.is_absolute() {
            Ok(clean_path(path))
        } else {
            Ok(clean_path(&std::env::current_dir()?.join(path)))
        }
    }

    fn glob(&self, patterns: &[String], base_dir: &Path) -> Result<Vec<String>> {
        glob::resolve(patterns, base_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_write_round_trip() {
        let dir = TempDir::new().unwrap();
        let fs = OsFileSystem::new();
        let path = dir.path().join("nested/out.md");

        assert!(!fs.exists(&path));
        fs.write(&path, b"hello").unwrap();
        assert!(fs.exists(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = OsFileSystem::new().read(&dir.path().join("missing.md")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_directories_do_not_exist_as_files() {
        let dir = TempDir::new().unwrap();
        assert!(!OsFileSystem::new().exists(dir.path()));
    }

    #[test]
    fn test_resolve_path_is_absolute() {
        let resolved = OsFileSystem::new().resolve_path(Path::new("a/../b.md")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("b.md"));
    }

    #[test]
    fn test_glob_delegates_to_resolver() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        let found = OsFileSystem::new()
            .glob(&["*.md".to_string()], dir.path())
            .unwrap();
        assert_eq!(found, vec!["a.md"]);
    }
}
