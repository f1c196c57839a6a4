//! In-memory filesystem capability.

use super::{FileSystem, clean_path};
use crate::error::Result;
use crate::glob;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// A [`FileSystem`] holding every file in a map keyed by absolute path.
///
/// Relative paths are resolved against `/`. Directories exist implicitly.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filesystem from `(path, content)` pairs.
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<Path>,
        C: AsRef<[u8]>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.insert(path, content);
        }
        fs
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        self.files
            .borrow_mut()
            .insert(absolute(path.as_ref()), content.as_ref().to_vec());
    }

    /// Current text content of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .borrow()
            .get(&absolute(path.as_ref()))
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.has_root() {
        clean_path(path)
    } else {
        clean_path(&Path::new("/").join(path))
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(&absolute(path))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file: {}", path.display()),
                )
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(&absolute(path))
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        self.insert(path, content);
        Ok(())
    }

    fn resolve_path(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(absolute(path))
    }

    fn glob(&self, patterns: &[String], base_dir: &Path) -> Result<Vec<String>> {
        let base = absolute(base_dir);
        let files = self.files.borrow();
        let candidates: Vec<String> = files
            .keys()
            .filter_map(|p| p.strip_prefix(&base).ok())
            .map(glob::to_slash)
            .collect();
        glob::resolve_among(patterns, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_and_absolute_paths_agree() {
        let fs = MemoryFileSystem::with_files([("proj/a.md", "A")]);
        assert!(fs.exists(Path::new("/proj/a.md")));
        assert!(fs.exists(Path::new("proj/./a.md")));
        assert_eq!(fs.read_to_string(Path::new("/proj/a.md")).unwrap(), "A");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let fs = MemoryFileSystem::new();
        let err = fs.read(Path::new("/nope.md")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_write_then_read() {
        let fs = MemoryFileSystem::new();
        fs.write(Path::new("/out/deep/x.md"), b"x").unwrap();
        assert_eq!(fs.contents("/out/deep/x.md").as_deref(), Some("x"));
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_glob_is_scoped_to_base() {
        let fs = MemoryFileSystem::with_files([
            ("/proj/memories/a.md", ""),
            ("/proj/memories/drafts/b.md", ""),
            ("/other/memories/c.md", ""),
        ]);
        let found = fs
            .glob(
                &["memories/**/*.md".to_string(), "!**/drafts/**".to_string()],
                Path::new("/proj"),
            )
            .unwrap();
        assert_eq!(found, vec!["memories/a.md"]);
    }
}
