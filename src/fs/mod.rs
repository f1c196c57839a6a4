//! Filesystem capability for agentdocs.
//!
//! The pipeline and template engine never touch `std::fs` directly. They go
//! through the [`FileSystem`] trait so that a run can be pointed at the real
//! disk ([`OsFileSystem`]) or at an in-memory tree ([`MemoryFileSystem`]).

pub mod atomic;
mod memory;
mod os;

pub use atomic::atomic_write;
pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;

use crate::error::Result;
use std::io;
use std::path::{Component, Path, PathBuf};

/// File access used by a resolve-render-write pass.
///
/// Operations are synchronous and never retried; the first failure is
/// surfaced to the caller.
pub trait FileSystem {
    /// Read a whole file. A missing file yields `io::ErrorKind::NotFound`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Whether `path` exists as a regular file.
    fn exists(&self, path: &Path) -> bool;

    /// Write a whole file, creating intermediate directories.
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Make `path` absolute.
    fn resolve_path(&self, path: &Path) -> io::Result<PathBuf>;

    /// Expand include/exclude glob patterns under `base_dir`.
    fn glob(&self, patterns: &[String], base_dir: &Path) -> Result<Vec<String>>;

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Symlinks are not consulted.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => true,
                    _ => false,
                };
                if !popped {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/root/sub/./y.md")), PathBuf::from("/root/sub/y.md"));
        assert_eq!(clean_path(Path::new("/root/sub/../y.md")), PathBuf::from("/root/y.md"));
        assert_eq!(clean_path(Path::new("/../y.md")), PathBuf::from("/y.md"));
        assert_eq!(clean_path(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
    }
}
