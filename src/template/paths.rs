//! Path resolution for `file`, `include` and `reference` arguments.
//!
//! Precedence:
//!
//! 1. A native absolute path that does not start with `/` (a drive prefix
//!    or UNC path on Windows) is used unchanged.
//! 2. A leading `/` is rooted at the project base directory, not the
//!    filesystem root.
//! 3. Any other absolute path is used unchanged.
//! 4. `./` and `../` paths resolve against the directory of the file being
//!    rendered, when there is one.
//! 5. Everything else resolves against the project base directory, even
//!    inside an included file.

use crate::fs::clean_path;
use std::path::{Path, PathBuf};

/// Resolve a template path argument to a filesystem path.
pub fn resolve(path: &str, base: &Path, current_file: Option<&Path>) -> PathBuf {
    let as_path = Path::new(path);

    if as_path.is_absolute() && !path.starts_with('/') {
        return as_path.to_path_buf();
    }

    if let Some(rooted) = path.strip_prefix('/') {
        return clean_path(&base.join(rooted.trim_start_matches('/')));
    }

    if as_path.is_absolute() {
        return as_path.to_path_buf();
    }

    if is_explicit_relative(path)
        && let Some(dir) = current_file.and_then(Path::parent)
    {
        return clean_path(&dir.join(path));
    }

    clean_path(&base.join(path))
}

fn is_explicit_relative(path: &str) -> bool {
    const MARKERS: &[&str] = &["./", "../"];
    if MARKERS.iter().any(|m| path.starts_with(m)) {
        return true;
    }
    cfg!(windows) && (path.starts_with(".\\") || path.starts_with("..\\"))
}

/// Display form of a resolved path: relative to `base` with forward slashes
/// when it lies inside `base`, otherwise the path as-is.
pub fn display_relative(resolved: &Path, base: &Path) -> String {
    match resolved.strip_prefix(base) {
        Ok(rel) if !rel.as_os_str().is_empty() => crate::glob::to_slash(rel),
        _ => resolved.display().to_string(),
    }
}
