//! Input file resolution from ordered include/exclude glob patterns.
//!
//! Patterns prefixed with `!` exclude; all others include. `*` never crosses
//! a `/`, `**` spans any number of directories. Results are repo-relative
//! paths with forward slashes, sorted lexicographically. That order is the
//! concatenation order for every later stage.

use crate::error::{AgentDocsError, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Characters that make a path segment a pattern rather than a literal.
const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '\\'];

/// Compiled include/exclude pattern set.
#[derive(Debug)]
pub struct PatternSet {
    include: GlobSet,
    exclude: GlobSet,
    /// Literal directory prefix of each include pattern, deduplicated.
    roots: BTreeSet<String>,
}

impl PatternSet {
    /// Compile an ordered pattern list.
    ///
    /// Fails on the first malformed pattern; nothing is partially compiled.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut roots = BTreeSet::new();

        for raw in patterns {
            let raw = raw.as_ref();
            match raw.strip_prefix('!') {
                Some(negated) => {
                    exclude.add(build_glob(raw, negated)?);
                }
                None => {
                    let normalized = normalize_pattern(raw);
                    include.add(build_glob(raw, normalized)?);
                    roots.insert(literal_root(normalized));
                }
            }
        }

        let include = include.build().map_err(|e| {
            AgentDocsError::InputResolution(format!("failed to build include patterns: {}", e))
        })?;
        let exclude = exclude.build().map_err(|e| {
            AgentDocsError::InputResolution(format!("failed to build exclude patterns: {}", e))
        })?;

        Ok(Self {
            include,
            exclude,
            roots,
        })
    }

    /// True when at least one include pattern was given.
    pub fn has_includes(&self) -> bool {
        !self.roots.is_empty()
    }

    /// Whether a relative path survives the pattern set.
    pub fn is_match(&self, relative: &str) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }
}

fn build_glob(raw: &str, pattern: &str) -> Result<Glob> {
    GlobBuilder::new(normalize_pattern(pattern))
        .literal_separator(true)
        .build()
        .map_err(|e| {
            AgentDocsError::InputResolution(format!("invalid glob pattern '{}': {}", raw, e))
        })
}

fn normalize_pattern(pattern: &str) -> &str {
    pattern.strip_prefix("./").unwrap_or(pattern)
}

/// The leading literal directory components of a pattern.
///
/// `docs/memories/**/*.md` walks from `docs/memories`; `*.md` walks from the
/// base directory itself (empty root).
fn literal_root(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').collect();
    let dirs = &segments[..segments.len().saturating_sub(1)];
    dirs.iter()
        .take_while(|s| !s.contains(GLOB_META))
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve patterns against files on disk under `base_dir`.
///
/// Only regular files are kept; matched directories are discarded, and
/// entries that cannot be read are skipped. A pattern list with no include
/// entries resolves to nothing.
pub fn resolve<S: AsRef<str>>(patterns: &[S], base_dir: &Path) -> Result<Vec<String>> {
    let set = PatternSet::compile(patterns)?;
    if !set.has_includes() {
        return Ok(Vec::new());
    }

    let mut matched = BTreeSet::new();
    for root in &set.roots {
        let walk_root = if root.is_empty() {
            base_dir.to_path_buf()
        } else {
            base_dir.join(root)
        };
        if !walk_root.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&walk_root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(root = %walk_root.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.path().is_file() {
                continue;
            }
            let Ok(sub) = entry.path().strip_prefix(&walk_root) else {
                continue;
            };
            let sub = to_slash(sub);
            let relative = if root.is_empty() {
                sub
            } else {
                format!("{}/{}", root, sub)
            };
            if set.is_match(&relative) {
                matched.insert(relative);
            }
        }
    }

    debug!(
        base = %base_dir.display(),
        count = matched.len(),
        "resolved input patterns"
    );
    Ok(matched.into_iter().collect())
}

/// Resolve patterns against an explicit list of candidate relative paths.
///
/// Used by filesystems that can enumerate their files without walking a
/// directory tree.
pub fn resolve_among<S, I, C>(patterns: &[S], candidates: I) -> Result<Vec<String>>
where
    S: AsRef<str>,
    I: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    let set = PatternSet::compile(patterns)?;
    if !set.has_includes() {
        return Ok(Vec::new());
    }

    let matched: BTreeSet<String> = candidates
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .filter(|c| set.is_match(c))
        .collect();
    Ok(matched.into_iter().collect())
}

/// Render a relative path with forward slashes on every platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pats(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file).unwrap();
        }
        dir
    }

    #[test]
    fn test_only_exclusions_resolve_to_nothing() {
        let dir = tree(&["a.md", "b.md"]);
        let result = resolve(&pats(&["!a.md", "!**/*.md"]), dir.path()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_pattern_list() {
        let dir = tree(&["a.md"]);
        let result = resolve::<String>(&[], dir.path()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_recursive_match_is_sorted() {
        let dir = tree(&["z.md", "sub/deep/b.md", "a.md", "sub/a.md", "notes.txt"]);
        let result = resolve(&pats(&["**/*.md"]), dir.path()).unwrap();
        assert_eq!(result, vec!["a.md", "sub/a.md", "sub/deep/b.md", "z.md"]);
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let dir = tree(&["a.md", "sub/b.md"]);
        let result = resolve(&pats(&["*.md"]), dir.path()).unwrap();
        assert_eq!(result, vec!["a.md"]);
    }

    #[test]
    fn test_exclusion_is_subset_and_order_independent() {
        let dir = tree(&["a.md", "a_test.md", "sub/b_test.md", "sub/b.md"]);
        let all = resolve(&pats(&["**/*.md"]), dir.path()).unwrap();
        let before = resolve(&pats(&["!**/*_test.md", "**/*.md"]), dir.path()).unwrap();
        let after = resolve(&pats(&["**/*.md", "!**/*_test.md"]), dir.path()).unwrap();

        assert_eq!(before, after);
        assert_eq!(after, vec!["a.md", "sub/b.md"]);
        assert!(after.iter().all(|p| all.contains(p)));
    }

    #[test]
    fn test_overlapping_includes_are_unioned() {
        let dir = tree(&["memories/a.md", "memories/b.md"]);
        let result = resolve(
            &pats(&["memories/*.md", "memories/a.md", "**/*.md"]),
            dir.path(),
        )
        .unwrap();
        assert_eq!(result, vec!["memories/a.md", "memories/b.md"]);
    }

    #[test]
    fn test_directories_are_discarded() {
        let dir = tree(&["docs.md/inner.txt", "x.md"]);
        let result = resolve(&pats(&["*.md"]), dir.path()).unwrap();
        assert_eq!(result, vec!["x.md"]);
    }

    #[test]
    fn test_dot_slash_prefix_is_ignored() {
        let dir = tree(&["commands/run.md"]);
        let result = resolve(&pats(&["./commands/*.md"]), dir.path()).unwrap();
        assert_eq!(result, vec!["commands/run.md"]);
    }

    #[test]
    fn test_missing_root_directory_matches_nothing() {
        let dir = tree(&["a.md"]);
        let result = resolve(&pats(&["nowhere/**/*.md"]), dir.path()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_malformed_pattern_names_offender() {
        let dir = tree(&["a.md"]);
        let err = resolve(&pats(&["*.md", "[unclosed"]), dir.path()).unwrap_err();
        assert!(matches!(err, AgentDocsError::InputResolution(_)));
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_malformed_exclusion_fails() {
        let err = resolve_among(&pats(&["*.md", "![bad"]), ["a.md"]).unwrap_err();
        assert!(err.to_string().contains("![bad"));
    }

    #[test]
    fn test_resolve_among_candidates() {
        let result = resolve_among(
            &pats(&["**/*.md", "!drafts/**"]),
            ["b.md", "drafts/x.md", "a/c.md", "a.txt"],
        )
        .unwrap();
        assert_eq!(result, vec!["a/c.md", "b.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tree(&["a.md", "locked/b.md"]);
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let readable = fs::read_dir(&locked).is_ok();

        let result = resolve(&pats(&["**/*.md"]), dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let result = result.unwrap();
        if readable {
            assert_eq!(result, vec!["a.md", "locked/b.md"]);
        } else {
            assert_eq!(result, vec!["a.md"]);
        }
    }

    #[test]
    fn test_literal_root() {
        assert_eq!(literal_root("docs/memories/**/*.md"), "docs/memories");
        assert_eq!(literal_root("*.md"), "");
        assert_eq!(literal_root("a/{b,c}/*.md"), "a");
        assert_eq!(literal_root("a/b.md"), "a");
    }
}
