//! Path normalization and glob matching for access policy.
//!
//! All comparisons in the access policy engine go through one canonical
//! representation: `/`-separated, `.`/`..`-free paths. This prevents both
//! traversal bypass (`project/../etc`) and separator duck-typing between
//! POSIX and Windows callers.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

/// Normalize a path by removing redundant components.
///
/// This does NOT resolve symlinks or touch the filesystem; it purely
/// normalizes the path string. `..` cannot climb above the root.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                let last = normalized.components().next_back();
                match last {
                    None => {}
                    Some(Component::RootDir | Component::Prefix(_)) => {}
                    _ => {
                        normalized.pop();
                    }
                }
            }
            Component::CurDir => {}
            _ => normalized.push(component),
        }
    }

    normalized
}

/// Render a path with `/` separators regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Check whether a path is contained within a root directory.
///
/// String comparison on normalized paths; does NOT resolve symlinks.
/// The access engine canonicalizes before calling this.
#[must_use]
pub fn is_under_root(path: &Path, root: &Path) -> bool {
    let normalized_path = normalize_path(path);
    let normalized_root = normalize_path(root);

    normalized_path.starts_with(&normalized_root)
}

/// Match a path against a glob pattern.
///
/// `**` matches across any number of path segments; `*` and `?` stay
/// within a single segment. Both sides are normalized to `/` separators
/// first, so POSIX and Windows paths behave identically. An invalid
/// pattern matches nothing.
#[must_use]
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    let path = path.replace('\\', "/");
    let pattern = pattern.replace('\\', "/");

    let Ok(compiled) = Pattern::new(&pattern) else {
        tracing::debug!(target: "access", pattern, "invalid glob pattern");
        return false;
    };

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    compiled.matches_with(&path, options)
}
