//! Lexical path helpers
//!
//! None of these touch the filesystem: changed files may already be deleted
//! and project roots are compared as written.

use std::path::{Component, Path, PathBuf};

use crate::core::ROOT_PROJECT_ID;

/// Resolve `.` and `..` components without consulting the filesystem.
///
/// Leading `..` components of a relative path are kept, so a path escaping
/// its base stays recognisable.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Render a path with `/` separators regardless of platform
pub fn to_unix_string(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Make `path` relative to `base` if it is absolute and lives under `base`.
///
/// Relative paths are only normalized.
pub fn relative_to(path: &Path, base: Option<&Path>) -> PathBuf {
    let path = normalize(path);
    match base {
        Some(base) if path.is_absolute() => path
            .strip_prefix(normalize(base))
            .map(Path::to_path_buf)
            .unwrap_or(path),
        _ => path,
    }
}

/// Derive a qualified project id from a root relative to the working tree.
///
/// `service/api` becomes `:service:api`; the empty path is the root project
/// `:`. Roots escaping the tree keep their `..` segments and can never match
/// a discovered project.
pub fn qualified_id_for(relative_root: &Path) -> String {
    let segments: Vec<String> = normalize(relative_root)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        ROOT_PROJECT_ID.to_string()
    } else {
        format!(":{}", segments.join(":"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("./a")), PathBuf::from("a"));
        assert_eq!(normalize(Path::new("../sdk")), PathBuf::from("../sdk"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize(Path::new("/repo/x/../y")), PathBuf::from("/repo/y"));
    }

    #[test]
    fn test_to_unix_string() {
        assert_eq!(to_unix_string(Path::new("src/lib.rs")), "src/lib.rs");
        assert_eq!(to_unix_string(Path::new("")), "");
    }

    #[test]
    fn test_relative_to() {
        let base = Path::new("/repo");
        assert_eq!(
            relative_to(Path::new("/repo/service/api/src/X.rs"), Some(base)),
            PathBuf::from("service/api/src/X.rs")
        );
        assert_eq!(
            relative_to(Path::new("service/./lib.rs"), Some(base)),
            PathBuf::from("service/lib.rs")
        );
        assert_eq!(
            relative_to(Path::new("/elsewhere/file.rs"), Some(base)),
            PathBuf::from("/elsewhere/file.rs")
        );
    }

    #[test]
    fn test_qualified_id_for() {
        assert_eq!(qualified_id_for(Path::new("")), ":");
        assert_eq!(qualified_id_for(Path::new("service")), ":service");
        assert_eq!(qualified_id_for(Path::new("service/api")), ":service:api");
        assert_eq!(qualified_id_for(Path::new("./libs/../apps/web")), ":apps:web");
        assert_eq!(qualified_id_for(Path::new("../sdk")), ":..:sdk");
    }
}
