//! Entry filtering and entry-name computation for directory compression.

use std::path::Component;
use std::path::Path;

use crate::CompressConfig;
use crate::Result;
use crate::ZipTreeError;

/// Checks if a walked path should be left out of the archive.
///
/// `relative` is the path relative to the directory being compressed. It is
/// skipped if its file name is hidden and `include_hidden` is false, or if
/// any of its components matches an exclude pattern.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::CompressConfig;
/// use ziptree_core::filters;
///
/// let config = CompressConfig::default();
/// assert!(filters::should_skip(Path::new("src/.cache"), &config));
/// assert!(!filters::should_skip(Path::new("src/main.rs"), &config));
/// ```
#[must_use]
pub fn should_skip(relative: &Path, config: &CompressConfig) -> bool {
    if !config.include_hidden && is_hidden(relative) {
        return true;
    }

    config
        .exclude_patterns
        .iter()
        .any(|pattern| matches_pattern(relative, pattern))
}

/// Checks if a path's file name starts with '.'.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::filters;
///
/// assert!(filters::is_hidden(Path::new(".gitignore")));
/// assert!(filters::is_hidden(Path::new("dir/.hidden")));
/// assert!(!filters::is_hidden(Path::new("dir/visible.txt")));
/// ```
#[must_use]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Matches any component of `path` against a glob-style pattern.
///
/// Supports exact names, `*.ext` suffix patterns and `prefix*` patterns.
#[must_use]
pub fn matches_pattern(path: &Path, pattern: &str) -> bool {
    path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|s| pattern_matches(s, pattern))
    })
}

fn pattern_matches(s: &str, pattern: &str) -> bool {
    if pattern == s {
        return true;
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        return s.starts_with(prefix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return s.ends_with(suffix);
    }

    false
}

/// Computes the entry name for `path` inside an archive built from
/// `origin`.
///
/// The name is the origin's base name joined with the path relative to the
/// origin, using `/` separators on every platform. An origin without a base
/// name (the filesystem root) contributes nothing.
///
/// # Errors
///
/// Returns an error if `path` is not under `origin` or any component is not
/// valid UTF-8.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::filters::entry_name;
///
/// let name = entry_name(
///     Path::new("/home/user/project/src/main.rs"),
///     Path::new("/home/user/project"),
/// )?;
/// assert_eq!(name, "project/src/main.rs");
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub fn entry_name(path: &Path, origin: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(origin)
        .map_err(|_| ZipTreeError::OutsideOrigin {
            path: path.to_path_buf(),
            origin: origin.to_path_buf(),
        })?;

    let mut parts = Vec::new();
    if let Some(base) = origin.file_name() {
        parts.push(utf8(base, path)?);
    }
    for component in relative.components() {
        if let Component::Normal(part) = component {
            parts.push(utf8(part, path)?);
        }
    }

    Ok(parts.join("/"))
}

fn utf8<'a>(part: &'a std::ffi::OsStr, whole: &Path) -> Result<&'a str> {
    part.to_str().ok_or_else(|| ZipTreeError::NonUtf8Path {
        path: whole.to_path_buf(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new(".env")));
        assert!(is_hidden(Path::new("dir/.DS_Store")));
        assert!(!is_hidden(Path::new("main.rs")));
        assert!(!is_hidden(Path::new("")));
    }

    #[test]
    fn test_matches_pattern_exact() {
        assert!(matches_pattern(Path::new(".git"), ".git"));
        assert!(matches_pattern(Path::new("dir/.git/config"), ".git"));
        assert!(!matches_pattern(Path::new(".github"), ".git"));
    }

    #[test]
    fn test_matches_pattern_wildcards() {
        assert!(matches_pattern(Path::new("dir/file.log"), "*.log"));
        assert!(!matches_pattern(Path::new("logfile"), "*.log"));
        assert!(matches_pattern(Path::new("dir/temp_data"), "temp*"));
        assert!(!matches_pattern(Path::new("file_temp"), "temp*"));
    }

    #[test]
    fn test_should_skip_hidden_unless_included() {
        let config = CompressConfig::default();
        assert!(should_skip(Path::new(".hidden"), &config));

        let config = config.with_include_hidden(true);
        assert!(!should_skip(Path::new(".hidden"), &config));
    }

    #[test]
    fn test_should_skip_patterns() {
        let config = CompressConfig::default()
            .with_exclude_patterns(vec!["*.log".to_string(), "target".to_string()]);
        assert!(should_skip(Path::new("debug.log"), &config));
        assert!(should_skip(Path::new("target/out.bin"), &config));
        assert!(!should_skip(Path::new("src/lib.rs"), &config));
    }

    #[test]
    fn test_entry_name_nested() {
        let name = entry_name(Path::new("/data/root/a/b/c.txt"), Path::new("/data/root")).unwrap();
        assert_eq!(name, "root/a/b/c.txt");
    }

    #[test]
    fn test_entry_name_direct_child() {
        let name = entry_name(Path::new("/data/root/c.txt"), Path::new("/data/root")).unwrap();
        assert_eq!(name, "root/c.txt");
    }

    #[test]
    fn test_entry_name_filesystem_root_origin() {
        let name = entry_name(Path::new("/c.txt"), Path::new("/")).unwrap();
        assert_eq!(name, "c.txt");
    }

    #[test]
    fn test_entry_name_outside_origin() {
        let result = entry_name(Path::new("/elsewhere/c.txt"), Path::new("/data/root"));
        assert!(matches!(result, Err(ZipTreeError::OutsideOrigin { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_entry_name_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let origin = Path::new("/data/root");
        let path = origin.join(OsStr::from_bytes(b"bad\xff.txt"));
        assert!(matches!(
            entry_name(&path, origin),
            Err(ZipTreeError::NonUtf8Path { .. })
        ));
    }
}
