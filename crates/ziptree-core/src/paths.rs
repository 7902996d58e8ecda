//! Lexical path helpers used when mapping entry names onto the filesystem.

use std::ffi::OsString;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Collapses `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root; a leading `..` on a relative path is
/// kept so that escapes remain visible to [`is_strictly_within`].
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Returns `true` if `path` lies strictly below `dir` (not equal to it).
///
/// Both paths are compared component-wise after [`clean_path`].
#[must_use]
pub fn is_strictly_within(path: &Path, dir: &Path) -> bool {
    let path = clean_path(path);
    let dir = clean_path(dir);
    path != dir && path.starts_with(&dir)
}

/// Returns `true` if the path text ends with a separator, marking a
/// directory-only destination.
#[must_use]
pub fn has_trailing_separator(path: &Path) -> bool {
    let bytes = path.as_os_str().as_encoded_bytes();
    match bytes.last() {
        Some(b'/') => true,
        #[cfg(windows)]
        Some(b'\\') => true,
        _ => false,
    }
}

/// Appends a trailing `/` to `path`.
#[must_use]
pub fn with_trailing_separator(path: PathBuf) -> PathBuf {
    if has_trailing_separator(&path) {
        return path;
    }
    let mut os: OsString = path.into_os_string();
    os.push("/");
    PathBuf::from(os)
}

/// Makes `path` absolute against the current directory, lexically.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_collapses_dots() {
        assert_eq!(clean_path(Path::new("a/./b/../c")), Path::new("a/c"));
        assert_eq!(clean_path(Path::new("a//b/")), Path::new("a/b"));
        assert_eq!(clean_path(Path::new("./")), Path::new("."));
    }

    #[test]
    fn test_clean_path_keeps_leading_parent() {
        assert_eq!(clean_path(Path::new("../x")), Path::new("../x"));
        assert_eq!(clean_path(Path::new("a/../../x")), Path::new("../x"));
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_path_parent_of_root() {
        assert_eq!(clean_path(Path::new("/../etc")), Path::new("/etc"));
        assert_eq!(clean_path(Path::new("/srv/out/../../etc")), Path::new("/etc"));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_strictly_within() {
        let dir = Path::new("/srv/out");
        assert!(is_strictly_within(Path::new("/srv/out/a.txt"), dir));
        assert!(is_strictly_within(Path::new("/srv/out/x/../a.txt"), dir));
        assert!(!is_strictly_within(Path::new("/srv/out"), dir));
        assert!(!is_strictly_within(Path::new("/srv/out/."), dir));
        assert!(!is_strictly_within(Path::new("/srv/out/../a.txt"), dir));
        assert!(!is_strictly_within(Path::new("/srv/outside/a.txt"), dir));
        assert!(!is_strictly_within(Path::new("/etc/passwd"), dir));
    }

    #[test]
    fn test_trailing_separator() {
        assert!(has_trailing_separator(Path::new("dir/")));
        assert!(!has_trailing_separator(Path::new("dir")));
        assert!(!has_trailing_separator(Path::new("")));

        let marked = with_trailing_separator(PathBuf::from("a/b"));
        assert!(has_trailing_separator(&marked));
        assert_eq!(with_trailing_separator(PathBuf::from("a/")), PathBuf::from("a/"));
    }

    #[test]
    fn test_absolute() {
        let abs = absolute(Path::new("some/file.txt")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("some/file.txt"));
    }
}
