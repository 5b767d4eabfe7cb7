//! Configuration types for watched directories.

use std::path::{Path, PathBuf};

/// A directory as configured by the user.
///
/// The raw string is kept for labelling; matching against change events uses
/// the path resolved once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedPath {
    /// Path as given in the configuration.
    raw: String,

    /// Canonical form used for watching and event matching.
    resolved: PathBuf,
}

impl WatchedPath {
    /// Create a watched path, resolving it against the filesystem if possible.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let resolved = std::fs::canonicalize(&raw).unwrap_or_else(|_| PathBuf::from(&raw));
        Self { raw, resolved }
    }

    /// The path exactly as configured.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The configured path as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.raw)
    }

    /// The resolved path handed to the notification facility.
    pub fn resolved(&self) -> &Path {
        &self.resolved
    }

    /// Label value identifying this path in exported series.
    pub fn label(&self) -> String {
        sanitize_label(&self.raw)
    }

    /// Whether a change at `path` belongs to this directory.
    ///
    /// Watches are not recursive, so only the directory itself and its
    /// immediate children match.
    pub fn matches(&self, path: &Path) -> bool {
        path == self.resolved || path.parent() == Some(self.resolved.as_path())
    }
}

/// Lowercase `raw` and replace characters the metrics sink rejects.
pub fn sanitize_label(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            ' ' | '(' | ')' | ':' | '/' | '\\' => '_',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_windows_path() {
        assert_eq!(sanitize_label("C:\\Temp (work)"), "c__temp__work_");
    }

    #[test]
    fn test_sanitize_unix_path() {
        assert_eq!(sanitize_label("/var/Spool/in"), "_var_spool_in");
        assert_eq!(sanitize_label("A"), "a");
    }

    #[test]
    fn test_matches_immediate_children_only() {
        let temp_dir = TempDir::new().unwrap();
        let watched = WatchedPath::new(temp_dir.path().to_string_lossy());
        let root = watched.resolved().to_path_buf();

        assert!(watched.matches(&root));
        assert!(watched.matches(&root.join("file.txt")));
        assert!(!watched.matches(&root.join("nested").join("file.txt")));
        assert!(!watched.matches(Path::new("/somewhere/else.txt")));
    }

    #[test]
    fn test_unresolvable_path_keeps_raw() {
        let watched = WatchedPath::new("/nonexistent/path/12345");
        assert_eq!(watched.resolved(), Path::new("/nonexistent/path/12345"));
        assert_eq!(watched.raw(), "/nonexistent/path/12345");
    }
}
