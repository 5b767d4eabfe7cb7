//! Capped enumeration of a directory's immediate entries.

use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{Result, WatcherError};

/// Most entries a census will enumerate.
pub const MAX_ENTRIES: usize = 1024;

/// Census value reported when a directory cannot be enumerated.
pub const CENSUS_FAILED: i64 = -1;

/// Counts immediate entries of a directory, files and subdirectories alike.
///
/// This is blocking I/O; callers must not hold any counter lock around it.
#[derive(Debug, Clone)]
pub struct DirectoryCensus {
    cap: usize,
}

impl DirectoryCensus {
    /// Create a census with the standard cap.
    pub fn new() -> Self {
        Self { cap: MAX_ENTRIES }
    }

    /// Create a census with a custom cap.
    pub fn with_cap(cap: usize) -> Self {
        Self { cap }
    }

    /// Number of immediate entries, or [`CENSUS_FAILED`] on any error.
    pub fn count(&self, path: &Path) -> i64 {
        match self.try_count(path) {
            Ok(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Err(e) => {
                warn!("{e}");
                CENSUS_FAILED
            }
        }
    }

    /// Number of immediate entries, stopping at the cap.
    pub fn try_count(&self, path: &Path) -> Result<usize> {
        let census_error = |source| WatcherError::Census {
            path: path.to_path_buf(),
            source,
        };
        let mut walker = WalkDir::new(path)
            .max_depth(1)
            .follow_links(false)
            .into_iter();

        // The root may be a symlink to a directory; children are never followed.
        match walker.next() {
            Some(Ok(root)) if root.file_type().is_dir() => {}
            Some(Ok(root)) if std::fs::metadata(root.path())?.is_dir() => {}
            Some(Ok(_)) => return Err(WatcherError::NotADirectory(path.to_path_buf())),
            Some(Err(source)) => return Err(census_error(source)),
            None => return Ok(0),
        }

        let mut entries = 0;
        for entry in walker.take(self.cap) {
            entry.map_err(census_error)?;
            entries += 1;
        }
        Ok(entries)
    }
}

impl Default for DirectoryCensus {
    fn default() -> Self {
        Self::new()
    }
}
