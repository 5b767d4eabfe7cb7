//! Error types for the folder watcher.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Errors that can occur while watching or counting a directory.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// The notification facility could not be created.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// A configured directory could not be watched.
    #[error("failed to watch {}: {source}", path.display())]
    WatchFailed {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// A directory could not be opened or enumerated.
    #[error("failed to enumerate {}: {source}", path.display())]
    Census {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A configured path exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
