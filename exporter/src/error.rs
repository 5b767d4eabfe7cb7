//! Error types for the exporter.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for exporter operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Errors that can occur while configuring or running the exporter.
#[derive(Error, Debug)]
pub enum ExporterError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Directory watcher error.
    #[error("watcher error: {0}")]
    Watcher(#[from] folderstats_watcher::WatcherError),

    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
