//! Configuration for the exporter.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! command-line flags. The result is read once at startup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{ExporterError, Result};

/// Default address the metrics server listens on.
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9108";

/// Default path under which metrics are served.
pub const DEFAULT_TELEMETRY_PATH: &str = "/metrics";

/// Command-line arguments.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "folderstats_exporter",
    version,
    about = "Prometheus exporter for file activity in watched directories"
)]
pub struct Cli {
    /// Directory to watch for changes. Repeat to watch several.
    #[arg(long = "path-to-watch", value_name = "DIR")]
    pub paths: Vec<String>,

    /// Address to listen on for the web interface and telemetry.
    #[arg(long = "web.listen-address", value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", value_name = "PATH")]
    pub telemetry_path: Option<String>,

    /// TOML file with `paths`, `listen_address` and `telemetry_path`.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge the flags over the config file (if any) and validate.
    pub fn into_config(self) -> Result<ExporterConfig> {
        let mut config = match &self.config {
            Some(path) => ExporterConfig::load(path)?,
            None => ExporterConfig::default(),
        };

        if !self.paths.is_empty() {
            config.paths = self.paths;
        }
        if let Some(addr) = self.listen_address {
            config.listen_address = addr;
        }
        if let Some(path) = self.telemetry_path {
            config.telemetry_path = path;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Exporter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Directories to watch, in export order. Duplicates are allowed.
    pub paths: Vec<String>,

    /// Listen address; `:PORT` means all interfaces.
    pub listen_address: String,

    /// HTTP path serving metrics.
    pub telemetry_path: String,
}

impl ExporterConfig {
    /// Create a configuration watching `paths` with default web settings.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Read a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ExporterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Check that the configuration can start an exporter.
    pub fn validate(&self) -> Result<()> {
        if self.paths.is_empty() {
            return Err(ExporterError::Config(
                "at least one --path-to-watch is required".to_string(),
            ));
        }
        if !self.telemetry_path.starts_with('/') || self.telemetry_path == "/" {
            return Err(ExporterError::Config(format!(
                "telemetry path must start with '/' and not be the root: {}",
                self.telemetry_path
            )));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// The listen address as a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = &self.listen_address;
        let full = match addr.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => addr.clone(),
        };
        full.parse()
            .map_err(|e| ExporterError::Config(format!("invalid listen address {addr}: {e}")))
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            telemetry_path: DEFAULT_TELEMETRY_PATH.to_string(),
        }
    }
}
