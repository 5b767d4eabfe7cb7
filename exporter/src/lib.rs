//! # Folderstats Exporter
//!
//! Serves file activity of watched directories in the Prometheus text
//! format. Each request to the telemetry path runs one scrape cycle: per-path
//! counters are drained into ever-increasing exported totals and every
//! directory gets a fresh entry census.

pub mod config;
pub mod error;
pub mod exporter;
pub mod metrics;
pub mod server;

pub use config::{Cli, ExporterConfig};
pub use error::{ExporterError, Result};
pub use exporter::{PathSample, ScrapeResult, SnapshotExporter, start_ingestion};
pub use metrics::render;
