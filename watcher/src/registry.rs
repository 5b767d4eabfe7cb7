//! Shared aggregation context for ingestion and export.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::WatchedPath;
use crate::path_watch::PathWatch;

/// Every [`PathWatch`] of the process plus the process-wide failure signals.
///
/// Built once at startup and shared (behind an `Arc`) between the event
/// router and the snapshot exporter.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    watches: Vec<PathWatch>,
    scrape_errors: AtomicU64,
    up: AtomicBool,
}

impl WatchRegistry {
    /// Create a registry with one watch per configured path, in order.
    ///
    /// Duplicate paths yield independent watches.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            watches: paths
                .into_iter()
                .map(|p| PathWatch::new(WatchedPath::new(p)))
                .collect(),
            scrape_errors: AtomicU64::new(0),
            up: AtomicBool::new(false),
        }
    }

    /// All watches in configuration order.
    pub fn watches(&self) -> &[PathWatch] {
        &self.watches
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Count one failure (census or notification facility).
    pub fn record_scrape_error(&self) {
        self.scrape_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Failures counted since startup.
    pub fn scrape_errors(&self) -> u64 {
        self.scrape_errors.load(Ordering::Relaxed)
    }

    /// Flag that every configured path is being watched.
    pub fn mark_up(&self) {
        self.up.store(true, Ordering::Release);
    }

    /// Whether ingestion has started.
    pub fn is_up(&self) -> bool {
        self.up.load(Ordering::Acquire)
    }
}
