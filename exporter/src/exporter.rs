//! Scrape cycles over the shared watch registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use folderstats_watcher::{
    ActivityCounts, CENSUS_FAILED, DirectoryCensus, EventRouter, FolderWatcher, WatchRegistry,
};
use tracing::debug;

use crate::error::Result;

/// Start watching every configured directory and spawn the event router.
///
/// Must be called inside a tokio runtime. Failing to watch any directory is
/// fatal to the exporter; the returned watcher keeps the watches alive.
pub fn start_ingestion(registry: &Arc<WatchRegistry>) -> Result<FolderWatcher> {
    let (watcher, events) = FolderWatcher::start(registry)?;
    tokio::spawn(EventRouter::new(Arc::clone(registry)).run(events));
    Ok(watcher)
}

/// One watched directory's values in a scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSample {
    /// Sanitized label value.
    pub label: String,

    /// Events drained in this cycle.
    pub delta: ActivityCounts,

    /// Events exported since startup.
    pub totals: ActivityCounts,

    /// Immediate entries, or [`CENSUS_FAILED`].
    pub files_in_path: i64,
}

/// Values produced by one scrape cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeResult {
    /// Wall time of the cycle.
    pub duration_seconds: f64,

    /// Whether any census failed during the cycle.
    pub error: bool,

    /// Per-path values in configuration order.
    pub paths: Vec<PathSample>,

    /// Scrapes since startup, this one included.
    pub scrapes_total: u64,

    /// Census and notification failures since startup.
    pub scrape_errors_total: u64,

    /// Whether every configured directory is being watched.
    pub up: bool,
}

/// Drains per-path counters into exported series, one scrape at a time.
pub struct SnapshotExporter {
    registry: Arc<WatchRegistry>,
    census: DirectoryCensus,

    /// Cumulative exported counts, parallel to the registry's watches.
    totals: Mutex<Vec<ActivityCounts>>,

    scrapes_total: AtomicU64,
}

impl SnapshotExporter {
    /// Create an exporter over the shared registry.
    pub fn new(registry: Arc<WatchRegistry>) -> Self {
        Self::with_census(registry, DirectoryCensus::new())
    }

    /// Create an exporter with a custom census.
    pub fn with_census(registry: Arc<WatchRegistry>, census: DirectoryCensus) -> Self {
        let totals = vec![ActivityCounts::default(); registry.len()];
        Self {
            registry,
            census,
            totals: Mutex::new(totals),
            scrapes_total: AtomicU64::new(0),
        }
    }

    /// Run one scrape cycle.
    ///
    /// Blocks on directory enumeration. Census failures are local to their
    /// path and never abort the cycle.
    pub fn scrape(&self) -> ScrapeResult {
        let started = Instant::now();
        let scrapes_total = self.scrapes_total.fetch_add(1, Ordering::Relaxed) + 1;

        // Holding the totals for the whole cycle keeps overlapping scrapes
        // from interleaving their accumulation.
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        let mut error = false;
        let mut paths = Vec::with_capacity(self.registry.len());

        for (watch, total) in self.registry.watches().iter().zip(totals.iter_mut()) {
            let delta = watch.drain();
            total.accumulate(delta);

            let files_in_path = self.census.count(watch.path().as_path());
            if files_in_path == CENSUS_FAILED {
                self.registry.record_scrape_error();
                error = true;
            }

            paths.push(PathSample {
                label: watch.path().label(),
                delta,
                totals: *total,
                files_in_path,
            });
        }
        drop(totals);

        let duration_seconds = started.elapsed().as_secs_f64();
        debug!("Scrape {scrapes_total} finished in {duration_seconds:.6}s (error: {error})");

        ScrapeResult {
            duration_seconds,
            error,
            paths,
            scrapes_total,
            scrape_errors_total: self.registry.scrape_errors(),
            up: self.registry.is_up(),
        }
    }

    /// The registry this exporter reads.
    pub fn registry(&self) -> &Arc<WatchRegistry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExporterError;
    use folderstats_watcher::{ChangeKind, WatcherError};
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::TempDir;

    fn exporter_for(dir: &TempDir) -> SnapshotExporter {
        let registry = Arc::new(WatchRegistry::new([dir
            .path()
            .to_string_lossy()
            .into_owned()]));
        SnapshotExporter::new(registry)
    }

    #[test]
    fn test_totals_accumulate_across_scrapes() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = exporter_for(&temp_dir);
        let watch = &exporter.registry().watches()[0];

        watch.record_event(ChangeKind::Created);
        watch.record_event(ChangeKind::Created);
        let first = exporter.scrape();
        assert_eq!(first.paths[0].delta.created, 2);
        assert_eq!(first.paths[0].totals.created, 2);

        let second = exporter.scrape();
        assert_eq!(second.paths[0].delta, ActivityCounts::default());
        assert_eq!(second.paths[0].totals.created, 2);

        watch.record_event(ChangeKind::Created);
        watch.record_event(ChangeKind::Modified);
        let third = exporter.scrape();
        assert_eq!(
            third.paths[0].totals,
            ActivityCounts {
                created: 3,
                modified: 1,
                deleted: 0,
            }
        );
        assert_eq!(third.scrapes_total, 3);
    }

    #[test]
    fn test_census_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("one")).unwrap();
        File::create(temp_dir.path().join("two")).unwrap();
        let exporter = exporter_for(&temp_dir);

        let result = exporter.scrape();
        assert_eq!(result.paths[0].files_in_path, 2);
        assert!(!result.error);
        assert_eq!(result.scrape_errors_total, 0);
        assert!(result.duration_seconds >= 0.0);
    }

    #[test]
    fn test_up_follows_registry() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = exporter_for(&temp_dir);

        assert!(!exporter.scrape().up);
        exporter.registry().mark_up();
        assert!(exporter.scrape().up);
    }

    #[tokio::test]
    async fn test_start_ingestion_fails_for_missing_directory() {
        let registry = Arc::new(WatchRegistry::new(["/nonexistent/path/12345"]));

        let result = start_ingestion(&registry);
        assert!(matches!(
            result,
            Err(ExporterError::Watcher(WatcherError::WatchFailed { .. }))
        ));
        assert!(!registry.is_up());
    }

    #[tokio::test]
    async fn test_start_ingestion_marks_up() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = exporter_for(&temp_dir);

        let watcher = start_ingestion(exporter.registry()).unwrap();
        assert_eq!(watcher.watched(), 1);
        assert!(exporter.scrape().up);
    }

    #[test]
    fn test_census_failure_only_affects_its_path() {
        let good = TempDir::new().unwrap();
        let registry = Arc::new(WatchRegistry::new([
            "/nonexistent/path/12345".to_string(),
            good.path().to_string_lossy().into_owned(),
        ]));
        let exporter = SnapshotExporter::new(Arc::clone(&registry));
        registry.watches()[0].record_event(ChangeKind::Deleted);

        let result = exporter.scrape();
        assert!(result.error);
        assert_eq!(result.scrape_errors_total, 1);
        assert_eq!(result.paths[0].files_in_path, CENSUS_FAILED);
        assert_eq!(result.paths[0].totals.deleted, 1);
        assert_eq!(result.paths[1].files_in_path, 0);
    }
}
