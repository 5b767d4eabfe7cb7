//! Routing of change events to per-directory counters.

use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::event::{ChangeEvent, ChangeKind};
use crate::registry::WatchRegistry;
use crate::watcher::NotifyReceiver;

/// Consumes the notification stream and counts each event against the
/// directory it belongs to.
#[derive(Debug, Clone)]
pub struct EventRouter {
    registry: Arc<WatchRegistry>,
}

impl EventRouter {
    /// Create a router over the shared registry.
    pub fn new(registry: Arc<WatchRegistry>) -> Self {
        Self { registry }
    }

    /// Count `event` against every watch it matches.
    ///
    /// Returns the number of watches that counted it. Unclassified events
    /// are never counted.
    pub fn route(&self, event: &ChangeEvent) -> usize {
        if event.kind == ChangeKind::Other {
            trace!("Ignoring unclassified event for {}", event.path.display());
            return 0;
        }

        let mut matched = 0;
        for watch in self.registry.watches() {
            if watch.path().matches(&event.path) {
                watch.record_event(event.kind);
                matched += 1;
            }
        }

        if matched == 0 {
            trace!("No watch for {:?} on {}", event.kind, event.path.display());
        }
        matched
    }

    /// Route every path of a raw notification.
    pub fn route_notify(&self, event: notify::Event) -> usize {
        ChangeEvent::from_notify(event)
            .iter()
            .map(|change| self.route(change))
            .sum()
    }

    /// Count a notification-facility error. Ingestion carries on.
    pub fn record_error(&self, err: &notify::Error) {
        error!("Watch error: {err}");
        self.registry.record_scrape_error();
    }

    /// Drain the notification stream until every sender is gone.
    pub async fn run(self, mut events: NotifyReceiver) {
        while let Some(res) = events.recv().await {
            match res {
                Ok(event) => {
                    self.route_notify(event);
                }
                Err(e) => self.record_error(&e),
            }
        }
        debug!("Notification stream closed, event router exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_watch::ActivityCounts;
    use notify::EventKind;
    use notify::event::{CreateKind, RemoveKind};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn registry_for(dirs: &[&TempDir]) -> Arc<WatchRegistry> {
        Arc::new(WatchRegistry::new(
            dirs.iter().map(|d| d.path().to_string_lossy().into_owned()),
        ))
    }

    fn child(registry: &WatchRegistry, index: usize, name: &str) -> PathBuf {
        registry.watches()[index].path().resolved().join(name)
    }

    #[test]
    fn test_routes_to_matching_watch() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let registry = registry_for(&[&a, &b]);
        let router = EventRouter::new(Arc::clone(&registry));

        for _ in 0..3 {
            router.route(&ChangeEvent::new(
                ChangeKind::Created,
                child(&registry, 0, "x.txt"),
            ));
        }
        router.route(&ChangeEvent::new(
            ChangeKind::Deleted,
            child(&registry, 0, "x.txt"),
        ));
        router.route(&ChangeEvent::new(
            ChangeKind::Modified,
            child(&registry, 1, "y.txt"),
        ));

        assert_eq!(
            registry.watches()[0].drain(),
            ActivityCounts {
                created: 3,
                modified: 0,
                deleted: 1,
            }
        );
        assert_eq!(
            registry.watches()[1].drain(),
            ActivityCounts {
                created: 0,
                modified: 1,
                deleted: 0,
            }
        );
    }

    #[test]
    fn test_unmatched_and_unclassified_events_are_dropped() {
        let a = TempDir::new().unwrap();
        let registry = registry_for(&[&a]);
        let router = EventRouter::new(Arc::clone(&registry));

        assert_eq!(
            router.route(&ChangeEvent::new(ChangeKind::Created, "/elsewhere/z.txt")),
            0
        );
        assert_eq!(
            router.route(&ChangeEvent::new(
                ChangeKind::Other,
                child(&registry, 0, "z.txt")
            )),
            0
        );
        assert_eq!(registry.watches()[0].drain(), ActivityCounts::default());
    }

    #[test]
    fn test_duplicate_paths_both_count() {
        let a = TempDir::new().unwrap();
        let registry = registry_for(&[&a, &a]);
        let router = EventRouter::new(Arc::clone(&registry));

        let matched = router.route(&ChangeEvent::new(
            ChangeKind::Created,
            child(&registry, 0, "dup.txt"),
        ));

        assert_eq!(matched, 2);
        assert_eq!(registry.watches()[0].drain().created, 1);
        assert_eq!(registry.watches()[1].drain().created, 1);
    }

    #[tokio::test]
    async fn test_run_counts_events_and_errors() {
        let a = TempDir::new().unwrap();
        let registry = registry_for(&[&a]);
        let (tx, rx) = mpsc::unbounded_channel();

        tx.send(Ok(notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(child(&registry, 0, "new.txt"))))
            .unwrap();
        tx.send(Err(notify::Error::generic("queue overflow"))).unwrap();
        tx.send(Ok(notify::Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(child(&registry, 0, "new.txt"))))
            .unwrap();
        drop(tx);

        EventRouter::new(Arc::clone(&registry)).run(rx).await;

        assert_eq!(
            registry.watches()[0].drain(),
            ActivityCounts {
                created: 1,
                modified: 0,
                deleted: 1,
            }
        );
        assert_eq!(registry.scrape_errors(), 1);
    }
}
