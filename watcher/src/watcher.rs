//! OS notification watches for the configured directories.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{Result, WatcherError};
use crate::registry::WatchRegistry;

/// Receiving end of the notification stream.
pub type NotifyReceiver = mpsc::UnboundedReceiver<notify::Result<notify::Event>>;

/// Keeps the OS watches alive. Dropping it stops all notifications.
pub struct FolderWatcher {
    /// Internal notify watcher.
    _watcher: RecommendedWatcher,

    /// Number of directories being watched.
    watched: usize,
}

impl FolderWatcher {
    /// Begin watching every directory in `registry`.
    ///
    /// All directories share one notification stream. Failing to watch any
    /// of them is an error; on success the registry is marked up.
    pub fn start(registry: &WatchRegistry) -> Result<(Self, NotifyReceiver)> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        // The channel is unbounded so the OS callback never blocks.
        let mut watcher = notify::recommended_watcher(
            move |res: notify::Result<notify::Event>| {
                if event_tx.send(res).is_err() {
                    warn!("Event router is gone, dropping notification");
                }
            },
        )?;

        for watch in registry.watches() {
            let path = watch.path().resolved();
            watcher
                .watch(path, RecursiveMode::NonRecursive)
                .map_err(|source| WatcherError::WatchFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!("Started watching: {}", path.display());
        }

        registry.mark_up();
        info!("Folder watcher started for {} directories", registry.len());

        Ok((
            Self {
                _watcher: watcher,
                watched: registry.len(),
            },
            event_rx,
        ))
    }

    /// Number of directories being watched.
    pub fn watched(&self) -> usize {
        self.watched
    }
}
