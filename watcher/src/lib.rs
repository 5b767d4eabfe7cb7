//! # Folderstats Watcher
//!
//! This crate counts file activity in a set of watched directories. It is the
//! aggregation core of the folderstats exporter: OS change notifications are
//! routed into per-directory counters, and the exporter drains those counters
//! once per scrape.
//!
//! ## Features
//!
//! - **Per-directory counters**: created/modified/deleted since the last drain
//! - **Atomic drain**: read-and-reset never loses or double-counts an event
//! - **Event routing**: one background task feeds every watched directory
//! - **Directory census**: capped count of immediate entries
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Folderstats Watcher                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  FolderWatcher ──► EventRouter ──► PathWatch (record)           │
//! │                                        │                        │
//! │                                        ▼                        │
//! │  DirectoryCensus ◄── exporter ──► PathWatch (drain)             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod census;
pub mod config;
pub mod error;
pub mod event;
pub mod path_watch;
pub mod registry;
pub mod router;
pub mod watcher;

pub use census::{CENSUS_FAILED, DirectoryCensus, MAX_ENTRIES};
pub use config::{WatchedPath, sanitize_label};
pub use error::{Result, WatcherError};
pub use event::{ChangeEvent, ChangeKind};
pub use path_watch::{ActivityCounts, PathWatch};
pub use registry::WatchRegistry;
pub use router::EventRouter;
pub use watcher::{FolderWatcher, NotifyReceiver};
