//! Per-directory activity counters.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::WatchedPath;
use crate::event::ChangeKind;

/// Created/modified/deleted counts for one directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub created: u64,
    pub modified: u64,
    pub deleted: u64,
}

impl ActivityCounts {
    /// Add one event of `kind`. Unclassified kinds are ignored.
    pub fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Created => self.created += 1,
            ChangeKind::Modified => self.modified += 1,
            ChangeKind::Deleted => self.deleted += 1,
            ChangeKind::Other => {}
        }
    }

    /// Add another set of counts to this one.
    pub fn accumulate(&mut self, other: Self) {
        self.created += other.created;
        self.modified += other.modified;
        self.deleted += other.deleted;
    }

    /// Total number of counted events.
    pub fn total(&self) -> u64 {
        self.created + self.modified + self.deleted
    }
}

/// Activity accumulated for one watched directory since the last drain.
///
/// Each watch carries its own lock so unrelated directories never contend.
#[derive(Debug)]
pub struct PathWatch {
    path: WatchedPath,
    counts: Mutex<ActivityCounts>,
}

impl PathWatch {
    /// Create a watch with all counters at zero.
    pub fn new(path: WatchedPath) -> Self {
        Self {
            path,
            counts: Mutex::new(ActivityCounts::default()),
        }
    }

    /// The directory this watch counts for.
    pub fn path(&self) -> &WatchedPath {
        &self.path
    }

    /// Count one event of `kind`.
    pub fn record_event(&self, kind: ChangeKind) {
        if kind == ChangeKind::Other {
            return;
        }
        self.lock().record(kind);
    }

    /// Read the counters and reset them to zero in one step.
    pub fn drain(&self) -> ActivityCounts {
        std::mem::take(&mut *self.lock())
    }

    /// Read the counters without resetting them.
    pub fn peek(&self) -> ActivityCounts {
        *self.lock()
    }

    // A panic while holding the lock cannot leave the counts half-written,
    // so a poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, ActivityCounts> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
