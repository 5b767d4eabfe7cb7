//! Change events from the notification facility.

use std::path::PathBuf;

use notify::event::ModifyKind;

/// A single change reported for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The kind of change.
    pub kind: ChangeKind,

    /// Path to the affected entry.
    pub path: PathBuf,
}

impl ChangeEvent {
    /// Create a new change event.
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// Split a notify event into one change per affected path.
    pub fn from_notify(event: notify::Event) -> Vec<Self> {
        let kind = ChangeKind::from(event.kind);
        event
            .paths
            .into_iter()
            .map(|path| Self::new(kind, path))
            .collect()
    }
}

/// Classification of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Entry was created.
    Created,

    /// Entry contents or metadata changed.
    Modified,

    /// Entry was removed.
    Deleted,

    /// Anything else (renames, access, unknown). Not counted.
    Other,
}

impl From<notify::EventKind> for ChangeKind {
    fn from(kind: notify::EventKind) -> Self {
        match kind {
            notify::EventKind::Create(_) => Self::Created,
            notify::EventKind::Remove(_) => Self::Deleted,
            // Renames are neither a delete nor a create here.
            notify::EventKind::Modify(ModifyKind::Name(_)) => Self::Other,
            notify::EventKind::Modify(_) => Self::Modified,
            _ => Self::Other,
        }
    }
}
