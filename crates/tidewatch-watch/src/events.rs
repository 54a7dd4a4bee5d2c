//! Raw filesystem event types.

use chrono::{DateTime, Utc};
use notify::event::ModifyKind;
use notify::EventKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A filesystem notification as reported by the OS, before filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawEvent {
    /// Kind of change.
    pub kind: RawEventKind,

    /// Affected paths. A rename may carry both the old and the new path.
    pub paths: Vec<PathBuf>,

    /// When the watcher received the notification.
    pub observed_at: DateTime<Utc>,
}

impl RawEvent {
    /// Create a new raw event.
    pub fn new(kind: RawEventKind, paths: Vec<PathBuf>) -> Self {
        Self {
            kind,
            paths,
            observed_at: Utc::now(),
        }
    }

    /// Convert a notify event, dropping kinds that do not signal a change.
    pub fn from_notify(event: notify::Event) -> Option<Self> {
        let kind = RawEventKind::from_notify(&event.kind)?;
        if event.paths.is_empty() {
            return None;
        }
        Some(Self::new(kind, event.paths))
    }
}

/// Kinds of change the watcher reacts to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RawEventKind {
    /// File or directory was created.
    Created,
    /// File or directory content or metadata was modified.
    Modified,
    /// File or directory was deleted.
    Deleted,
    /// File or directory was moved or renamed.
    Moved,
}

impl RawEventKind {
    /// Map a notify event kind. Access and `Other` notifications map to `None`.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Moved),
            EventKind::Modify(_) => Some(Self::Modified),
            EventKind::Remove(_) => Some(Self::Deleted),
            // Some backends cannot tell what happened, only that something did
            EventKind::Any => Some(Self::Modified),
            EventKind::Access(_) | EventKind::Other => None,
        }
    }

    /// Get a string representation of the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Moved => "moved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind, RenameMode};

    fn notify_event(kind: EventKind, paths: &[&str]) -> notify::Event {
        paths
            .iter()
            .fold(notify::Event::new(kind), |event, p| event.add_path(PathBuf::from(p)))
    }

    #[test]
    fn create_modify_remove_are_mapped() {
        assert_eq!(
            RawEventKind::from_notify(&EventKind::Create(CreateKind::File)),
            Some(RawEventKind::Created)
        );
        assert_eq!(
            RawEventKind::from_notify(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(RawEventKind::Modified)
        );
        assert_eq!(
            RawEventKind::from_notify(&EventKind::Remove(RemoveKind::File)),
            Some(RawEventKind::Deleted)
        );
    }

    #[test]
    fn renames_are_moves() {
        assert_eq!(
            RawEventKind::from_notify(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            Some(RawEventKind::Moved)
        );
        assert_eq!(
            RawEventKind::from_notify(&EventKind::Modify(ModifyKind::Name(RenameMode::From))),
            Some(RawEventKind::Moved)
        );
    }

    #[test]
    fn access_and_other_are_ignored() {
        assert_eq!(RawEventKind::from_notify(&EventKind::Access(AccessKind::Any)), None);
        assert_eq!(RawEventKind::from_notify(&EventKind::Other), None);
        assert_eq!(RawEventKind::from_notify(&EventKind::Any), Some(RawEventKind::Modified));
    }

    #[test]
    fn from_notify_keeps_all_paths() {
        let event = notify_event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/app/old.py", "/app/new.py"],
        );
        let raw = RawEvent::from_notify(event).unwrap();
        assert_eq!(raw.kind, RawEventKind::Moved);
        assert_eq!(raw.paths, vec![PathBuf::from("/app/old.py"), PathBuf::from("/app/new.py")]);
    }

    #[test]
    fn from_notify_drops_pathless_events() {
        let event = notify_event(EventKind::Create(CreateKind::File), &[]);
        assert!(RawEvent::from_notify(event).is_none());
    }

    #[test]
    fn event_kind_as_str() {
        assert_eq!(RawEventKind::Created.as_str(), "created");
        assert_eq!(RawEventKind::Modified.as_str(), "modified");
        assert_eq!(RawEventKind::Deleted.as_str(), "deleted");
        assert_eq!(RawEventKind::Moved.as_str(), "moved");
    }
}
