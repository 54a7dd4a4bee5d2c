//! Core traits for directory watching backends.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Core trait for directory watching backends.
///
/// A backend owns the OS-level registrations. It forwards every notification
/// to the [`crate::EventSink`] it was built with; filtering is the sink's job.
/// Dropping a backend releases all of its registrations.
pub trait DirectoryWatcher: Send {
    /// Get the backend type identifier.
    fn backend_type(&self) -> &'static str;

    /// Get backend capabilities.
    fn capabilities(&self) -> BackendCapabilities;

    /// Start watching `root` recursively.
    fn subscribe(&mut self, root: &Path) -> Result<WatchHandle>;

    /// Stop watching the root behind `handle`.
    fn unsubscribe(&mut self, handle: &WatchHandle) -> Result<()>;

    /// Get all active watches.
    fn active_watches(&self) -> Vec<WatchHandle>;
}

/// Handle to an active watch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchHandle {
    /// Unique identifier for this watch.
    pub id: String,

    /// Path being watched.
    pub path: PathBuf,
}

impl WatchHandle {
    /// Create a new watch handle.
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            path,
        }
    }
}

/// Backend capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Supports recursive watching.
    pub recursive: bool,

    /// Supports watching multiple roots at once.
    pub multiple_paths: bool,

    /// Platform availability.
    pub platforms: Vec<String>,
}

impl BackendCapabilities {
    /// Capabilities of a backend driven by native OS notifications.
    pub fn native() -> Self {
        Self {
            recursive: true,
            multiple_paths: true,
            platforms: vec![
                "linux".to_string(),
                "macos".to_string(),
                "windows".to_string(),
            ],
        }
    }

    /// Capabilities of the portable polling backend.
    pub fn polling() -> Self {
        Self {
            recursive: true,
            multiple_paths: true,
            platforms: vec!["all".to_string()],
        }
    }
}
