//! Receivers for raw filesystem events.

use crate::batcher::ChangeBuffer;
use crate::events::RawEvent;
use crate::matcher::PatternMatcher;
use std::sync::Arc;
use tracing::trace;

/// Receives raw events from a [`crate::DirectoryWatcher`].
///
/// Called on the backend's own thread, concurrently with drains.
pub trait EventSink: Send + Sync {
    /// Handle one raw event.
    fn on_event(&self, event: RawEvent);
}

/// Sink that appends every path accepted by a [`PatternMatcher`] to a
/// [`ChangeBuffer`]. It never reads or clears the buffer.
#[derive(Debug, Clone)]
pub struct FilteringSink {
    matcher: Arc<PatternMatcher>,
    buffer: ChangeBuffer,
}

impl FilteringSink {
    /// Create a sink feeding `buffer`.
    pub fn new(matcher: Arc<PatternMatcher>, buffer: ChangeBuffer) -> Self {
        Self { matcher, buffer }
    }
}

impl EventSink for FilteringSink {
    fn on_event(&self, event: RawEvent) {
        let kind = event.kind;
        for path in event.paths {
            if self.matcher.matches(&path) {
                trace!("{} {}", kind.as_str(), path.display());
                self.buffer.append(path);
            }
        }
    }
}
