//! Notify-based directory watching backends.

use crate::{
    error::{Error, Result},
    events::RawEvent,
    sink::EventSink,
    traits::{BackendCapabilities, DirectoryWatcher, WatchHandle},
};

use notify::{PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Directory watcher built on a notify [`Watcher`].
///
/// Notify delivers events on its own thread; each one is converted to a
/// [`RawEvent`] and handed to the sink there.
pub struct NotifyWatcher<W: Watcher> {
    /// Underlying notify watcher
    watcher: W,
    /// Active watches keyed by handle id
    watches: HashMap<String, WatchHandle>,
    /// Backend identifier
    backend_type: &'static str,
    /// Capabilities
    capabilities: BackendCapabilities,
}

/// Watcher using the platform's native notification API.
pub type NativeWatcher = NotifyWatcher<RecommendedWatcher>;

/// Watcher that rescans the tree at a fixed interval.
pub type PollingWatcher = NotifyWatcher<PollWatcher>;

impl NotifyWatcher<RecommendedWatcher> {
    /// Create a native watcher feeding `sink`.
    pub fn native(sink: Arc<dyn EventSink>) -> Result<Self> {
        Self::with_config(
            sink,
            notify::Config::default(),
            "native",
            BackendCapabilities::native(),
        )
    }
}

impl NotifyWatcher<PollWatcher> {
    /// Create a polling watcher feeding `sink`, rescanning every `interval`.
    pub fn polling(sink: Arc<dyn EventSink>, interval: Duration) -> Result<Self> {
        Self::with_config(
            sink,
            notify::Config::default().with_poll_interval(interval),
            "polling",
            BackendCapabilities::polling(),
        )
    }
}

impl<W: Watcher> NotifyWatcher<W> {
    fn with_config(
        sink: Arc<dyn EventSink>,
        config: notify::Config,
        backend_type: &'static str,
        capabilities: BackendCapabilities,
    ) -> Result<Self> {
        let handler = move |result: notify::Result<notify::Event>| match result {
            Ok(event) => {
                if let Some(raw) = RawEvent::from_notify(event) {
                    sink.on_event(raw);
                }
            }
            Err(e) => {
                // No retry: the next drain simply won't include what was missed
                warn!("Notify error: {}", e);
            }
        };

        let watcher = W::new(handler, config).map_err(|e| {
            Error::Watch(format!("Failed to create {} watcher: {}", backend_type, e))
        })?;

        debug!("{} watcher initialized", backend_type);
        Ok(Self {
            watcher,
            watches: HashMap::new(),
            backend_type,
            capabilities,
        })
    }
}

impl<W: Watcher + Send> DirectoryWatcher for NotifyWatcher<W> {
    fn backend_type(&self) -> &'static str {
        self.backend_type
    }

    fn capabilities(&self) -> BackendCapabilities {
        self.capabilities.clone()
    }

    fn subscribe(&mut self, root: &Path) -> Result<WatchHandle> {
        debug!("Adding watch for: {}", root.display());

        if !root.is_dir() {
            return Err(Error::InvalidPath(format!(
                "{} is not an existing directory",
                root.display()
            )));
        }

        self.watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| Error::Watch(format!("Failed to watch {}: {}", root.display(), e)))?;

        let handle = WatchHandle::new(root.to_path_buf());
        self.watches.insert(handle.id.clone(), handle.clone());
        info!("Added {} watch: {} -> {}", self.backend_type, handle.id, root.display());

        Ok(handle)
    }

    fn unsubscribe(&mut self, handle: &WatchHandle) -> Result<()> {
        debug!("Removing watch for: {}", handle.path.display());

        let Some(watch) = self.watches.remove(&handle.id) else {
            return Err(Error::WatchNotFound(handle.path.display().to_string()));
        };

        self.watcher
            .unwatch(&watch.path)
            .map_err(|e| Error::Watch(format!("Failed to unwatch {}: {}", watch.path.display(), e)))?;

        info!("Removed {} watch: {}", self.backend_type, watch.path.display());
        Ok(())
    }

    fn active_watches(&self) -> Vec<WatchHandle> {
        self.watches.values().cloned().collect()
    }
}
