//! Consumer-facing watcher tying discovery, filtering, watching and batching
//! together behind a start/drain/stop lifecycle.

use crate::{
    backends::create_watcher,
    batcher::{ChangeBatcher, ChangeBuffer, ChangeSet},
    error::{Error, Result},
    matcher::PatternMatcher,
    sink::{EventSink, FilteringSink},
    traits::{DirectoryWatcher, WatchHandle},
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tidewatch_config::{ExtensionSet, WatcherOptions};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Observable lifecycle state of a [`ChangeWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Constructed, not yet monitoring.
    NotStarted,
    /// OS-level monitoring is active.
    Watching,
    /// Monitoring released. Terminal.
    Stopped,
}

enum Lifecycle {
    NotStarted,
    Watching {
        backend: Box<dyn DirectoryWatcher>,
        handles: Vec<WatchHandle>,
    },
    Stopped,
}

/// Watches one or more directory trees and reports changed source files in
/// debounced, deduplicated batches.
///
/// All methods take `&self`, so a watcher can sit in an `Arc` shared between
/// the task that drains it and the task that stops it.
pub struct ChangeWatcher {
    roots: Vec<PathBuf>,
    options: WatcherOptions,
    extensions: ExtensionSet,
    matcher: Arc<PatternMatcher>,
    buffer: ChangeBuffer,
    batcher: ChangeBatcher,
    shutdown: watch::Sender<bool>,
    lifecycle: Mutex<Lifecycle>,
}

impl ChangeWatcher {
    /// Prepare a watcher for `roots`.
    ///
    /// Every root must be an existing directory. The first root is where
    /// `setup.cfg` discovery starts, unless `options.extensions` overrides it.
    pub fn new(roots: Vec<PathBuf>, options: WatcherOptions) -> Result<Self> {
        options.validate()?;

        if roots.is_empty() {
            return Err(Error::Config("at least one root directory is required".to_string()));
        }
        let roots = roots
            .iter()
            .map(|root| canonical_root(root))
            .collect::<Result<Vec<_>>>()?;

        let (extensions, source) = options.extensions_for(&roots[0]);
        debug!("Extensions {} from {:?}", extensions, source);
        let matcher = Arc::new(PatternMatcher::new(&extensions)?);

        let buffer = ChangeBuffer::new();
        let (shutdown, shutdown_rx) = watch::channel(false);
        let batcher = ChangeBatcher::new(
            buffer.clone(),
            options.coalescing_window(),
            shutdown_rx,
            options.interrupt_drain_on_stop,
        );

        debug!(
            "Prepared watcher for {} root(s) with patterns {:?}",
            roots.len(),
            matcher.patterns()
        );

        Ok(Self {
            roots,
            options,
            extensions,
            matcher,
            buffer,
            batcher,
            shutdown,
            lifecycle: Mutex::new(Lifecycle::NotStarted),
        })
    }

    /// Begin OS-level monitoring of every root.
    ///
    /// Calling this while already watching does nothing. A stopped watcher
    /// cannot be restarted and returns [`Error::Stopped`]. If any root fails
    /// to register, the watcher stays in [`WatcherState::NotStarted`].
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();
        match *lifecycle {
            Lifecycle::NotStarted => {}
            Lifecycle::Watching { .. } => {
                debug!("Watcher already started");
                return Ok(());
            }
            Lifecycle::Stopped => return Err(Error::Stopped),
        }

        let sink: Arc<dyn EventSink> =
            Arc::new(FilteringSink::new(Arc::clone(&self.matcher), self.buffer.clone()));
        let mut backend = create_watcher(self.options.backend, sink, &self.options)?;

        if self.roots.len() > 1 && !backend.capabilities().multiple_paths {
            return Err(Error::Config(format!(
                "{} backend cannot watch more than one root",
                backend.backend_type()
            )));
        }

        let mut handles = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            handles.push(backend.subscribe(root)?);
        }

        info!(
            "Started {} fs watching on {} with patterns {:?}",
            backend.backend_type(),
            display_roots(&self.roots),
            self.matcher.patterns()
        );
        *lifecycle = Lifecycle::Watching { backend, handles };
        Ok(())
    }

    /// Release OS-level monitoring.
    ///
    /// Never fails: unregistration errors are logged and swallowed. Buffered
    /// changes stay available to `drain`. Stopping twice is a no-op.
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.lifecycle.lock(), Lifecycle::Stopped);

        match previous {
            Lifecycle::Watching { mut backend, handles } => {
                for handle in &handles {
                    if let Err(e) = backend.unsubscribe(handle) {
                        warn!("Can't stop watching {}: {}", handle.path.display(), e);
                    }
                }
                drop(backend);
                info!("Stopped fs watching on {}", display_roots(&self.roots));
            }
            Lifecycle::NotStarted => debug!("Watcher stopped before it was started"),
            Lifecycle::Stopped => return,
        }

        self.shutdown.send_replace(true);
    }

    /// Wait for the coalescing window and return the distinct paths changed
    /// since the previous drain.
    pub async fn drain(&self) -> ChangeSet {
        self.batcher.drain().await
    }

    /// A handle on the batcher, for draining from another task.
    pub fn batcher(&self) -> ChangeBatcher {
        self.batcher.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WatcherState {
        match *self.lifecycle.lock() {
            Lifecycle::NotStarted => WatcherState::NotStarted,
            Lifecycle::Watching { .. } => WatcherState::Watching,
            Lifecycle::Stopped => WatcherState::Stopped,
        }
    }

    /// Canonicalised roots, in construction order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolved extension set.
    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Glob patterns derived from the extension set.
    pub fn patterns(&self) -> &[String] {
        self.matcher.patterns()
    }

    /// Options this watcher was built with.
    pub fn options(&self) -> &WatcherOptions {
        &self.options
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ChangeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeWatcher")
            .field("roots", &self.roots)
            .field("patterns", &self.matcher.patterns())
            .field("state", &self.state())
            .field("pending", &self.buffer.len())
            .finish()
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf> {
    let canonical = root
        .canonicalize()
        .map_err(|e| Error::InvalidPath(format!("{}: {}", root.display(), e)))?;

    if !canonical.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    Ok(canonical)
}

fn display_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
