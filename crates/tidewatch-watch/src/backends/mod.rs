//! Directory watching backends.

mod notify_backend;

pub use notify_backend::{NativeWatcher, NotifyWatcher, PollingWatcher};

use crate::{error::Result, sink::EventSink, traits::DirectoryWatcher};
use std::sync::Arc;
use tidewatch_config::{WatchBackend, WatcherOptions};

/// Build the backend selected by `options`, feeding `sink`.
pub fn create_watcher(
    backend: WatchBackend,
    sink: Arc<dyn EventSink>,
    options: &WatcherOptions,
) -> Result<Box<dyn DirectoryWatcher>> {
    Ok(match backend {
        WatchBackend::Native => Box::new(NativeWatcher::native(sink)?),
        WatchBackend::Polling => Box::new(PollingWatcher::polling(sink, options.poll_interval())?),
    })
}
