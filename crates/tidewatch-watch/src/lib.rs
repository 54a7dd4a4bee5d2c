//! # tidewatch change watching
//!
//! Event-driven change notification for developer reload loops. Instead of
//! polling every file on every tick, a [`ChangeWatcher`] subscribes to OS
//! filesystem notifications for one or more directory trees, keeps only the
//! paths whose extension matters, and hands the host a deduplicated batch of
//! changed paths each time it calls [`ChangeWatcher::drain`].
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ ExtensionSet     │──▶│  PatternMatcher  │──▶│  FilteringSink   │
//! │ (setup.cfg)      │   │  (*.py, *.go ..) │   │  (EventSink)     │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘
//!                                                        ▲        │
//! ┌──────────────────┐                                   │        ▼
//! │ DirectoryWatcher │── RawEvent (notify thread) ───────┘ ┌──────────────┐
//! │ (native/polling) │                                     │ ChangeBuffer │
//! └──────────────────┘                                     └──────────────┘
//!                                                                 │
//!                        ChangeWatcher::drain() ◀── ChangeBatcher ┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tidewatch_watch::{ChangeWatcher, WatcherOptions};
//!
//! # async fn run() -> tidewatch_watch::Result<()> {
//! let watcher = ChangeWatcher::new(vec!["/srv/app".into()], WatcherOptions::default())?;
//! watcher.start()?;
//! loop {
//!     let changed = watcher.drain().await;
//!     if !changed.is_empty() {
//!         println!("reload: {:?}", changed);
//!     }
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod backends;
pub mod batcher;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod matcher;
pub mod sink;
pub mod traits;

pub use backends::{create_watcher, NativeWatcher, NotifyWatcher, PollingWatcher};
pub use batcher::{ChangeBatcher, ChangeBuffer, ChangeSet};
pub use error::{Error, Result};
pub use events::{RawEvent, RawEventKind};
pub use lifecycle::{ChangeWatcher, WatcherState};
pub use matcher::PatternMatcher;
pub use sink::{EventSink, FilteringSink};
pub use traits::{BackendCapabilities, DirectoryWatcher, WatchHandle};

pub use tidewatch_config::{ExtensionSet, WatchBackend, WatcherOptions};
