//! Watcher options, the optional configuration bag passed at construction.

use crate::error::ConfigError;
use crate::extensions::ExtensionSet;
use crate::resolver::{ExtensionConfigResolver, ExtensionSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Available file watching backends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WatchBackend {
    /// OS-specific notifications (inotify, FSEvents, ReadDirectoryChangesW)
    #[default]
    Native,
    /// Cross-platform polling, for network mounts and containers without inotify
    Polling,
}

impl WatchBackend {
    /// Get a string representation of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Polling => "polling",
        }
    }
}

/// Options controlling a watcher instance.
///
/// Every field has a default, so an options file only needs the keys it
/// changes:
///
/// ```toml
/// coalescing_window_ms = 250
/// backend = "polling"
/// poll_interval_ms = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherOptions {
    /// How long `drain` waits for bursts of changes to settle, in milliseconds
    pub coalescing_window_ms: u64,
    /// Backend used to receive filesystem notifications
    pub backend: WatchBackend,
    /// Scan interval for the polling backend, in milliseconds
    pub poll_interval_ms: u64,
    /// Whether stopping the watcher ends a drain that is still waiting
    pub interrupt_drain_on_stop: bool,
    /// Explicit extension list, bypassing `setup.cfg` discovery
    pub extensions: Option<Vec<String>>,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            coalescing_window_ms: 1000,
            backend: WatchBackend::Native,
            poll_interval_ms: 500,
            interrupt_drain_on_stop: false,
            extensions: None,
        }
    }
}

impl WatcherOptions {
    /// Load options from a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate options from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(contents)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject values the watcher cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms".to_string(),
                value: "must be greater than zero".to_string(),
            });
        }
        if let Some(extensions) = &self.extensions {
            if extensions.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "extensions".to_string(),
                    value: "must list at least one extension".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Extensions a watcher rooted at `start_dir` will use.
    ///
    /// An explicit `extensions` list wins when it holds at least one usable
    /// token; otherwise `setup.cfg` discovery runs from `start_dir`.
    pub fn extensions_for(&self, start_dir: &Path) -> (ExtensionSet, ExtensionSource) {
        if let Some(tokens) = &self.extensions {
            match ExtensionSet::from_tokens(tokens) {
                Some(extensions) => return (extensions, ExtensionSource::Options),
                None => warn!(
                    "Configured extensions {:?} are unusable, resolving from setup.cfg",
                    tokens
                ),
            }
        }
        ExtensionConfigResolver::default().resolve_with_source(start_dir)
    }

    /// Coalescing window as a [`Duration`].
    pub fn coalescing_window(&self) -> Duration {
        Duration::from_millis(self.coalescing_window_ms)
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Set the coalescing window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.coalescing_window_ms = window.as_millis() as u64;
        self
    }

    /// Set the backend.
    pub fn with_backend(mut self, backend: WatchBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Let `stop` cut short a drain that is still waiting.
    pub fn with_interrupt_drain_on_stop(mut self, interrupt: bool) -> Self {
        self.interrupt_drain_on_stop = interrupt;
        self
    }

    /// Override extension discovery with an explicit list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }
}
