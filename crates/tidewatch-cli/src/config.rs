//! Options loading for the CLI: config file first, then command-line overrides.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tidewatch_config::{WatchBackend, WatcherOptions};
use tracing::debug;

/// Command-line values that take precedence over the options file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub window_ms: Option<u64>,
    pub backend: Option<WatchBackend>,
    pub poll_interval_ms: Option<u64>,
}

/// Load options from `config_file`, else the default config path when it
/// exists, else built-in defaults. Overrides are applied last and the result
/// is validated.
pub fn load_options(config_file: Option<&Path>, overrides: &Overrides) -> Result<WatcherOptions> {
    let mut options = match config_file {
        Some(path) => WatcherOptions::load_from_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => {
                debug!("Using options file {}", path.display());
                WatcherOptions::load_from_file(&path)
                    .with_context(|| format!("Failed to load options from {}", path.display()))?
            }
            None => WatcherOptions::default(),
        },
    };

    if let Some(window_ms) = overrides.window_ms {
        options = options.with_window(Duration::from_millis(window_ms));
    }
    if let Some(backend) = overrides.backend {
        options = options.with_backend(backend);
    }
    if let Some(poll_interval_ms) = overrides.poll_interval_ms {
        options = options.with_poll_interval(Duration::from_millis(poll_interval_ms));
    }

    options.validate().context("Invalid watcher options")?;
    Ok(options)
}

/// `~/.config/tidewatch/config.toml` on Linux, the platform equivalent elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tidewatch").join("config.toml"))
}
