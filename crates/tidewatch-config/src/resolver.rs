//! Watched-extension discovery
//!
//! Searches upward from a starting directory for a marker file (`setup.cfg`)
//! and reads the extension list from its `[appengine:file_watcher]` section:
//!
//! ```ini
//! [appengine:file_watcher]
//! watched_extensions = .py, .go, .yaml, .html
//! ```
//!
//! Resolution never fails. A missing marker, missing section or key, an
//! unreadable file, or a value with no usable tokens all produce
//! [`ExtensionSet::default`].

use crate::extensions::ExtensionSet;
use ini::{Ini, ParseOption};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name that marks a directory as carrying watcher configuration.
pub const MARKER_FILE: &str = "setup.cfg";

/// INI section holding the watcher settings.
pub const CONFIG_SECTION: &str = "appengine:file_watcher";

/// Key within [`CONFIG_SECTION`] listing the watched extensions.
pub const CONFIG_KEY: &str = "watched_extensions";

/// Where a resolved [`ExtensionSet`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionSource {
    /// The explicit `extensions` list in [`crate::WatcherOptions`].
    Options,
    /// The watched-extensions entry of this marker file.
    Marker(PathBuf),
    /// This marker file was found but had no usable entry, so the defaults apply.
    UnusableMarker(PathBuf),
    /// No marker file above the start directory, so the defaults apply.
    Defaults,
}

/// Find the nearest directory, starting at `start_dir` and walking up through
/// its ancestors, that contains a regular file named `file_name`.
///
/// Returns the directory, not the file path. A relative `start_dir` is taken
/// relative to the process working directory, and the walk still climbs all
/// the way to the filesystem root.
pub fn find_upwards(file_name: &str, start_dir: &Path) -> Option<PathBuf> {
    let start = absolute_dir(start_dir);
    start
        .ancestors()
        .find(|dir| dir.join(file_name).is_file())
        .map(Path::to_path_buf)
}

fn absolute_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(e) => {
            warn!("Cannot read current directory ({}), searching from {}", e, dir.display());
            dir.to_path_buf()
        }
    }
}

/// Resolve the watched extensions for `start_dir` using the standard marker.
pub fn resolve_extensions(start_dir: &Path) -> ExtensionSet {
    ExtensionConfigResolver::default().resolve(start_dir)
}

/// Resolve the watched extensions starting from the process working directory.
///
/// Falls back to the default set when the working directory is unavailable.
pub fn resolve_extensions_from_current_dir() -> ExtensionSet {
    match std::env::current_dir() {
        Ok(dir) => resolve_extensions(&dir),
        Err(e) => {
            warn!("Cannot read current directory ({}), using default extensions", e);
            ExtensionSet::default()
        }
    }
}

/// Locates and reads the watcher's extension configuration.
#[derive(Debug, Clone)]
pub struct ExtensionConfigResolver {
    marker_file: String,
    section: String,
    key: String,
}

impl ExtensionConfigResolver {
    /// Create a resolver for a custom marker file, section and key.
    pub fn new(
        marker_file: impl Into<String>,
        section: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            marker_file: marker_file.into(),
            section: section.into(),
            key: key.into(),
        }
    }

    /// Marker file name this resolver looks for.
    pub fn marker_file(&self) -> &str {
        &self.marker_file
    }

    /// Resolve the extension set, searching upward from `start_dir`.
    pub fn resolve(&self, start_dir: &Path) -> ExtensionSet {
        self.resolve_with_source(start_dir).0
    }

    /// Like [`resolve`](Self::resolve), also reporting which marker file, if
    /// any, supplied the result.
    pub fn resolve_with_source(&self, start_dir: &Path) -> (ExtensionSet, ExtensionSource) {
        let Some(config_dir) = find_upwards(&self.marker_file, start_dir) else {
            debug!(
                "No {} found above {}, using default extensions",
                self.marker_file,
                start_dir.display()
            );
            return (ExtensionSet::default(), ExtensionSource::Defaults);
        };

        let marker = config_dir.join(&self.marker_file);
        match self.read_extensions(&marker) {
            Some(extensions) => {
                debug!("Watched extensions from {}: {}", marker.display(), extensions);
                (extensions, ExtensionSource::Marker(marker))
            }
            None => (ExtensionSet::default(), ExtensionSource::UnusableMarker(marker)),
        }
    }

    fn read_extensions(&self, marker: &Path) -> Option<ExtensionSet> {
        let config = match Ini::load_from_file_opt(marker, marker_parse_option()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse {}: {}", marker.display(), e);
                return None;
            }
        };

        let Some(section) = config.section(Some(self.section.as_str())) else {
            debug!("{} has no [{}] section", marker.display(), self.section);
            return None;
        };

        let Some(raw) = section.get(self.key.as_str()) else {
            debug!("[{}] in {} has no '{}' key", self.section, marker.display(), self.key);
            return None;
        };

        let extensions = ExtensionSet::parse(raw);
        if extensions.is_none() {
            warn!(
                "'{}' in {} lists no usable extensions: {:?}",
                self.key,
                marker.display(),
                raw
            );
        }
        extensions
    }
}

/// Parse marker files the way setuptools writes them: indented continuation
/// lines extend the previous value, and quotes and backslashes are literal.
fn marker_parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    }
}

impl Default for ExtensionConfigResolver {
    fn default() -> Self {
        Self::new(MARKER_FILE, CONFIG_SECTION, CONFIG_KEY)
    }
}
