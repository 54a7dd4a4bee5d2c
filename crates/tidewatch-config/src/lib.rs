//! # tidewatch configuration
//!
//! Configuration inputs for the tidewatch change watcher:
//!
//! - [`ExtensionSet`] and [`ExtensionConfigResolver`], which discover the file
//!   extensions worth watching by searching upward from a directory for a
//!   `setup.cfg` carrying an `[appengine:file_watcher]` section.
//! - [`WatcherOptions`], the optional configuration bag a host passes when it
//!   constructs a watcher (coalescing window, backend, overrides).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tidewatch_config::{resolve_extensions, WatcherOptions};
//!
//! let extensions = resolve_extensions(std::path::Path::new("/srv/app"));
//! println!("watching {}", extensions);
//!
//! let options = WatcherOptions::default().with_window(std::time::Duration::from_millis(250));
//! assert_eq!(options.coalescing_window_ms, 250);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod extensions;
mod options;
mod resolver;

pub use error::ConfigError;
pub use extensions::{ExtensionSet, DEFAULT_EXTENSIONS};
pub use options::{WatchBackend, WatcherOptions};
pub use resolver::{
    find_upwards, resolve_extensions, resolve_extensions_from_current_dir,
    ExtensionConfigResolver, ExtensionSource, CONFIG_KEY, CONFIG_SECTION, MARKER_FILE,
};
