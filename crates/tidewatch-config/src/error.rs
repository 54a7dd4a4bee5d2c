//! Error types for configuration loading.

use thiserror::Error;

/// Errors raised while loading a [`crate::WatcherOptions`] file.
///
/// Extension discovery never produces these; it falls back to the default set.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The options file is not valid TOML or does not fit the schema.
    #[error("Failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value outside its accepted range.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// Description of the rejected value.
        value: String,
    },
}
