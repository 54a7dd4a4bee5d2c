//! Error types for the change watcher.

use thiserror::Error;

/// Errors that can occur while setting up or running a watcher.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system watching error.
    #[error("File watching error: {0}")]
    Watch(String),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pattern matching error.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Invalid path.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Watch not found.
    #[error("Watch for path '{0}' not found")]
    WatchNotFound(String),

    /// The watcher was stopped and cannot be restarted.
    #[error("Watcher has been stopped; create a new watcher to resume")]
    Stopped,
}

/// Result type for watcher operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert notify errors to our error type.
impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}

/// Convert globset errors to our error type.
impl From<globset::Error> for Error {
    fn from(err: globset::Error) -> Self {
        Error::Pattern(err.to_string())
    }
}

/// Convert options errors to our error type.
impl From<tidewatch_config::ConfigError> for Error {
    fn from(err: tidewatch_config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
