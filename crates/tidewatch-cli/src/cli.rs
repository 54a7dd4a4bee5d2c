use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tidewatch_config::WatchBackend;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Backend choice on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// OS notifications (inotify, FSEvents, ReadDirectoryChangesW)
    Native,
    /// Periodic rescans
    Polling,
}

impl From<BackendArg> for WatchBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Native => WatchBackend::Native,
            BackendArg::Polling => WatchBackend::Polling,
        }
    }
}

#[derive(Parser)]
#[command(name = "tidewatch")]
#[command(about = "tidewatch - report changed source files in debounced batches")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options file (defaults to ~/.config/tidewatch/config.toml when present)
    #[arg(short = 'C', long, global = true, env = "TIDEWATCH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch directories and print changed files after each batch
    Watch {
        /// Directories to watch; the first one is searched for setup.cfg
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Coalescing window in milliseconds
        #[arg(long)]
        window_ms: Option<u64>,

        /// Notification backend
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,

        /// Rescan interval for the polling backend, in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Print each batch as a JSON array instead of one path per line
        #[arg(long)]
        json: bool,

        /// Drain a single batch, print it, and exit
        #[arg(long)]
        once: bool,
    },

    /// Show which extensions would be watched from a directory
    Extensions {
        /// Directory to start the setup.cfg search from (defaults to the current directory)
        dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Effective log level: explicit level, then --verbose, then warnings only.
    pub fn effective_log_level(&self) -> LogLevel {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level,
            (None, true) => LogLevel::Debug,
            (None, false) => LogLevel::Warn,
        }
    }
}
