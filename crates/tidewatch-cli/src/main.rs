use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use tidewatch_cli::{
    cli::{Cli, Commands},
    commands,
    config::{self, Overrides},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --log-level
    let level: LevelFilter = cli.effective_log_level().into();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Watch {
            roots,
            window_ms,
            backend,
            poll_interval_ms,
            json,
            once,
        } => {
            let overrides = Overrides {
                window_ms,
                backend: backend.map(Into::into),
                poll_interval_ms,
            };
            let options = config::load_options(cli.config.as_deref(), &overrides)?;
            commands::watch::execute(roots, options, commands::watch::WatchOutput { json, once })
                .await?;
        }
        Commands::Extensions { dir } => {
            let options = config::load_options(cli.config.as_deref(), &Overrides::default())?;
            commands::extensions::execute(dir, &options)?;
        }
    }

    Ok(())
}
