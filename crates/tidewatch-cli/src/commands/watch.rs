use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tidewatch_config::WatcherOptions;
use tidewatch_watch::{ChangeSet, ChangeWatcher};
use tracing::{debug, info};

/// Output settings for the watch loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchOutput {
    pub json: bool,
    pub once: bool,
}

/// Watch `roots` and print every non-empty batch until Ctrl-C, or after the
/// first drain with `once`.
pub async fn execute(roots: Vec<PathBuf>, options: WatcherOptions, output: WatchOutput) -> Result<()> {
    let watcher = ChangeWatcher::new(roots, options).context("Failed to set up watcher")?;
    watcher.start().context("Failed to start watching")?;

    info!(
        "Watching {} root(s) for {}",
        watcher.roots().len(),
        watcher.extensions()
    );

    let result = drain_loop(&watcher, output).await;
    watcher.stop();
    result
}

async fn drain_loop(watcher: &ChangeWatcher, output: WatchOutput) -> Result<()> {
    let stdout = std::io::stdout();

    loop {
        tokio::select! {
            changes = watcher.drain() => {
                debug!("Drained {} change(s)", changes.len());
                if let Some(rendered) = render_batch(&changes, output.json)? {
                    let mut out = stdout.lock();
                    writeln!(out, "{}", rendered).context("Failed to write to stdout")?;
                    out.flush().context("Failed to write to stdout")?;
                }
                if output.once {
                    return Ok(());
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!("Interrupted, stopping");
                return Ok(());
            }
        }
    }
}

/// Render a batch as sorted paths, one per line, or as a JSON array.
/// Empty batches render to nothing.
pub fn render_batch(changes: &ChangeSet, json: bool) -> Result<Option<String>> {
    if changes.is_empty() {
        return Ok(None);
    }

    let mut paths: Vec<String> = changes
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    paths.sort();

    let rendered = if json {
        serde_json::to_string(&paths).context("Failed to encode batch as JSON")?
    } else {
        paths.join("\n")
    };
    Ok(Some(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(paths: &[&str]) -> ChangeSet {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn empty_batch_renders_nothing() {
        assert_eq!(render_batch(&ChangeSet::new(), false).unwrap(), None);
        assert_eq!(render_batch(&ChangeSet::new(), true).unwrap(), None);
    }

    #[test]
    fn plain_output_is_sorted_lines() {
        let rendered = render_batch(&batch(&["/srv/b.py", "/srv/a.go"]), false).unwrap();
        assert_eq!(rendered.as_deref(), Some("/srv/a.go\n/srv/b.py"));
    }

    #[test]
    fn json_output_is_a_sorted_array() {
        let rendered = render_batch(&batch(&["/srv/b.py", "/srv/a.go"]), true)
            .unwrap()
            .unwrap();
        let parsed: Vec<String> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, vec!["/srv/a.go".to_string(), "/srv/b.py".to_string()]);
    }
}
