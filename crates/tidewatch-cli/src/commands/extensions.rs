use anyhow::{Context, Result};
use std::path::PathBuf;
use tidewatch_config::{ExtensionSet, ExtensionSource, WatcherOptions};

/// Print the extension set and glob patterns that `watch` would use from `dir`,
/// honouring the `extensions` list of the loaded options.
pub fn execute(dir: Option<PathBuf>, options: &WatcherOptions) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Cannot access {}", dir.display()))?;

    let (extensions, source) = options.extensions_for(&dir);
    print!("{}", render(&extensions, &source));
    Ok(())
}

fn render(extensions: &ExtensionSet, source: &ExtensionSource) -> String {
    let origin = match source {
        ExtensionSource::Options => "options file (extensions)".to_string(),
        ExtensionSource::Marker(path) => path.display().to_string(),
        ExtensionSource::UnusableMarker(path) => {
            format!("defaults ({} has no usable entry)", path.display())
        }
        ExtensionSource::Defaults => "defaults".to_string(),
    };

    format!(
        "extensions: {}\npatterns: {}\nsource: {}\n",
        extensions,
        extensions.patterns().join(" "),
        origin
    )
}
