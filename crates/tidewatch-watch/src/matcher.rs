//! Suffix-glob matching of changed paths against the watched extensions.

use crate::error::Result;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use tidewatch_config::ExtensionSet;

/// Decides whether a path is interesting, based on its base name.
///
/// Built once per watcher from an [`ExtensionSet`]; one `*<ext>` glob per
/// extension. Matching is case-insensitive. Directory paths are judged by
/// the same rule as files, so a directory named `models.py` matches.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<String>,
    globs: GlobSet,
}

impl PatternMatcher {
    /// Compile the suffix patterns for `extensions`.
    pub fn new(extensions: &ExtensionSet) -> Result<Self> {
        let patterns = extensions.patterns();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern).case_insensitive(true).build()?;
            builder.add(glob);
        }

        Ok(Self {
            patterns,
            globs: builder.build()?,
        })
    }

    /// Whether the base name of `path` ends with a watched extension.
    pub fn matches(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.globs.is_match(name),
            None => false,
        }
    }

    /// The glob patterns in use, e.g. `["*.go", "*.py", "*.yaml"]`.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
