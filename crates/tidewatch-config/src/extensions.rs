//! The set of file extensions a watcher cares about.

use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Extensions watched when no configuration says otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".go", ".py", ".yaml"];

/// Characters that would turn an extension into a broader glob.
const GLOB_METACHARACTERS: &[char] = &['*', '?', '[', ']', '{', '}', '!'];

/// Non-empty set of extension tokens, each stored lowercase with a leading `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: BTreeSet<String>,
}

impl ExtensionSet {
    /// Build a set from raw tokens.
    ///
    /// Tokens are trimmed, lowercased and given a leading `.` when missing.
    /// Tokens that contain glob metacharacters or path separators are
    /// discarded. Returns `None` when no token survives, so callers can fall
    /// back to [`ExtensionSet::default`].
    pub fn from_tokens<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: BTreeSet<String> = tokens
            .into_iter()
            .filter_map(|token| normalize_token(token.as_ref()))
            .collect();

        if extensions.is_empty() {
            None
        } else {
            Some(Self { extensions })
        }
    }

    /// Parse a configuration value.
    ///
    /// The value is split on commas and whitespace, so both
    /// `.py, .go` and a multi-line list work.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_tokens(
            raw.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty()),
        )
    }

    /// Iterate over the extensions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Number of extensions. Never zero.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Whether `extension` (with or without the leading dot) is in the set.
    pub fn contains(&self, extension: &str) -> bool {
        normalize_token(extension).is_some_and(|ext| self.extensions.contains(&ext))
    }

    /// Suffix glob patterns, one `*<ext>` per extension.
    pub fn patterns(&self) -> Vec<String> {
        self.iter().map(|ext| format!("*{}", ext)).collect()
    }

    /// Whether this is exactly the built-in default set.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

fn normalize_token(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if token.contains(GLOB_METACHARACTERS) || token.contains(['/', '\\']) {
        warn!("Ignoring watched extension '{}': not a plain extension", token);
        return None;
    }

    if token.chars().all(|c| c == '.') {
        warn!("Ignoring watched extension '{}': no suffix after the dot", token);
        return None;
    }

    let lower = token.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{}", lower))
    }
}
