//! Optional stopword list for the word-frequency report.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Parse one word per line; entries are trimmed and lowercased.
pub fn parse_ignore_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Load the ignore list at `path`.
///
/// A missing file is simply an empty list. Other read failures also yield
/// an empty list and are only visible at debug level.
pub fn load_ignore_list(path: &Path) -> HashSet<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let words = parse_ignore_list(&content);
            debug!("Loaded {} ignored words from {}", words.len(), path.display());
            words
        }
        Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
        Err(e) => {
            debug!("Could not read ignore list {}: {}", path.display(), e);
            HashSet::new()
        }
    }
}
