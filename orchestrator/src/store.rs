//! Durable preferences and the ordered-set helpers behind them.
//!
//! Everything in `Preferences` survives a session reset and an application
//! restart. The engine never writes here; only user actions do.

use engine::CollisionMode;
use serde::{Deserialize, Serialize};

/// Maximum length of the source and target history lists.
pub const MAX_HISTORY: usize = 10;

/// User defaults carried from one session to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Previously used source paths, newest first
    pub source_history: Vec<String>,
    /// Previously used target paths, newest first
    pub target_history: Vec<String>,
    /// Glob patterns excluded from every backup
    pub blacklist: Vec<String>,
    pub respect_gitignore: bool,
    pub include_source_dir: bool,
    pub collision_mode: CollisionMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            source_history: Vec::new(),
            target_history: Vec::new(),
            blacklist: vec!["node_modules".to_string(), ".git".to_string()],
            respect_gitignore: true,
            include_source_dir: true,
            collision_mode: CollisionMode::Skip,
        }
    }
}

impl Preferences {
    /// Bring a record read from disk back inside the store's invariants.
    ///
    /// The cache is hand-editable, so histories may be too long or contain
    /// duplicates; the first occurrence wins and the list is truncated.
    pub fn sanitized(mut self) -> Self {
        self.source_history = dedup(self.source_history);
        self.source_history.truncate(MAX_HISTORY);
        self.target_history = dedup(self.target_history);
        self.target_history.truncate(MAX_HISTORY);
        self.blacklist = dedup(self.blacklist);
        self
    }
}

/// Record `path` in a history list.
///
/// A path already present keeps its position; there is no move-to-front.
/// New paths are prepended and the list is cut to `MAX_HISTORY`.
pub fn add_to_history(history: &mut Vec<String>, path: &str) {
    if path.is_empty() || history.iter().any(|p| p == path) {
        return;
    }
    history.insert(0, path.to_string());
    history.truncate(MAX_HISTORY);
}

/// Append `path` unless an identical string is already present.
pub fn add_path(paths: &mut Vec<String>, path: &str) {
    if path.is_empty() || paths.iter().any(|p| p == path) {
        return;
    }
    paths.push(path.to_string());
}

/// Remove `path` if present.
pub fn remove_path(paths: &mut Vec<String>, path: &str) {
    paths.retain(|p| p != path);
}

/// Add a blacklist pattern; surrounding whitespace is not part of a pattern.
pub fn add_blacklist_item(blacklist: &mut Vec<String>, pattern: &str) {
    add_path(blacklist, pattern.trim());
}

/// Remove a blacklist pattern.
pub fn remove_blacklist_item(blacklist: &mut Vec<String>, pattern: &str) {
    remove_path(blacklist, pattern);
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        add_path(&mut out, &item);
    }
    out
}
