//! Core data model for backup requests.
//!
//! This module defines what the engine is asked to do:
//! - BackupRequest: the full argument list of one `backup_directory` call
//! - CollisionMode: how an already-existing destination file is handled

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for handling files that already exist at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionMode {
    /// Replace the existing file
    Overwrite,
    /// Leave the existing file alone and count the source as skipped
    #[default]
    Skip,
    /// Copy under a free `<stem>_<n>.<ext>` name next to the existing file
    Rename,
}

impl CollisionMode {
    /// All modes, in the order front-ends list them.
    pub const ALL: [CollisionMode; 3] = [
        CollisionMode::Overwrite,
        CollisionMode::Skip,
        CollisionMode::Rename,
    ];

    /// Wire name used by the `backup_directory` call.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionMode::Overwrite => "overwrite",
            CollisionMode::Skip => "skip",
            CollisionMode::Rename => "rename",
        }
    }

    /// Parse a mode from its wire name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Some(CollisionMode::Overwrite),
            "skip" => Some(CollisionMode::Skip),
            "rename" => Some(CollisionMode::Rename),
            _ => None,
        }
    }
}

impl fmt::Display for CollisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionMode::Overwrite => write!(f, "Overwrite"),
            CollisionMode::Skip => write!(f, "Skip"),
            CollisionMode::Rename => write!(f, "Rename"),
        }
    }
}

/// The arguments of one `backup_directory` invocation.
///
/// Paths are carried as strings, exactly as the caller entered them; the
/// engine resolves them against the filesystem itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRequest {
    /// Files or directories to back up, in the order they were chosen
    pub source_paths: Vec<String>,

    /// Directory that receives the copies (created if missing)
    pub target_path: String,

    /// Glob patterns excluded from the copy
    pub blacklist: Vec<String>,

    /// Honour `.gitignore` files found inside directory sources
    pub respect_gitignore: bool,

    /// Copy a directory source as `target/<name>/...` instead of into `target` directly
    pub include_source_dir: bool,

    /// What to do when a destination file already exists
    pub collision_mode: CollisionMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_mode_parse() {
        assert_eq!(CollisionMode::parse("skip"), Some(CollisionMode::Skip));
        assert_eq!(CollisionMode::parse("Rename"), Some(CollisionMode::Rename));
        assert_eq!(CollisionMode::parse(" OVERWRITE "), Some(CollisionMode::Overwrite));
        assert_eq!(CollisionMode::parse("ask"), None);
    }

    #[test]
    fn test_collision_mode_wire_name_matches_serde() {
        for mode in CollisionMode::ALL {
            let json = serde_json::to_string(&mode).expect("serialize");
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn test_request_uses_snake_case_fields() {
        let request = BackupRequest {
            source_paths: vec!["/a".to_string()],
            target_path: "/b".to_string(),
            blacklist: vec![],
            respect_gitignore: true,
            include_source_dir: false,
            collision_mode: CollisionMode::Rename,
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["target_path"], "/b");
        assert_eq!(value["collision_mode"], "rename");
        assert_eq!(value["include_source_dir"], false);
    }
}
