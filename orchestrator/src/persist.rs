//! Local cache of the durable preferences.
//!
//! The record holds the `Preferences` subset only. Paths selected for the
//! current session, progress and errors are never written, so a relaunch
//! restores defaults but never a half-finished session.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};
use crate::store::Preferences;

/// Namespace stamped into every record.
pub const CACHE_NAMESPACE: &str = "backup-preferences";
/// Current record layout.
pub const CACHE_VERSION: u32 = 1;

const FILE_NAME: &str = "preferences.json";

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    namespace: String,
    version: u32,
    state: Preferences,
}

/// A preference record on disk.
#[derive(Debug, Clone)]
pub struct PreferenceCache {
    path: PathBuf,
}

impl PreferenceCache {
    /// Use an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PreferenceCache { path: path.into() }
    }

    /// The platform default: `<config dir>/backup-orchestrator/preferences.json`.
    pub fn default_location() -> CacheResult<Self> {
        let dirs =
            ProjectDirs::from("", "", "backup-orchestrator").ok_or(CacheError::NoConfigDir)?;
        Ok(PreferenceCache::new(dirs.config_dir().join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preferences.
    ///
    /// A missing file is `Ok(None)`. A record stamped with another namespace
    /// is treated as missing.
    pub fn load(&self) -> CacheResult<Option<Preferences>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let record: CacheRecord =
            serde_json::from_str(&content).map_err(|e| CacheError::Parse {
                path: self.path.clone(),
                source: e,
            })?;

        if record.namespace != CACHE_NAMESPACE {
            tracing::warn!(
                path = %self.path.display(),
                namespace = %record.namespace,
                "preference cache belongs to another namespace, ignoring"
            );
            return Ok(None);
        }

        Ok(Some(record.state.sanitized()))
    }

    /// Load, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> Preferences {
        match self.load() {
            Ok(Some(prefs)) => {
                tracing::debug!(path = %self.path.display(), "preferences restored");
                prefs
            }
            Ok(None) => Preferences::default(),
            Err(e) => {
                tracing::warn!(error = %e, "using default preferences");
                Preferences::default()
            }
        }
    }

    /// Write the preferences atomically (temp file, then rename).
    pub fn save(&self, preferences: &Preferences) -> CacheResult<()> {
        let record = CacheRecord {
            namespace: CACHE_NAMESPACE.to_string(),
            version: CACHE_VERSION,
            state: preferences.clone(),
        };
        let content = serde_json::to_string_pretty(&record)?;

        let write_err = |e: io::Error| CacheError::Write {
            path: self.path.clone(),
            source: e,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path).map_err(write_err)?;
            file.write_all(content.as_bytes()).map_err(write_err)?;
            file.sync_all().map_err(write_err)?;
        }
        fs::rename(&temp_path, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
