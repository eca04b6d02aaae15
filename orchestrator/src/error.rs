//! Error types for the orchestrator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The engine refused a submission.
///
/// The message is the engine's own wording; it reaches the user unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Rejection {
            message: message.into(),
        }
    }
}

impl From<engine::EngineError> for Rejection {
    fn from(err: engine::EngineError) -> Self {
        Rejection::new(err.to_string())
    }
}

/// Errors reading or writing the preference cache.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to read preference cache {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write preference cache {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Malformed preference cache {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
