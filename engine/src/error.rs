//! Error types for the backup engine.
//!
//! The primary error type is `EngineError`. Only `prepare_request` returns it
//! to the caller, as a rejection of the whole request. Failures while copying
//! individual files are reported through the `backup-error` notification and
//! never abort a run.

use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Errors raised by the engine.
#[derive(Debug)]
pub enum EngineError {
    /// The request named no source paths
    NoSources,

    /// A source path does not exist
    SourceNotFound { path: String },

    /// The target path is empty
    EmptyTarget,

    /// The target directory could not be created
    TargetCreationFailed { path: PathBuf, source: io::Error },

    /// Failed to read from source file
    ReadError { path: PathBuf, source: io::Error },

    /// Failed to write to destination file
    WriteError { path: PathBuf, source: io::Error },

    /// Failed to create a directory below the target
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// The directory walker reported an entry it could not read
    WalkFailed { message: String },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSources => write!(f, "No source paths provided"),
            Self::SourceNotFound { path } => {
                write!(f, "Source path does not exist: {}", path)
            }
            Self::EmptyTarget => write!(f, "No target path provided"),
            Self::TargetCreationFailed { source, .. } => {
                write!(f, "Failed to create target directory: {}", source)
            }
            Self::ReadError { source, .. } => write!(f, "{}", source),
            Self::WriteError { source, .. } => write!(f, "{}", source),
            Self::DirectoryCreationFailed { source, .. } => write!(f, "{}", source),
            Self::WalkFailed { message } => write!(f, "Walker error: {}", message),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TargetCreationFailed { source, .. }
            | Self::ReadError { source, .. }
            | Self::WriteError { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

