//! Progress notifications.
//!
//! The engine reports on a running backup through three one-way channels.
//! Their payloads are defined here together with the `EventSink` trait, which
//! keeps the engine independent from whatever delivers the notifications
//! (a GUI event loop, a CLI printer, a test recorder).

use serde::{Deserialize, Serialize};

/// Channel name of the per-file progress notification.
pub const PROGRESS_CHANNEL: &str = "backup-progress";
/// Channel name of the final notification of a run.
pub const COMPLETE_CHANNEL: &str = "backup-complete";
/// Channel name of the per-file error notification.
pub const ERROR_CHANNEL: &str = "backup-error";

/// Sent after each file has been copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupProgress {
    pub current_file: String,
    pub copied_count: u64,
    pub skipped_count: u64,
    pub total_count: u64,
}

/// Sent exactly once, when a run has processed every source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupComplete {
    pub success: bool,
    pub copied_count: u64,
    pub skipped_count: u64,
    pub message: String,
}

/// Sent for every file or directory that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupError {
    pub message: String,
    pub file: Option<String>,
}

/// Receiver of engine notifications.
///
/// Methods are called synchronously from the thread running the backup, in
/// the order the events happen. Implementations must not block for long.
pub trait EventSink: Send + Sync {
    /// A file was copied.
    fn on_progress(&self, progress: &BackupProgress);

    /// A file or directory failed; the run continues.
    fn on_error(&self, error: &BackupError);

    /// The run is over. No further notifications follow for this run.
    fn on_complete(&self, complete: &BackupComplete);
}
