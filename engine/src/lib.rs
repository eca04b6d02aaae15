//! # BackUP Engine - Backup Copy Library
//!
//! A headless copy engine behind the `backup_directory` call. It is driven by
//! the session orchestrator and by tests, and reports back only through the
//! three notifications defined in `progress`.
//!
//! ## Overview
//!
//! - Multiple file or directory sources per request
//! - Glob blacklist and optional `.gitignore` handling
//! - Collision modes: overwrite, skip, rename
//! - Per-file error isolation; exactly one completion notification per run
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{backup_directory, BackupRequest, CollisionMode, EventSink};
//! use engine::{BackupComplete, BackupError, BackupProgress};
//!
//! struct Printer;
//!
//! impl EventSink for Printer {
//!     fn on_progress(&self, p: &BackupProgress) {
//!         println!("{}/{} {}", p.copied_count, p.total_count, p.current_file);
//!     }
//!     fn on_error(&self, e: &BackupError) {
//!         eprintln!("{}", e.message);
//!     }
//!     fn on_complete(&self, c: &BackupComplete) {
//!         println!("{}", c.message);
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = BackupRequest {
//!     source_paths: vec!["/home/me/project".to_string()],
//!     target_path: "/mnt/backup".to_string(),
//!     blacklist: vec!["node_modules".to_string()],
//!     respect_gitignore: true,
//!     include_source_dir: true,
//!     collision_mode: CollisionMode::Skip,
//! };
//! backup_directory(&request, &Printer)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Request and collision mode
//! - **error**: Error types and handling
//! - **filter**: Blacklist matching
//! - **fs_ops**: Low-level filesystem operations
//! - **job**: Request preparation and execution
//! - **progress**: Notification payloads and the sink trait

pub mod model;
pub mod error;
pub mod filter;
pub mod fs_ops;
pub mod job;
pub mod progress;

// Re-export main types and functions
pub use model::{BackupRequest, CollisionMode};
pub use error::EngineError;
pub use job::{backup_directory, count_files, prepare_request, run_backup};
pub use progress::{
    BackupComplete, BackupError, BackupProgress, EventSink, COMPLETE_CHANNEL, ERROR_CHANNEL,
    PROGRESS_CHANNEL,
};
