//! Per-run state: the submitted snapshot, live progress, outcome and errors.

use chrono::{DateTime, Local};
use engine::{BackupComplete, BackupError, BackupProgress, BackupRequest, CollisionMode};
use uuid::Uuid;

use crate::store::{self, Preferences};

/// Number of error entries a front-end shows before summarising the rest.
pub const VISIBLE_ERRORS: usize = 10;

/// Immutable copy of the form taken when a backup is submitted.
///
/// Fields are private; a new submission builds a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    id: Uuid,
    submitted_at: DateTime<Local>,
    source_paths: Vec<String>,
    target_path: String,
    blacklist: Vec<String>,
    respect_gitignore: bool,
    include_source_dir: bool,
    collision_mode: CollisionMode,
}

impl SessionConfig {
    /// Snapshot the form, or `None` if the submit guard fails
    /// (no source path, or a blank target).
    pub fn capture(
        source_paths: &[String],
        target_path: &str,
        preferences: &Preferences,
    ) -> Option<Self> {
        if !is_submittable(source_paths, target_path) {
            return None;
        }

        let mut sources = Vec::with_capacity(source_paths.len());
        for path in source_paths {
            store::add_path(&mut sources, path);
        }
        let mut blacklist = Vec::with_capacity(preferences.blacklist.len());
        for pattern in &preferences.blacklist {
            store::add_path(&mut blacklist, pattern);
        }

        Some(SessionConfig {
            id: Uuid::new_v4(),
            submitted_at: Local::now(),
            source_paths: sources,
            target_path: target_path.trim().to_string(),
            blacklist,
            respect_gitignore: preferences.respect_gitignore,
            include_source_dir: preferences.include_source_dir,
            collision_mode: preferences.collision_mode,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn submitted_at(&self) -> DateTime<Local> {
        self.submitted_at
    }

    pub fn source_paths(&self) -> &[String] {
        &self.source_paths
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    pub fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }

    pub fn include_source_dir(&self) -> bool {
        self.include_source_dir
    }

    pub fn collision_mode(&self) -> CollisionMode {
        self.collision_mode
    }

    /// The argument list handed to the engine.
    pub fn to_request(&self) -> BackupRequest {
        BackupRequest {
            source_paths: self.source_paths.clone(),
            target_path: self.target_path.clone(),
            blacklist: self.blacklist.clone(),
            respect_gitignore: self.respect_gitignore,
            include_source_dir: self.include_source_dir,
            collision_mode: self.collision_mode,
        }
    }
}

/// The submit guard: at least one source and a non-blank target.
pub fn is_submittable(source_paths: &[String], target_path: &str) -> bool {
    !source_paths.is_empty() && !target_path.trim().is_empty()
}

/// Integer percentage of processed files, rounded half up; 0 when nothing is known.
pub fn percent(copied: u64, skipped: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = u128::from(copied) + u128::from(skipped);
    let rounded = (done * 200 + u128::from(total)) / (u128::from(total) * 2);
    rounded.min(100) as u8
}

/// Live counters of the running session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub current_file: String,
    pub copied_count: u64,
    pub skipped_count: u64,
    pub total_count: u64,
    finished: bool,
}

impl ProgressState {
    /// Replace every counter with the values of a progress notification.
    pub fn from_event(event: &BackupProgress) -> Self {
        ProgressState {
            current_file: event.current_file.clone(),
            copied_count: event.copied_count,
            skipped_count: event.skipped_count,
            total_count: event.total_count,
            finished: false,
        }
    }

    /// Percentage from the current counts, or 100 once the run finished.
    pub fn percent(&self) -> u8 {
        if self.finished {
            return 100;
        }
        percent(self.copied_count, self.skipped_count, self.total_count)
    }

    /// Mark the run as finished: counts from the final notification, 100%.
    pub fn finish(&mut self, complete: &BackupComplete) {
        self.copied_count = complete.copied_count;
        self.skipped_count = complete.skipped_count;
        self.finished = true;
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub success: bool,
    pub message: String,
    pub copied_count: u64,
    pub skipped_count: u64,
    pub finished_at: DateTime<Local>,
}

impl CompletionOutcome {
    pub fn from_event(event: &BackupComplete) -> Self {
        CompletionOutcome {
            success: event.success,
            message: event.message.clone(),
            copied_count: event.copied_count,
            skipped_count: event.skipped_count,
            finished_at: Local::now(),
        }
    }

    /// The engine refused the request; its message is kept verbatim.
    pub fn rejected(message: impl Into<String>) -> Self {
        CompletionOutcome {
            success: false,
            message: message.into(),
            copied_count: 0,
            skipped_count: 0,
            finished_at: Local::now(),
        }
    }
}

/// One per-file failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub message: String,
    pub file: Option<String>,
}

impl From<&BackupError> for ErrorEntry {
    fn from(event: &BackupError) -> Self {
        ErrorEntry {
            message: event.message.clone(),
            file: event.file.clone(),
        }
    }
}

/// Append-only list of per-file failures for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
}

impl ErrorLog {
    pub fn push(&mut self, entry: ErrorEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// The first `VISIBLE_ERRORS` entries.
    pub fn visible(&self) -> &[ErrorEntry] {
        &self.entries[..self.entries.len().min(VISIBLE_ERRORS)]
    }

    /// How many entries `visible` leaves out.
    pub fn hidden_count(&self) -> usize {
        self.entries.len().saturating_sub(VISIBLE_ERRORS)
    }
}

/// Everything that belongs to one submitted run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub config: Option<SessionConfig>,
    pub progress: ProgressState,
    pub outcome: Option<CompletionOutcome>,
    pub errors: ErrorLog,
}

impl Session {
    /// A fresh session for a new snapshot: zero progress, no errors.
    pub fn start(config: SessionConfig) -> Self {
        Session {
            config: Some(config),
            ..Session::default()
        }
    }
}
