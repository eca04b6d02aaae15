//! Backup execution.
//!
//! This module provides the lifecycle of one `backup_directory` call:
//! - Preparing a request (the synchronous part that may reject it)
//! - Counting the files a request will copy
//! - Running the copy and reporting through an `EventSink`

use std::fs;
use std::path::{Path, PathBuf};
use ignore::{Walk, WalkBuilder};
use crate::error::EngineError;
use crate::filter::Blacklist;
use crate::fs_ops;
use crate::model::BackupRequest;
use crate::progress::{BackupComplete, BackupError, BackupProgress, EventSink};

/// Validate a request and create its target directory.
///
/// This is everything `backup_directory` does before it starts copying. An
/// error here means the request was refused; nothing has been emitted.
///
/// # Errors
/// Returns EngineError if there are no sources, a source is missing, the
/// target is empty, or the target directory cannot be created.
pub fn prepare_request(request: &BackupRequest) -> Result<(), EngineError> {
    if request.source_paths.is_empty() {
        return Err(EngineError::NoSources);
    }

    if request.target_path.trim().is_empty() {
        return Err(EngineError::EmptyTarget);
    }

    if let Some(missing) = request
        .source_paths
        .iter()
        .find(|path| !Path::new(path.as_str()).exists())
    {
        return Err(EngineError::SourceNotFound {
            path: missing.clone(),
        });
    }

    let target = Path::new(&request.target_path);
    fs::create_dir_all(target).map_err(|e| EngineError::TargetCreationFailed {
        path: target.to_path_buf(),
        source: e,
    })
}

/// Prepare and run a request in one call.
///
/// # Errors
/// Returns the rejection from `prepare_request`. Once copying has started
/// the run always completes and reports failures through `sink`.
pub fn backup_directory(
    request: &BackupRequest,
    sink: &dyn EventSink,
) -> Result<BackupComplete, EngineError> {
    prepare_request(request)?;
    Ok(run_backup(request, sink))
}

/// Count the files a request will copy, honouring blacklist and gitignore.
pub fn count_files(request: &BackupRequest) -> u64 {
    let blacklist = Blacklist::new(&request.blacklist);
    let mut count = 0;

    for source_path in &request.source_paths {
        let source = Path::new(source_path);

        if source.is_file() {
            if let Some(file_name) = source.file_name() {
                if !blacklist.is_blacklisted(Path::new(file_name)) {
                    count += 1;
                }
            }
        } else if source.is_dir() {
            count += walk(source, request, &blacklist)
                .filter_map(Result::ok)
                .filter(|entry| entry.path().is_file())
                .count() as u64;
        }
    }

    count
}

/// Copy every source of a prepared request into its target.
///
/// Emits `on_progress` after each copied file, `on_error` for each failure,
/// and exactly one `on_complete` at the end. The returned value is the same
/// one passed to `on_complete`.
pub fn run_backup(request: &BackupRequest, sink: &dyn EventSink) -> BackupComplete {
    let mut run = Run {
        request,
        blacklist: Blacklist::new(&request.blacklist),
        sink,
        total_count: count_files(request),
        copied_count: 0,
        skipped_count: 0,
        error_count: 0,
    };

    tracing::info!(
        sources = request.source_paths.len(),
        target = %request.target_path,
        total = run.total_count,
        collision = request.collision_mode.as_str(),
        "backup started"
    );

    let target = Path::new(&request.target_path);
    for source_path in &request.source_paths {
        let source = Path::new(source_path);
        if source.is_file() {
            run.copy_file_source(source, target);
        } else if source.is_dir() {
            run.copy_directory_source(source, target);
        } else {
            tracing::warn!(source = %source_path, "source vanished before copy");
            run.report_error(
                EngineError::SourceNotFound {
                    path: source_path.clone(),
                }
                .to_string(),
                Some(source_path.clone()),
            );
        }
    }

    let complete = run.finish();
    sink.on_complete(&complete);
    complete
}

/// Build the directory walker shared by counting and copying.
///
/// Blacklisted entries are pruned, so excluded directories are never entered.
fn walk(source: &Path, request: &BackupRequest, blacklist: &Blacklist) -> Walk {
    let root = source.to_path_buf();
    let blacklist = blacklist.clone();

    let mut builder = WalkBuilder::new(source);
    builder
        .hidden(false)
        .parents(request.respect_gitignore)
        .ignore(request.respect_gitignore)
        .git_ignore(request.respect_gitignore)
        .git_global(false)
        .git_exclude(request.respect_gitignore)
        .require_git(false)
        .filter_entry(move |entry| match entry.path().strip_prefix(&root) {
            Ok(relative) => !blacklist.is_blacklisted(relative),
            Err(_) => true,
        });

    builder.build()
}

/// Counters and collaborators of one run.
struct Run<'a> {
    request: &'a BackupRequest,
    blacklist: Blacklist,
    sink: &'a dyn EventSink,
    total_count: u64,
    copied_count: u64,
    skipped_count: u64,
    error_count: u64,
}

impl Run<'_> {
    fn copy_file_source(&mut self, source: &Path, target: &Path) {
        let file_name = match source.file_name() {
            Some(name) => name,
            None => return,
        };

        if self.blacklist.is_blacklisted(Path::new(file_name)) {
            return;
        }

        let current_file = file_name.to_string_lossy().to_string();
        self.copy_one(source, target.join(file_name), current_file);
    }

    fn copy_directory_source(&mut self, source: &Path, target: &Path) {
        let effective_target = match (self.request.include_source_dir, source.file_name()) {
            (true, Some(name)) => target.join(name),
            _ => target.to_path_buf(),
        };

        if let Err(e) = fs::create_dir_all(&effective_target) {
            self.report_error(
                e.to_string(),
                Some(effective_target.to_string_lossy().to_string()),
            );
            return;
        }

        for entry in walk(source, self.request, &self.blacklist) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let err = EngineError::WalkFailed {
                        message: e.to_string(),
                    };
                    self.report_error(err.to_string(), None);
                    continue;
                }
            };

            let path = entry.path();
            let relative = match path.strip_prefix(source) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let dest = effective_target.join(relative);

            if path.is_dir() {
                if let Err(e) = fs::create_dir_all(&dest) {
                    self.report_error(e.to_string(), Some(path.to_string_lossy().to_string()));
                }
            } else if path.is_file() {
                let current_file = relative.to_string_lossy().to_string();
                self.copy_one(path, dest, current_file);
            }
        }
    }

    fn copy_one(&mut self, source: &Path, dest: PathBuf, current_file: String) {
        let dest = match fs_ops::resolve_destination(&dest, self.request.collision_mode) {
            Some(dest) => dest,
            None => {
                tracing::debug!(file = %current_file, "destination exists, skipping");
                self.skipped_count += 1;
                return;
            }
        };

        match fs_ops::copy_file_with_metadata(source, &dest) {
            Ok(_) => {
                self.copied_count += 1;
                self.sink.on_progress(&BackupProgress {
                    current_file,
                    copied_count: self.copied_count,
                    skipped_count: self.skipped_count,
                    total_count: self.total_count,
                });
            }
            Err(e) => {
                self.report_error(e.to_string(), Some(source.to_string_lossy().to_string()));
            }
        }
    }

    fn report_error(&mut self, message: String, file: Option<String>) {
        tracing::warn!(file = ?file, %message, "backup error");
        self.error_count += 1;
        self.sink.on_error(&BackupError { message, file });
    }

    fn finish(self) -> BackupComplete {
        let message = if self.error_count == 0 {
            if self.skipped_count > 0 {
                format!(
                    "Copied {} files, skipped {}",
                    self.copied_count, self.skipped_count
                )
            } else {
                format!("Successfully copied {} files", self.copied_count)
            }
        } else {
            format!(
                "Copied {} files with {} errors",
                self.copied_count, self.error_count
            )
        };

        tracing::info!(
            copied = self.copied_count,
            skipped = self.skipped_count,
            errors = self.error_count,
            "backup finished"
        );

        BackupComplete {
            success: self.error_count == 0,
            copied_count: self.copied_count,
            skipped_count: self.skipped_count,
            message,
        }
    }
}
