//! The single state aggregate and its reducer.
//!
//! `AppState::reduce` is the only way state changes. It is pure: it takes the
//! current state and an `Action` and returns the next state, without touching
//! the engine, the disk or the clock beyond stamping timestamps. Side effects
//! (submitting to the engine, saving preferences) live in `Orchestrator`.

use engine::{BackupComplete, BackupError, BackupProgress, CollisionMode};

use crate::drop_zone::{self, DropZone};
use crate::screen::Screen;
use crate::session::{CompletionOutcome, ErrorEntry, ProgressState, Session, SessionConfig};
use crate::store::{self, Preferences};

/// Editable form fields of the session being prepared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub source_paths: Vec<String>,
    pub target_path: String,
}

/// Pointer position reported by a drag-and-drop source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPosition {
    pub y: f64,
    pub window_height: f64,
}

impl DragPosition {
    pub fn new(y: f64, window_height: f64) -> Self {
        DragPosition { y, window_height }
    }

    pub fn zone(&self) -> DropZone {
        drop_zone::classify(self.y, self.window_height)
    }
}

/// Everything the user can do and everything the engine can report.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddSourcePath(String),
    RemoveSourcePath(String),
    ClearSourcePaths,
    SetTargetPath(String),
    AddBlacklistItem(String),
    RemoveBlacklistItem(String),
    SetRespectGitignore(bool),
    SetIncludeSourceDir(bool),
    SetCollisionMode(CollisionMode),
    /// Pick a source from a dialog or history: add to the set and to history
    PickSources(Vec<String>),
    /// Pick a target from a dialog or history: set it and add to history
    PickTarget(String),
    DragEnter(DragPosition),
    DragOver(DragPosition),
    DragLeave,
    Drop {
        paths: Vec<String>,
        position: DragPosition,
    },
    /// Snapshot the form and start a session (no-op if the guard fails)
    Submit,
    /// The engine refused the submission of the running session
    SubmissionRejected(String),
    Progress(BackupProgress),
    Complete(BackupComplete),
    EngineError(BackupError),
    /// Back to an empty form; preferences are kept
    Reset,
}

/// The whole application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub screen: Screen,
    pub form: FormState,
    pub preferences: Preferences,
    pub session: Session,
    /// Zone under the pointer while a drag hovers the window
    pub hover_zone: Option<DropZone>,
}

impl AppState {
    /// Start on the form with previously saved preferences.
    pub fn with_preferences(preferences: Preferences) -> Self {
        AppState {
            preferences,
            ..AppState::default()
        }
    }

    /// Whether `Submit` would start a session right now.
    pub fn can_submit(&self) -> bool {
        self.screen == Screen::Form
            && crate::session::is_submittable(&self.form.source_paths, &self.form.target_path)
    }

    /// Apply one action.
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::AddSourcePath(path) if self.screen.accepts_form_edits() => {
                store::add_path(&mut self.form.source_paths, &path);
            }
            Action::RemoveSourcePath(path) if self.screen.accepts_form_edits() => {
                store::remove_path(&mut self.form.source_paths, &path);
            }
            Action::ClearSourcePaths if self.screen.accepts_form_edits() => {
                self.form.source_paths.clear();
            }
            Action::SetTargetPath(path) if self.screen.accepts_form_edits() => {
                self.form.target_path = path;
            }
            Action::PickSources(paths) if self.screen.accepts_form_edits() => {
                self.ingest_sources(&paths);
            }
            Action::PickTarget(path) if self.screen.accepts_form_edits() => {
                self.ingest_target(path);
            }
            Action::AddBlacklistItem(pattern) => {
                store::add_blacklist_item(&mut self.preferences.blacklist, &pattern);
            }
            Action::RemoveBlacklistItem(pattern) => {
                store::remove_blacklist_item(&mut self.preferences.blacklist, &pattern);
            }
            Action::SetRespectGitignore(value) => self.preferences.respect_gitignore = value,
            Action::SetIncludeSourceDir(value) => self.preferences.include_source_dir = value,
            Action::SetCollisionMode(mode) => self.preferences.collision_mode = mode,
            Action::DragEnter(position) | Action::DragOver(position)
                if self.screen.accepts_form_edits() =>
            {
                self.hover_zone = Some(position.zone());
            }
            Action::DragLeave => self.hover_zone = None,
            Action::Drop { paths, position } => {
                self.hover_zone = None;
                if self.screen.accepts_form_edits() {
                    match position.zone() {
                        DropZone::Source => self.ingest_sources(&paths),
                        DropZone::Target => {
                            if let Some(first) = paths.into_iter().next() {
                                self.ingest_target(first);
                            }
                        }
                    }
                }
            }
            Action::Submit => {
                if let Some(config) = self.capture() {
                    if self.enter(Screen::Progress) {
                        self.session = Session::start(config);
                    }
                }
            }
            Action::SubmissionRejected(message) => {
                if self.enter(Screen::Complete) {
                    self.session.outcome = Some(CompletionOutcome::rejected(message));
                }
            }
            Action::Progress(event) if self.screen.accepts_engine_events() => {
                self.session.progress = ProgressState::from_event(&event);
            }
            Action::Complete(event) if self.screen.accepts_engine_events() => {
                self.session.progress.finish(&event);
                self.session.outcome = Some(CompletionOutcome::from_event(&event));
                self.enter(Screen::Complete);
            }
            Action::EngineError(event) if self.screen.accepts_engine_events() => {
                self.session.errors.push(ErrorEntry::from(&event));
            }
            Action::Reset => {
                if self.enter(Screen::Form) {
                    self = self.reset();
                }
            }
            // Anything else is illegal on the current screen
            _ => {}
        }
        self
    }

    /// Move to `next` if the screen machine has that edge. Every screen
    /// change goes through here.
    fn enter(&mut self, next: Screen) -> bool {
        if !self.screen.can_transition_to(next) {
            return false;
        }
        self.screen = next;
        true
    }

    /// The snapshot `Submit` would take, if the guard passes.
    fn capture(&self) -> Option<SessionConfig> {
        if self.screen != Screen::Form {
            return None;
        }
        SessionConfig::capture(
            &self.form.source_paths,
            &self.form.target_path,
            &self.preferences,
        )
    }

    /// Zero every session-scoped field and carry the durable ones over.
    /// The screen was already moved to the form by `enter`.
    fn reset(self) -> Self {
        let AppState {
            screen,
            preferences,
            ..
        } = self;
        AppState {
            screen,
            form: FormState::default(),
            preferences: Preferences {
                source_history: preferences.source_history,
                target_history: preferences.target_history,
                blacklist: preferences.blacklist,
                respect_gitignore: preferences.respect_gitignore,
                include_source_dir: preferences.include_source_dir,
                collision_mode: preferences.collision_mode,
            },
            session: Session::default(),
            hover_zone: None,
        }
    }

    fn ingest_sources(&mut self, paths: &[String]) {
        for path in paths {
            store::add_path(&mut self.form.source_paths, path);
            store::add_to_history(&mut self.preferences.source_history, path);
        }
    }

    fn ingest_target(&mut self, path: String) {
        store::add_to_history(&mut self.preferences.target_history, &path);
        self.form.target_path = path;
    }
}
