//! Owner of the application state.
//!
//! `Orchestrator` runs on the UI thread. Every change goes through
//! `AppState::reduce`; this type adds the two side effects the reducer must
//! not perform itself: handing a new snapshot to the engine, and saving the
//! durable preferences whenever an action changed them.

use crate::bridge::EngineEvent;
use crate::gateway::{self, BackupEngine};
use crate::persist::PreferenceCache;
use crate::screen::Screen;
use crate::state::{Action, AppState};
use crate::store::Preferences;

pub struct Orchestrator<E: BackupEngine> {
    state: AppState,
    engine: E,
    cache: Option<PreferenceCache>,
}

impl<E: BackupEngine> Orchestrator<E> {
    /// Start with default preferences and no cache.
    pub fn new(engine: E) -> Self {
        Orchestrator {
            state: AppState::default(),
            engine,
            cache: None,
        }
    }

    /// Start with preferences restored from `cache`; later changes are saved there.
    pub fn with_cache(engine: E, cache: PreferenceCache) -> Self {
        let preferences = cache.load_or_default();
        Orchestrator {
            state: AppState::with_preferences(preferences),
            engine,
            cache: Some(cache),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn preferences(&self) -> &Preferences {
        &self.state.preferences
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Apply a user action.
    ///
    /// `Action::Submit` additionally hands the new snapshot to the engine; a
    /// refusal is folded back in as `Action::SubmissionRejected` before this
    /// returns, so callers never observe a running screen for a refused run.
    pub fn dispatch(&mut self, action: Action) {
        let submitting = matches!(action, Action::Submit);
        let before = self.state.screen;
        self.apply(action);

        if submitting && before == Screen::Form && self.state.screen == Screen::Progress {
            self.hand_off();
        }
    }

    /// Submit the current form. Returns false if the submit guard failed.
    pub fn submit(&mut self) -> bool {
        if !self.state.can_submit() {
            tracing::debug!("submit ignored, form incomplete");
            return false;
        }
        self.dispatch(Action::Submit);
        true
    }

    /// Apply an engine notification.
    pub fn handle_event(&mut self, event: EngineEvent) {
        let channel = event.channel();
        if !self.state.screen.accepts_engine_events() {
            tracing::debug!(channel, screen = %self.state.screen, "ignoring engine event");
            return;
        }
        tracing::trace!(channel, "engine event");
        self.apply(event.into());

        if self.state.screen == Screen::Complete {
            if let Some(outcome) = &self.state.session.outcome {
                tracing::info!(
                    success = outcome.success,
                    copied = outcome.copied_count,
                    skipped = outcome.skipped_count,
                    errors = self.state.session.errors.len(),
                    message = %outcome.message,
                    "session complete"
                );
            }
        }
    }

    fn hand_off(&mut self) {
        let config = match &self.state.session.config {
            Some(config) => config.clone(),
            None => return,
        };

        if let Err(rejection) = gateway::submit(&self.engine, &config) {
            self.apply(Action::SubmissionRejected(rejection.message));
        }
    }

    fn apply(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        let previous = state.preferences.clone();
        self.state = state.reduce(action);

        if self.state.preferences != previous {
            self.persist();
        }
    }

    fn persist(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(&self.state.preferences) {
                tracing::warn!(error = %e, "failed to save preferences");
            }
        }
    }
}
