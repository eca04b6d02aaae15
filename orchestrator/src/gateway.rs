//! The one-shot hand-off of a session snapshot to the engine.
//!
//! Submission only reports whether the engine *accepted* the request. The
//! backup itself reports back later, through the event hub.

use std::thread;

use engine::BackupRequest;

use crate::bridge::EventHub;
use crate::error::Rejection;
use crate::session::SessionConfig;

/// The outbound `backup_directory` call.
pub trait BackupEngine {
    /// Hand a request to the engine. Returns once it is accepted or refused;
    /// never waits for the backup to finish.
    fn backup_directory(&self, request: BackupRequest) -> Result<(), Rejection>;
}

impl<E: BackupEngine + ?Sized> BackupEngine for &E {
    fn backup_directory(&self, request: BackupRequest) -> Result<(), Rejection> {
        (**self).backup_directory(request)
    }
}

/// Submit a snapshot through `engine`.
pub fn submit<E: BackupEngine + ?Sized>(
    engine: &E,
    config: &SessionConfig,
) -> Result<(), Rejection> {
    tracing::info!(
        session = %config.id(),
        sources = config.source_paths().len(),
        target = %config.target_path(),
        collision = config.collision_mode().as_str(),
        "submitting backup"
    );

    match engine.backup_directory(config.to_request()) {
        Ok(()) => {
            tracing::debug!(session = %config.id(), "backup accepted");
            Ok(())
        }
        Err(rejection) => {
            tracing::warn!(session = %config.id(), reason = %rejection, "backup rejected");
            Err(rejection)
        }
    }
}

/// Runs the bundled engine on a background thread, publishing to a hub.
///
/// The request is prepared (validated, target created) synchronously so a
/// refusal is returned to the caller; copying happens on the worker thread.
#[derive(Clone)]
pub struct LocalEngine {
    hub: EventHub,
}

impl LocalEngine {
    pub fn new(hub: EventHub) -> Self {
        LocalEngine { hub }
    }
}

impl BackupEngine for LocalEngine {
    fn backup_directory(&self, request: BackupRequest) -> Result<(), Rejection> {
        engine::prepare_request(&request)?;

        let hub = self.hub.clone();
        thread::Builder::new()
            .name("backup-engine".to_string())
            .spawn(move || {
                engine::run_backup(&request, &hub);
            })
            .map_err(|e| Rejection::new(format!("Failed to start backup worker: {}", e)))?;

        Ok(())
    }
}
