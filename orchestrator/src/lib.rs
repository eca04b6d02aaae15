//! # BackUP Orchestrator - Backup Session Controller
//!
//! The client-side core shared by the CLI and the GUI. It collects paths and
//! options, hands an immutable snapshot to the engine, and folds the engine's
//! asynchronous notifications back into one deterministic state.
//!
//! ## Overview
//!
//! - A single `AppState` aggregate changed only by the pure `reduce` function
//! - A three-screen state machine: form, progress, complete
//! - Durable preferences (histories, blacklist, options) cached on disk
//! - A drag-and-drop zone classifier
//! - A scoped event bridge that ignores stale or duplicate notifications
//!
//! ## Basic Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use orchestrator::{Action, EventBridge, EventHub, LocalEngine, Orchestrator, Screen};
//!
//! let hub = EventHub::new();
//! let bridge = EventBridge::mount(&hub);
//! let mut orchestrator = Orchestrator::new(LocalEngine::new(hub.clone()));
//!
//! orchestrator.dispatch(Action::PickSources(vec!["/home/me/project".to_string()]));
//! orchestrator.dispatch(Action::PickTarget("/mnt/backup".to_string()));
//! orchestrator.submit();
//!
//! while orchestrator.screen() == Screen::Progress {
//!     bridge.wait(&mut orchestrator, Duration::from_millis(100));
//! }
//! println!("{:?}", orchestrator.state().session.outcome);
//! ```
//!
//! ## Modules
//!
//! - **store**: Durable preferences and history policy
//! - **session**: Snapshot, progress, outcome, error log
//! - **screen**: Screen enum and legal transitions
//! - **drop_zone**: Pointer-to-zone classification
//! - **state**: The aggregate and its reducer
//! - **bridge**: Event hub, scoped subscription, event bridge
//! - **gateway**: Submission to the engine
//! - **orchestrator**: State owner applying side effects
//! - **persist**: Preference cache on disk
//! - **logging**: Tracing setup
//! - **error**: Error types

pub mod bridge;
pub mod drop_zone;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod orchestrator;
pub mod persist;
pub mod screen;
pub mod session;
pub mod state;
pub mod store;

pub use bridge::{EngineEvent, EventBridge, EventHub, Subscription};
pub use drop_zone::{classify, DropZone};
pub use error::{CacheError, Rejection};
pub use gateway::{BackupEngine, LocalEngine};
pub use orchestrator::Orchestrator;
pub use persist::PreferenceCache;
pub use screen::Screen;
pub use session::{CompletionOutcome, ErrorEntry, ErrorLog, ProgressState, Session, SessionConfig};
pub use state::{Action, AppState, DragPosition, FormState};
pub use store::{Preferences, MAX_HISTORY};
