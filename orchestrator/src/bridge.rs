//! Delivery of engine notifications to the orchestrator.
//!
//! The engine runs on its own thread and publishes into an `EventHub`. A
//! front-end mounts an `EventBridge`, which holds a `Subscription` for as
//! long as the bridge lives; dropping the bridge unsubscribes, whichever way
//! the owner goes away. On its own thread the front-end then pumps pending
//! events into the `Orchestrator`, which applies them through the reducer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use engine::{
    BackupComplete, BackupError, BackupProgress, EventSink, COMPLETE_CHANNEL, ERROR_CHANNEL,
    PROGRESS_CHANNEL,
};
use uuid::Uuid;

use crate::gateway::BackupEngine;
use crate::orchestrator::Orchestrator;
use crate::state::Action;

/// One notification from any of the three channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(BackupProgress),
    Complete(BackupComplete),
    Error(BackupError),
}

impl EngineEvent {
    /// Name of the channel the event arrived on.
    pub fn channel(&self) -> &'static str {
        match self {
            EngineEvent::Progress(_) => PROGRESS_CHANNEL,
            EngineEvent::Complete(_) => COMPLETE_CHANNEL,
            EngineEvent::Error(_) => ERROR_CHANNEL,
        }
    }
}

impl From<EngineEvent> for Action {
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::Progress(p) => Action::Progress(p),
            EngineEvent::Complete(c) => Action::Complete(c),
            EngineEvent::Error(e) => Action::EngineError(e),
        }
    }
}

type Registry = Mutex<HashMap<Uuid, Sender<EngineEvent>>>;

/// Fan-out point between the engine and its subscribers.
///
/// Cloning is cheap; all clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct EventHub {
    subscribers: Arc<Registry>,
}

impl EventHub {
    pub fn new() -> Self {
        EventHub::default()
    }

    /// Register a new receiver. It stays registered until dropped.
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let id = Uuid::new_v4();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.insert(id, sender);
        }
        tracing::debug!(subscription = %id, "subscribed to engine events");
        Subscription {
            id,
            receiver,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    /// Deliver an event to every live subscriber.
    pub fn publish(&self, event: EngineEvent) {
        let subscribers = match self.subscribers.lock() {
            Ok(subscribers) => subscribers,
            Err(_) => {
                tracing::error!(channel = event.channel(), "event hub poisoned, dropping event");
                return;
            }
        };

        if subscribers.is_empty() {
            tracing::debug!(channel = event.channel(), "no subscribers, event dropped");
        }
        for sender in subscribers.values() {
            let _ = sender.send(event.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl EventSink for EventHub {
    fn on_progress(&self, progress: &BackupProgress) {
        self.publish(EngineEvent::Progress(progress.clone()));
    }

    fn on_error(&self, error: &BackupError) {
        self.publish(EngineEvent::Error(error.clone()));
    }

    fn on_complete(&self, complete: &BackupComplete) {
        self.publish(EngineEvent::Complete(complete.clone()));
    }
}

/// A live registration with an `EventHub`. Unregisters on drop.
pub struct Subscription {
    id: Uuid,
    receiver: Receiver<EngineEvent>,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Events already delivered, without blocking.
    pub fn drain(&self) -> Vec<EngineEvent> {
        self.receiver.try_iter().collect()
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut subscribers) = registry.lock() {
                subscribers.remove(&self.id);
            }
        }
        tracing::debug!(subscription = %self.id, "unsubscribed from engine events");
    }
}

/// Folds engine notifications into an orchestrator for the bridge's lifetime.
pub struct EventBridge {
    subscription: Subscription,
}

impl EventBridge {
    /// Subscribe to all three channels.
    pub fn mount(hub: &EventHub) -> Self {
        EventBridge {
            subscription: hub.subscribe(),
        }
    }

    /// Apply every pending event. Returns how many were applied.
    pub fn pump<E: BackupEngine>(&self, orchestrator: &mut Orchestrator<E>) -> usize {
        let events = self.subscription.drain();
        let count = events.len();
        for event in events {
            orchestrator.handle_event(event);
        }
        count
    }

    /// Block up to `timeout` for one event and apply it.
    pub fn wait<E: BackupEngine>(
        &self,
        orchestrator: &mut Orchestrator<E>,
        timeout: Duration,
    ) -> bool {
        match self.subscription.recv_timeout(timeout) {
            Some(event) => {
                orchestrator.handle_event(event);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(n: u64) -> BackupProgress {
        BackupProgress {
            current_file: format!("f{}", n),
            copied_count: n,
            skipped_count: 0,
            total_count: 10,
        }
    }

    #[test]
    fn test_publish_reaches_every_subscriber_in_order() {
        let hub = EventHub::new();
        let a = hub.subscribe();
        let b = hub.subscribe();

        hub.on_progress(&progress(1));
        hub.on_progress(&progress(2));

        for sub in [&a, &b] {
            let events = sub.drain();
            assert_eq!(
                events,
                vec![
                    EngineEvent::Progress(progress(1)),
                    EngineEvent::Progress(progress(2))
                ]
            );
        }
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = EventHub::new();
        let sub = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);
        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
        // publishing with nobody listening is fine
        hub.on_error(&BackupError {
            message: "x".to_string(),
            file: None,
        });
    }

    #[test]
    fn test_unsubscribes_during_unwind() {
        let hub = EventHub::new();
        let hub_in_thread = hub.clone();
        let result = std::thread::spawn(move || {
            let _bridge = EventBridge::mount(&hub_in_thread);
            assert_eq!(hub_in_thread.subscriber_count(), 1);
            panic!("component torn down abnormally");
        })
        .join();

        assert!(result.is_err());
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_hub() {
        let hub = EventHub::new();
        let sub = hub.subscribe();
        drop(hub);
        assert!(sub.drain().is_empty());
        assert!(sub.recv_timeout(Duration::from_millis(1)).is_none());
    }

    #[test]
    fn test_channel_names() {
        let complete = EngineEvent::Complete(BackupComplete {
            success: true,
            copied_count: 0,
            skipped_count: 0,
            message: String::new(),
        });
        assert_eq!(complete.channel(), "backup-complete");
        assert_eq!(EngineEvent::Progress(progress(0)).channel(), "backup-progress");
    }
}
