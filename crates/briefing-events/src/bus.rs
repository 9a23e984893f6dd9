//! EventBus - per-run subscriber registry.
//!
//! - `RwLock<HashMap<RunId, Vec<_>>>` holds the callbacks for each run.
//! - `emit` clones the run's callback list under the read lock and invokes
//!   the copies after releasing it, so a callback may register or
//!   unregister (itself included) while being delivered to.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use briefing_models::{BriefingEvent, RunId, SubscriptionId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Callback invoked for every event of the run it is registered on.
pub type EventCallback = Arc<dyn Fn(&BriefingEvent) + Send + Sync>;

type Registry = HashMap<RunId, Vec<(SubscriptionId, EventCallback)>>;

/// In-memory registry of progress observers, keyed by run.
///
/// Owned by the service that orchestrates runs; dropping the bus drops
/// every registration.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Registry>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    // A callback that panicked was caught before it could poison anything
    // meaningful, and the registry holds no invariants across entries.
    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a callback for one run.
    ///
    /// Returns the id to pass to [`EventBus::unregister`].
    pub fn register<F>(&self, run_id: &RunId, callback: F) -> SubscriptionId
    where
        F: Fn(&BriefingEvent) + Send + Sync + 'static,
    {
        self.register_arc(run_id, Arc::new(callback))
    }

    /// Registers an already shared callback.
    pub fn register_arc(&self, run_id: &RunId, callback: EventCallback) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.write()
            .entry(run_id.clone())
            .or_default()
            .push((id.clone(), callback));
        debug!(run_id = %run_id, subscription = %id, "subscriber registered");
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unregister(&self, run_id: &RunId, subscription: &SubscriptionId) -> bool {
        let mut registry = self.write();
        let Some(callbacks) = registry.get_mut(run_id) else {
            return false;
        };

        let before = callbacks.len();
        callbacks.retain(|(id, _)| id != subscription);
        let removed = callbacks.len() != before;

        if callbacks.is_empty() {
            registry.remove(run_id);
        }
        if removed {
            debug!(run_id = %run_id, subscription = %subscription, "subscriber removed");
        }
        removed
    }

    /// Delivers an event to every callback registered for the run.
    ///
    /// A panicking callback is logged and skipped; the remaining callbacks
    /// still receive the event.
    pub fn emit(&self, run_id: &RunId, event: &BriefingEvent) {
        let callbacks: Vec<EventCallback> = match self.read().get(run_id) {
            Some(entries) => entries.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            None => return,
        };

        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                warn!(run_id = %run_id, event = event.kind(), "subscriber panicked");
            }
        }
    }

    /// Subscribes through a channel instead of a callback.
    ///
    /// Suited to server-push transports that forward events from their own
    /// task. Sends to a dropped receiver are ignored.
    pub fn subscribe_channel(
        &self,
        run_id: &RunId,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<BriefingEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.register(run_id, move |event| {
            let _ = tx.send(event.clone());
        });
        (id, rx)
    }

    /// Number of callbacks registered for a run.
    pub fn subscriber_count(&self, run_id: &RunId) -> usize {
        self.read().get(run_id).map(Vec::len).unwrap_or(0)
    }

    /// Drops every callback registered for a run.
    pub fn clear_run(&self, run_id: &RunId) {
        if self.write().remove(run_id).is_some() {
            debug!(run_id = %run_id, "subscribers cleared");
        }
    }
}
