// Data Saver - Observation Hub
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Change-listener registry and asynchronous notification dispatch.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{PrefError, Result};

/// Callback invoked when an observed entity changes.
///
/// Notifications carry no payload: listeners re-read the entity through the
/// service themselves.
pub type ListenerFn = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
struct ChangeListener {
    id: String,
    callback: ListenerFn,
}

type ListenerMap = HashMap<String, Vec<ChangeListener>>;

/// Registry of change listeners with an asynchronous dispatch queue.
///
/// Notifications are fanned out on a dedicated dispatch task so mutators
/// return promptly and listeners never block a mutation. The single
/// dispatch task drains a FIFO queue, which preserves per-entity delivery
/// order across mutations.
pub struct ObservationHub {
    listeners: Arc<RwLock<ListenerMap>>,
    queue: mpsc::UnboundedSender<String>,
}

impl Default for ObservationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationHub {
    /// Create a hub and spawn its dispatch task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        let listeners: Arc<RwLock<ListenerMap>> = Arc::new(RwLock::new(HashMap::new()));
        let (queue, mut rx) = mpsc::unbounded_channel::<String>();

        let registry = Arc::clone(&listeners);
        tokio::spawn(async move {
            while let Some(entity) = rx.recv().await {
                dispatch(&registry, &entity);
            }
        });

        Self { listeners, queue }
    }

    /// Register a listener for an entity.
    ///
    /// Listener identity is `(entity, id)`. Re-registering the same id for
    /// the same entity is rejected rather than silently merged, so
    /// accidental double-registration stays visible.
    pub fn add_listener(&self, entity: &str, id: &str, callback: ListenerFn) -> Result<()> {
        let mut map = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        let entries = map.entry(entity.to_string()).or_default();

        if entries.iter().any(|l| l.id == id) {
            return Err(PrefError::DuplicateListener {
                name: entity.to_string(),
                id: id.to_string(),
            });
        }

        entries.push(ChangeListener {
            id: id.to_string(),
            callback,
        });
        debug!("listener '{}' registered for '{}'", id, entity);
        Ok(())
    }

    /// Queue a change notification for `entity`.
    ///
    /// Returns immediately; delivery happens on the dispatch task after the
    /// mutation that triggered it is already visible to `get` callers.
    pub fn notify(&self, entity: &str) {
        if self.queue.send(entity.to_string()).is_err() {
            warn!("notification for '{}' dropped, dispatch task is gone", entity);
        }
    }
}

/// Deliver a change notification for `entity` to every registered listener.
///
/// The registry is snapshotted before iteration, so a listener added during
/// this round is not invoked until the next mutation. Listener failures are
/// isolated: a panicking listener is logged and the remaining listeners
/// still run.
fn dispatch(registry: &Arc<RwLock<ListenerMap>>, entity: &str) {
    let snapshot: Vec<ChangeListener> = {
        let map = registry.read().unwrap_or_else(|e| e.into_inner());
        map.get(entity).cloned().unwrap_or_default()
    };

    for listener in snapshot {
        if catch_unwind(AssertUnwindSafe(|| (listener.callback)())).is_err() {
            warn!(
                "listener '{}' for '{}' panicked during notification",
                listener.id, entity
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_listener_rejected() {
        let hub = ObservationHub::new();
        hub.add_listener("dailyContentLength", "ui", Arc::new(|| {}))
            .unwrap();

        let err = hub
            .add_listener("dailyContentLength", "ui", Arc::new(|| {}))
            .unwrap_err();
        assert_eq!(
            err,
            PrefError::DuplicateListener {
                name: "dailyContentLength".to_string(),
                id: "ui".to_string(),
            }
        );

        // Same id on a different entity is a different handle.
        hub.add_listener("dailyReceivedLength", "ui", Arc::new(|| {}))
            .unwrap();
    }

    #[tokio::test]
    async fn test_delivery_in_registration_order() {
        let hub = ObservationHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<&'static str>();

        let first = tx.clone();
        hub.add_listener("entity", "first", Arc::new(move || {
            let _ = first.send("first");
        }))
        .unwrap();

        let second = tx.clone();
        hub.add_listener("entity", "second", Arc::new(move || {
            let _ = second.send("second");
        }))
        .unwrap();

        hub.notify("entity");

        assert_eq!(rx.recv().await, Some("first"));
        assert_eq!(rx.recv().await, Some("second"));
    }

    #[tokio::test]
    async fn test_panicking_listener_does_not_abort_fan_out() {
        let hub = ObservationHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<&'static str>();

        hub.add_listener("entity", "broken", Arc::new(|| {
            panic!("listener failure");
        }))
        .unwrap();

        hub.add_listener("entity", "healthy", Arc::new(move || {
            let _ = tx.send("delivered");
        }))
        .unwrap();

        hub.notify("entity");

        assert_eq!(rx.recv().await, Some("delivered"));
    }

    #[tokio::test]
    async fn test_notification_scoped_to_entity() {
        let hub = ObservationHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<&'static str>();

        let observed = tx.clone();
        hub.add_listener("observed", "probe", Arc::new(move || {
            let _ = observed.send("observed");
        }))
        .unwrap();

        hub.add_listener("other", "probe", Arc::new(move || {
            let _ = tx.send("other");
        }))
        .unwrap();

        hub.notify("observed");

        assert_eq!(rx.recv().await, Some("observed"));
        // Only the observed entity's listener fired for this mutation.
        hub.notify("observed");
        assert_eq!(rx.recv().await, Some("observed"));
    }
}
