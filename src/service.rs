// Data Saver - Service
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! The preference service façade.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{PrefError, Result};
use crate::models::{ControlLevel, PrefSnapshot};
use crate::observe::{ListenerFn, ObservationHub};
use crate::prefs::PreferenceStore;
use crate::stats::DailyBuffer;
use crate::storage::{PersistedPrefs, PrefsStorage};

/// Caller-visible preference names.
pub mod names {
    /// On/off switch for the proxy-usage-reduction feature.
    pub const SPDY_PROXY_ENABLED: &str = "spdyProxyEnabled";
    /// Daily content-length statistics window.
    pub const DAILY_CONTENT_LENGTH: &str = "dailyContentLength";
    /// Daily received-length statistics window.
    pub const DAILY_RECEIVED_LENGTH: &str = "dailyReceivedLength";
    /// Private one-shot trigger that refreshes both daily windows.
    pub const UPDATE_DAILY_LENGTHS: &str = "updateDailyLengths";
}

/// One-shot refresh trigger: `Idle -> Refreshing -> Idle`.
///
/// Asserting it while a refresh is in flight is a successful no-op, never a
/// queued retry, and its externally visible value is always false.
#[derive(Debug, Default)]
struct UpdateTrigger {
    refreshing: AtomicBool,
}

impl UpdateTrigger {
    /// Enter the refreshing state.
    ///
    /// Returns false when a refresh is already in flight.
    fn begin(&self) -> bool {
        !self.refreshing.swap(true, Ordering::SeqCst)
    }

    fn finish(&self) {
        self.refreshing.store(false, Ordering::SeqCst);
    }
}

/// Façade over the preference store, the two daily statistics windows, the
/// refresh trigger and the observation hub.
///
/// Owns no preference state of its own; it routes caller-visible names to
/// the owning component and translates component errors. Constructed once
/// per process and passed by reference to callers, never reached through a
/// global.
pub struct DataSaverService {
    store: PreferenceStore,
    content_length: DailyBuffer,
    received_length: DailyBuffer,
    trigger: UpdateTrigger,
    hub: Arc<ObservationHub>,
    storage: PrefsStorage,
}

impl Default for DataSaverService {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSaverService {
    /// Create a service persisting to the default config location.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        Self::with_storage(PrefsStorage::new())
    }

    /// Create a service backed by explicit storage.
    pub fn with_storage(storage: PrefsStorage) -> Self {
        let persisted = storage.load().unwrap_or_default();
        let hub = Arc::new(ObservationHub::new());

        let store = PreferenceStore::new(Arc::clone(&hub));
        store.register(
            names::SPDY_PROXY_ENABLED,
            persisted.spdy_proxy_enabled,
            ControlLevel::ControllableByThisExtension,
            false,
        );
        store.register(
            names::UPDATE_DAILY_LENGTHS,
            false,
            ControlLevel::ControllableByThisExtension,
            true,
        );

        let content_length = DailyBuffer::from_slots(
            names::DAILY_CONTENT_LENGTH,
            &persisted.daily_content_length,
            ControlLevel::ControllableByThisExtension,
            Arc::clone(&hub),
        );
        let received_length = DailyBuffer::from_slots(
            names::DAILY_RECEIVED_LENGTH,
            &persisted.daily_received_length,
            ControlLevel::ControllableByThisExtension,
            Arc::clone(&hub),
        );

        info!(
            "data saver service initialized (enabled: {})",
            persisted.spdy_proxy_enabled
        );

        Self {
            store,
            content_length,
            received_length,
            trigger: UpdateTrigger::default(),
            hub,
            storage,
        }
    }

    /// Read a preference's current value and, for public preferences, its
    /// control level.
    pub fn get(&self, name: &str) -> Result<PrefSnapshot> {
        match name {
            names::DAILY_CONTENT_LENGTH => Ok(self.content_length.snapshot()),
            names::DAILY_RECEIVED_LENGTH => Ok(self.received_length.snapshot()),
            _ => self.store.get(name),
        }
    }

    /// Write a preference, gated on its control level.
    ///
    /// Notification delivery is asynchronous relative to this call
    /// returning; by the time a listener runs, `get` already reflects the
    /// new value.
    pub fn set(&self, name: &str, value: bool) -> Result<()> {
        match name {
            names::UPDATE_DAILY_LENGTHS => self.set_update_trigger(value),
            // The windows are written by the measurement collaborator and
            // the refresh path, never by extension callers.
            names::DAILY_CONTENT_LENGTH | names::DAILY_RECEIVED_LENGTH => {
                Err(PrefError::NotControllable(name.to_string()))
            }
            _ => {
                self.store.set(name, value)?;
                self.persist();
                Ok(())
            }
        }
    }

    /// Register a change listener for an observable entity.
    ///
    /// Listeners are invoked payload-free on the dispatch task and re-read
    /// the entity themselves.
    pub fn add_listener(&self, name: &str, id: &str, callback: ListenerFn) -> Result<()> {
        if !self.is_registered(name) {
            return Err(PrefError::UnknownPreference(name.to_string()));
        }
        self.hub.add_listener(name, id, callback)
    }

    /// Record a new day's measurement (the network-measurement collaborator
    /// path). The timing of day rollover belongs to the caller.
    pub fn record_day(&self, name: &str, amount: u64) -> Result<()> {
        self.daily_buffer(name)?.record_day(amount);
        self.persist();
        Ok(())
    }

    /// Update a preference's authority tag (the external authority
    /// collaborator path).
    pub fn set_control_level(&self, name: &str, level: ControlLevel) -> Result<()> {
        match name {
            names::DAILY_CONTENT_LENGTH => {
                self.content_length.set_control_level(level);
                Ok(())
            }
            names::DAILY_RECEIVED_LENGTH => {
                self.received_length.set_control_level(level);
                Ok(())
            }
            _ => self.store.set_control_level(name, level),
        }
    }

    fn set_update_trigger(&self, value: bool) -> Result<()> {
        // The stored trigger value is already false; writing false changes
        // nothing.
        if !value {
            return Ok(());
        }

        if !self.trigger.begin() {
            debug!("refresh already in flight, trigger ignored");
            return Ok(());
        }

        self.content_length.reset();
        self.received_length.reset();
        self.persist();
        self.trigger.finish();

        info!("daily statistics windows refreshed");
        Ok(())
    }

    fn is_registered(&self, name: &str) -> bool {
        matches!(
            name,
            names::DAILY_CONTENT_LENGTH | names::DAILY_RECEIVED_LENGTH
        ) || self.store.contains(name)
    }

    fn daily_buffer(&self, name: &str) -> Result<&DailyBuffer> {
        match name {
            names::DAILY_CONTENT_LENGTH => Ok(&self.content_length),
            names::DAILY_RECEIVED_LENGTH => Ok(&self.received_length),
            _ => Err(PrefError::UnknownPreference(name.to_string())),
        }
    }

    fn persist(&self) {
        let enabled = self.store.value(names::SPDY_PROXY_ENABLED).unwrap_or(false);
        self.storage.save(PersistedPrefs {
            spdy_proxy_enabled: enabled,
            daily_content_length: self.content_length.raw(),
            daily_received_length: self.received_length.raw(),
            ..Default::default()
        });
    }
}
