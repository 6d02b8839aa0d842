// Data Saver - Preference Store
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Scalar controllable preferences and their authority tags.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::{PrefError, Result};
use crate::models::{ControlLevel, PrefSnapshot, PrefValue};
use crate::observe::ObservationHub;

#[derive(Debug, Clone)]
struct StoredPref {
    value: bool,
    control_level: ControlLevel,
    /// Private preferences omit the control level from `get` results.
    private: bool,
}

/// Store for scalar controllable preferences.
///
/// Preferences are registered once at service initialization with a default
/// value and live for the lifetime of the service. Mutations are atomic
/// relative to concurrent reads, and the change notification is queued
/// before the mutation lock is released so delivery order matches the order
/// in which mutations become visible.
pub struct PreferenceStore {
    prefs: RwLock<HashMap<String, StoredPref>>,
    hub: Arc<ObservationHub>,
}

impl PreferenceStore {
    pub fn new(hub: Arc<ObservationHub>) -> Self {
        Self {
            prefs: RwLock::new(HashMap::new()),
            hub,
        }
    }

    /// Register a preference with its default value and authority tag.
    ///
    /// Registration is initialization, not mutation: no notification fires.
    pub fn register(&self, name: &str, default: bool, control_level: ControlLevel, private: bool) {
        let mut prefs = self.prefs.write().unwrap_or_else(|e| e.into_inner());
        prefs.insert(
            name.to_string(),
            StoredPref {
                value: default,
                control_level,
                private,
            },
        );
    }

    /// Read a preference's current value and control level.
    pub fn get(&self, name: &str) -> Result<PrefSnapshot> {
        let prefs = self.prefs.read().unwrap_or_else(|e| e.into_inner());
        let pref = prefs
            .get(name)
            .ok_or_else(|| PrefError::UnknownPreference(name.to_string()))?;

        if pref.private {
            Ok(PrefSnapshot::private(PrefValue::Bool(pref.value)))
        } else {
            Ok(PrefSnapshot::public(
                PrefValue::Bool(pref.value),
                pref.control_level,
            ))
        }
    }

    /// Replace a preference's value, gated on its control level.
    ///
    /// On failure the stored value is untouched and nothing is notified.
    pub fn set(&self, name: &str, value: bool) -> Result<()> {
        let mut prefs = self.prefs.write().unwrap_or_else(|e| e.into_inner());
        let pref = prefs
            .get_mut(name)
            .ok_or_else(|| PrefError::UnknownPreference(name.to_string()))?;

        if !pref.control_level.allows_this_extension() {
            return Err(PrefError::NotControllable(name.to_string()));
        }

        pref.value = value;
        self.hub.notify(name);
        info!("preference '{}' set to {}", name, value);
        Ok(())
    }

    /// Current raw value, bypassing the snapshot shape.
    pub fn value(&self, name: &str) -> Result<bool> {
        let prefs = self.prefs.read().unwrap_or_else(|e| e.into_inner());
        prefs
            .get(name)
            .map(|p| p.value)
            .ok_or_else(|| PrefError::UnknownPreference(name.to_string()))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        let prefs = self.prefs.read().unwrap_or_else(|e| e.into_inner());
        prefs.contains_key(name)
    }

    /// Update the authority tag (the external authority collaborator path).
    ///
    /// The control level is part of the `get` result, so this counts as a
    /// state-visible mutation and notifies.
    pub fn set_control_level(&self, name: &str, level: ControlLevel) -> Result<()> {
        let mut prefs = self.prefs.write().unwrap_or_else(|e| e.into_inner());
        let pref = prefs
            .get_mut(name)
            .ok_or_else(|| PrefError::UnknownPreference(name.to_string()))?;

        pref.control_level = level;
        self.hub.notify(name);
        Ok(())
    }
}
