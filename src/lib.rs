// Data Saver - Library Root
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Preference observation and daily traffic statistics for the data saver
//! proxy.
//!
//! The service exposes the proxy's on/off switch and two 60-day rolling
//! windows of daily traffic counters behind a get/set/observe contract.
//! Mutations are atomic relative to reads; change notifications are
//! delivered asynchronously on a dispatch task, payload-free, in
//! registration order per entity. Construct one [`DataSaverService`] per
//! process and pass it by reference to callers.

mod error;
mod models;
mod observe;
mod prefs;
mod service;
mod stats;
mod storage;

pub use error::{PrefError, Result};
pub use models::{ControlLevel, PrefSnapshot, PrefValue};
pub use observe::{ListenerFn, ObservationHub};
pub use prefs::PreferenceStore;
pub use service::{names, DataSaverService};
pub use stats::{DailyBuffer, DailyLengths, DAILY_WINDOW_DAYS};
pub use storage::{PersistedPrefs, PrefsStorage};
