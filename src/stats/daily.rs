// Data Saver - Daily Statistics
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Rolling windows of per-day traffic counters.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::models::{ControlLevel, PrefSnapshot, PrefValue};
use crate::observe::ObservationHub;

/// Number of daily slots kept in each statistics window.
pub const DAILY_WINDOW_DAYS: usize = 60;

/// Fixed-capacity rolling window of per-day byte counters.
///
/// Slot 0 is the most recent reporting day. The window never shrinks or
/// grows: recording a new day evicts the oldest slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyLengths {
    slots: VecDeque<u64>,
}

impl Default for DailyLengths {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyLengths {
    /// Create a window of zeroed slots.
    pub fn new() -> Self {
        Self {
            slots: VecDeque::from(vec![0; DAILY_WINDOW_DAYS]),
        }
    }

    /// Rebuild a window from persisted counters.
    ///
    /// Shorter input is padded with zeros and longer input is truncated, so
    /// the window length holds regardless of what was on disk.
    pub fn from_slots(values: &[u64]) -> Self {
        let mut slots: VecDeque<u64> = values.iter().copied().take(DAILY_WINDOW_DAYS).collect();
        slots.resize(DAILY_WINDOW_DAYS, 0);
        Self { slots }
    }

    /// Record a new day's measurement, evicting the oldest slot.
    pub fn record_day(&mut self, amount: u64) {
        self.slots.pop_back();
        self.slots.push_front(amount);
    }

    /// Zero every slot.
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = 0;
        }
    }

    /// Raw counters, most recent day first.
    pub fn raw(&self) -> Vec<u64> {
        self.slots.iter().copied().collect()
    }

    /// Boundary encoding: decimal-string tokens, most recent day first.
    pub fn tokens(&self) -> Vec<String> {
        self.slots.iter().map(u64::to_string).collect()
    }
}

/// A shared daily statistics window with its authority tag.
///
/// Written by the network-measurement collaborator and the refresh path,
/// read by API callers. Reads never observe a partially applied mutation;
/// change notifications are queued before the mutation lock is released.
pub struct DailyBuffer {
    entity: String,
    window: RwLock<DailyLengths>,
    control_level: RwLock<ControlLevel>,
    hub: Arc<ObservationHub>,
}

impl DailyBuffer {
    /// Create a buffer from persisted counters.
    pub fn from_slots(
        entity: &str,
        values: &[u64],
        control_level: ControlLevel,
        hub: Arc<ObservationHub>,
    ) -> Self {
        Self {
            entity: entity.to_string(),
            window: RwLock::new(DailyLengths::from_slots(values)),
            control_level: RwLock::new(control_level),
            hub,
        }
    }

    /// Read-only snapshot in the boundary encoding.
    pub fn snapshot(&self) -> PrefSnapshot {
        let tokens = self.read_window().tokens();
        PrefSnapshot::public(PrefValue::DayLengths(tokens), self.control_level())
    }

    /// Record a new day's measurement and notify observers.
    pub fn record_day(&self, amount: u64) {
        let mut window = self.write_window();
        window.record_day(amount);
        self.hub.notify(&self.entity);
        debug!("'{}' recorded daily measurement: {} bytes", self.entity, amount);
    }

    /// Zero every slot (a refresh) and notify observers.
    pub fn reset(&self) {
        let mut window = self.write_window();
        window.reset();
        self.hub.notify(&self.entity);
    }

    /// Raw counters for persistence, most recent day first.
    pub fn raw(&self) -> Vec<u64> {
        self.read_window().raw()
    }

    pub fn control_level(&self) -> ControlLevel {
        *self
            .control_level
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Update the authority tag (the external authority collaborator path).
    ///
    /// The control level is part of the `get` result, so this counts as a
    /// state-visible mutation and notifies.
    pub fn set_control_level(&self, level: ControlLevel) {
        let mut control = self
            .control_level
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *control = level;
        self.hub.notify(&self.entity);
    }

    // No code panics while holding these locks; recover rather than propagate.
    fn read_window(&self) -> RwLockReadGuard<'_, DailyLengths> {
        self.window.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_window(&self) -> RwLockWriteGuard<'_, DailyLengths> {
        self.window.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_window_is_sixty_zeros() {
        let window = DailyLengths::new();
        let tokens = window.tokens();
        assert_eq!(tokens.len(), DAILY_WINDOW_DAYS);
        assert!(tokens.iter().all(|t| t == "0"));
    }

    #[test]
    fn test_record_day_shifts_and_evicts() {
        let mut window = DailyLengths::new();
        window.record_day(1500);
        window.record_day(42);

        let raw = window.raw();
        assert_eq!(raw.len(), DAILY_WINDOW_DAYS);
        assert_eq!(raw[0], 42);
        assert_eq!(raw[1], 1500);
        assert!(raw[2..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_oldest_slot_falls_off() {
        let mut window = DailyLengths::new();
        for day in 1..=(DAILY_WINDOW_DAYS as u64 + 5) {
            window.record_day(day);
        }

        let raw = window.raw();
        assert_eq!(raw.len(), DAILY_WINDOW_DAYS);
        // Days 1 through 5 have been evicted.
        assert_eq!(raw[0], DAILY_WINDOW_DAYS as u64 + 5);
        assert_eq!(raw[DAILY_WINDOW_DAYS - 1], 6);
    }

    #[test]
    fn test_reset_zeroes_without_resizing() {
        let mut window = DailyLengths::new();
        window.record_day(999);
        window.reset();

        let tokens = window.tokens();
        assert_eq!(tokens.len(), DAILY_WINDOW_DAYS);
        assert!(tokens.iter().all(|t| t == "0"));
    }

    #[test]
    fn test_from_slots_pads_and_truncates() {
        let short = DailyLengths::from_slots(&[7, 8]);
        assert_eq!(short.raw().len(), DAILY_WINDOW_DAYS);
        assert_eq!(short.raw()[0], 7);
        assert_eq!(short.raw()[2], 0);

        let long: Vec<u64> = (0..100).collect();
        let truncated = DailyLengths::from_slots(&long);
        assert_eq!(truncated.raw().len(), DAILY_WINDOW_DAYS);
        assert_eq!(truncated.raw()[DAILY_WINDOW_DAYS - 1], 59);
    }

    #[tokio::test]
    async fn test_buffer_snapshot_shape() {
        let hub = Arc::new(ObservationHub::new());
        let buffer = DailyBuffer::from_slots(
            "dailyContentLength",
            &[],
            ControlLevel::ControllableByThisExtension,
            hub,
        );
        buffer.record_day(2048);

        let snap = buffer.snapshot();
        let tokens = snap.value.as_day_lengths().unwrap();
        assert_eq!(tokens.len(), DAILY_WINDOW_DAYS);
        assert_eq!(tokens[0], "2048");
        assert_eq!(
            snap.level_of_control,
            Some(ControlLevel::ControllableByThisExtension)
        );
    }

    #[tokio::test]
    async fn test_buffer_mutations_notify() {
        let hub = Arc::new(ObservationHub::new());
        let buffer = DailyBuffer::from_slots(
            "dailyReceivedLength",
            &[],
            ControlLevel::ControllableByThisExtension,
            Arc::clone(&hub),
        );

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<()>();
        hub.add_listener(
            "dailyReceivedLength",
            "probe",
            Arc::new(move || {
                let _ = tx.send(());
            }),
        )
        .unwrap();

        buffer.record_day(100);
        assert_eq!(rx.recv().await, Some(()));

        buffer.reset();
        assert_eq!(rx.recv().await, Some(()));

        buffer.set_control_level(ControlLevel::ControlledByOtherExtensions);
        assert_eq!(rx.recv().await, Some(()));
    }
}
