// Data Saver - Preference Snapshots
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Wire-facing shapes returned by `get` calls.

use serde::{Deserialize, Serialize};

use super::ControlLevel;

/// A preference value as it crosses the API boundary.
///
/// Booleans travel as JSON booleans; daily statistics travel as sequences
/// of 60 decimal-string tokens, never as raw numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    DayLengths(Vec<String>),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            PrefValue::DayLengths(_) => None,
        }
    }

    pub fn as_day_lengths(&self) -> Option<&[String]> {
        match self {
            PrefValue::Bool(_) => None,
            PrefValue::DayLengths(tokens) => Some(tokens),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

/// Result of a `get` call: the value plus, for public preferences, the
/// control level. Private preferences carry no `levelOfControl` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefSnapshot {
    pub value: PrefValue,
    #[serde(
        rename = "levelOfControl",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub level_of_control: Option<ControlLevel>,
}

impl PrefSnapshot {
    /// Snapshot of an extension-attributable preference.
    pub fn public(value: PrefValue, level: ControlLevel) -> Self {
        Self {
            value,
            level_of_control: Some(level),
        }
    }

    /// Snapshot of a private preference (no control level on the wire).
    pub fn private(value: PrefValue) -> Self {
        Self {
            value,
            level_of_control: None,
        }
    }
}
