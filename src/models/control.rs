// Data Saver - Control Level
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Authority tags for controllable preferences.

use serde::{Deserialize, Serialize};

/// Which actor may currently mutate a preference.
///
/// Recomputed by the external authority collaborator and exposed read-only
/// alongside every public preference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLevel {
    NotControllable,
    ControllableByThisExtension,
    ControllableByOtherExtensions,
    ControlledByOtherExtensions,
}

impl ControlLevel {
    /// Wire string constant for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlLevel::NotControllable => "not_controllable",
            ControlLevel::ControllableByThisExtension => "controllable_by_this_extension",
            ControlLevel::ControllableByOtherExtensions => "controllable_by_other_extensions",
            ControlLevel::ControlledByOtherExtensions => "controlled_by_other_extensions",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_controllable" => Some(ControlLevel::NotControllable),
            "controllable_by_this_extension" => Some(ControlLevel::ControllableByThisExtension),
            "controllable_by_other_extensions" => Some(ControlLevel::ControllableByOtherExtensions),
            "controlled_by_other_extensions" => Some(ControlLevel::ControlledByOtherExtensions),
            _ => None,
        }
    }

    /// Whether a caller at this extension's privilege may write the value.
    pub fn allows_this_extension(&self) -> bool {
        matches!(self, ControlLevel::ControllableByThisExtension)
    }
}
