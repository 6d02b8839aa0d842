// Data Saver - Models
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Data models for preferences and their boundary shapes.

mod control;
mod snapshot;

pub use control::ControlLevel;
pub use snapshot::{PrefSnapshot, PrefValue};
