// Data Saver - Errors
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Error taxonomy for the preference service.

use thiserror::Error;

/// Errors surfaced by the preference service.
///
/// None of these are fatal; every failure is recoverable at the call site
/// and nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefError {
    /// The caller referenced a name the service never registered.
    #[error("unknown preference: {0}")]
    UnknownPreference(String),
    /// The preference's control level forbids the caller from writing it.
    #[error("preference '{0}' is not controllable by this caller")]
    NotControllable(String),
    /// A listener with this id is already registered for the entity.
    #[error("listener '{id}' is already registered for '{name}'")]
    DuplicateListener { name: String, id: String },
}

pub type Result<T> = std::result::Result<T, PrefError>;
