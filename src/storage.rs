// Data Saver - Storage
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Persistent storage for preference and daily statistics state.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Service state as persisted between runs.
///
/// The daily windows are stored as raw counters; the boundary string
/// encoding is applied only at `get` time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersistedPrefs {
    /// When the state was last written.
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub spdy_proxy_enabled: bool,
    #[serde(default)]
    pub daily_content_length: Vec<u64>,
    #[serde(default)]
    pub daily_received_length: Vec<u64>,
}

/// Storage manager that persists service state to a JSON file.
#[derive(Debug)]
pub struct PrefsStorage {
    path: PathBuf,
}

impl Default for PrefsStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefsStorage {
    /// Create a storage manager at the default config location.
    pub fn new() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("data-saver")
            .join("prefs.json");

        Self { path }
    }

    /// Create a storage manager backed by an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load persisted state.
    ///
    /// Returns `None` when the file is absent or unparseable; the service
    /// falls back to defaults in that case.
    pub fn load(&self) -> Option<PersistedPrefs> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Failed to parse preference state: {}", e);
                None
            }
        }
    }

    /// Save state to disk, stamping `updated_at`.
    ///
    /// IO failures are logged and swallowed; persistence is best-effort and
    /// never fails a mutation.
    pub fn save(&self, mut state: PersistedPrefs) {
        use std::io::Write;
        #[cfg(unix)]
        use std::os::unix::fs::PermissionsExt;

        state.updated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        match serde_json::to_string_pretty(&state) {
            Ok(content) => match fs::File::create(&self.path) {
                Ok(mut file) => {
                    #[cfg(unix)]
                    {
                        if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
                            warn!("Failed to set file permissions: {}", e);
                        }
                    }
                    if let Err(e) = file.write_all(content.as_bytes()) {
                        warn!("Failed to save preference state: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Failed to create preference state file: {}", e);
                }
            },
            Err(e) => {
                warn!("Failed to serialize preference state: {}", e);
            }
        }
    }
}
