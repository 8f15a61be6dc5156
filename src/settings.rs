//! Player preferences
//!
//! Persisted separately from the high score, as JSON.

use serde::{Deserialize, Serialize};

use crate::platform::StorageBackend;

/// Storage key for preferences
pub const STORAGE_KEY: &str = "fynix_expense_drop_settings";

/// Game preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all audio
    pub muted: bool,
    /// Minimize the penalty flash and landing shake
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Load from storage, falling back to defaults on anything unexpected
    pub fn load<S: StorageBackend>(store: &S) -> Self {
        if let Some(json) = store.get(STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => return settings,
                Err(err) => log::warn!("Ignoring malformed settings: {err}"),
            }
        }
        Self::default()
    }

    /// Save to storage
    pub fn save<S: StorageBackend>(&self, store: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => store.set(STORAGE_KEY, &json),
            Err(err) => log::warn!("Failed to serialize settings: {err}"),
        }
    }

    /// Effective cue volume, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }
}
