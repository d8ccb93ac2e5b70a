//! Game settings and preferences
//!
//! Persisted separately from run state in LocalStorage. Corrupt or missing
//! data falls back to defaults rather than erroring.

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_RADIUS;
use crate::sim::{Config, ControlMode};

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Sound effects
    pub sfx: bool,
    /// Mirror the HUD for left-handed play
    pub left_hand_hud: bool,
    /// Random hue per obstacle instead of the fixed color
    pub varied_obstacle_colors: bool,
    /// Tilt control instead of thumb drag
    pub tilt_controls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx: true,
            left_hand_hud: false,
            varied_obstacle_colors: false,
            tilt_controls: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "thumb_dodge_settings";

    /// Build the run configuration these preferences describe
    pub fn run_config(&self, field_width: f32, field_height: f32) -> Config {
        Config {
            varied_obstacle_colors: self.varied_obstacle_colors,
            control: if self.tilt_controls {
                ControlMode::Tilt
            } else {
                ControlMode::Drag
            },
            ..Config::new(field_width, field_height, PLAYER_RADIUS)
        }
    }

    /// Parse persisted JSON, degrading to defaults on corruption
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|err| {
            log::warn!("Corrupt settings, using defaults: {err}");
            Self::default()
        })
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
