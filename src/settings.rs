//! Player-adjustable settings
//!
//! Persisted separately from runs in LocalStorage; survives restarts.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SENSITIVITY, DEFAULT_SPEED};

/// Speed slider raw value -> `speed`
pub const SPEED_SLIDER_DIVISOR: f32 = 2.0;
/// Sensitivity slider raw value -> `sensitivity`
pub const SENSITIVITY_SLIDER_DIVISOR: f32 = 1.5;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Advisory only: stored and shown, not read by the simulation
    pub speed: f32,
    /// Multiplier applied to every input delta
    pub sensitivity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl Settings {
    /// Apply a raw speed slider value (the UI owns the range)
    pub fn set_speed_slider(&mut self, value: f32) {
        self.speed = value / SPEED_SLIDER_DIVISOR;
    }

    /// Apply a raw sensitivity slider value (the UI owns the range)
    pub fn set_sensitivity_slider(&mut self, value: f32) {
        self.sensitivity = value / SENSITIVITY_SLIDER_DIVISOR;
    }

    /// Slider position that reproduces the current speed
    pub fn speed_slider(&self) -> f32 {
        self.speed * SPEED_SLIDER_DIVISOR
    }

    /// Slider position that reproduces the current sensitivity
    pub fn sensitivity_slider(&self) -> f32 {
        self.sensitivity * SENSITIVITY_SLIDER_DIVISOR
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "wavy_tunnel_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
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
