//! Drawing settings.
//!
//! Persisted to localStorage on the web so they survive page reloads. Native
//! builds read them from the JSON file named by `ROOF_MAPPER_SETTINGS`.

use crate::measure::DEFAULT_MEASUREMENT_EPSILON;
use crate::visibility::ImageryPolicy;
use serde::{Deserialize, Serialize};

/// Pixel radius within which a click snaps to an existing vertex.
pub const DEFAULT_SNAP_DISTANCE_PX: f32 = 15.0;

/// Edges shorter than this (meters) get no length label.
pub const DEFAULT_MIN_LABEL_LENGTH_M: f64 = 0.1;

/// How edge labels are rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BearingMode {
    /// Flip labels that would read upside down
    #[default]
    Upright,
    /// Use the raw edge bearing
    Raw,
}

/// User-tunable drawing and measurement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    pub snap_distance_px: f32,
    pub min_label_length_m: f64,
    /// Measurement changes below this are not written back
    pub measurement_epsilon: f64,
    pub bearing_mode: BearingMode,
    pub imagery: ImageryPolicy,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            snap_distance_px: DEFAULT_SNAP_DISTANCE_PX,
            min_label_length_m: DEFAULT_MIN_LABEL_LENGTH_M,
            measurement_epsilon: DEFAULT_MEASUREMENT_EPSILON,
            bearing_mode: BearingMode::default(),
            imagery: ImageryPolicy::default(),
        }
    }
}

impl DrawingSettings {
    /// localStorage key for persisting settings.
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "roof_mapper_settings";

    /// Environment variable naming the native settings file.
    pub const SETTINGS_ENV: &'static str = "ROOF_MAPPER_SETTINGS";

    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings, falling back to defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse drawing settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        log::info!("Loaded drawing settings from localStorage");
        Self::from_json(&json)
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match self.to_json() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize drawing settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save drawing settings: {:?}", e);
        } else {
            log::info!("Saved drawing settings to localStorage");
        }
    }

    /// Load settings from the file named by `ROOF_MAPPER_SETTINGS`, if any.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = match std::env::var(Self::SETTINGS_ENV) {
            Ok(p) => p,
            Err(_) => return Self::default(),
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Loaded drawing settings from {}", path);
                Self::from_json(&json)
            }
            Err(e) => {
                log::warn!("Failed to read settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to the file named by `ROOF_MAPPER_SETTINGS`, if set.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let path = match std::env::var(Self::SETTINGS_ENV) {
            Ok(p) => p,
            Err(_) => return,
        };

        let json = match self.to_json() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize drawing settings: {}", e);
                return;
            }
        };

        if let Err(e) = std::fs::write(&path, json) {
            log::warn!("Failed to save drawing settings to {}: {}", path, e);
        } else {
            log::info!("Saved drawing settings to {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DrawingSettings::default();
        assert_eq!(settings.snap_distance_px, 15.0);
        assert_eq!(settings.min_label_length_m, 0.1);
        assert_eq!(settings.measurement_epsilon, 0.001);
        assert_eq!(settings.bearing_mode, BearingMode::Upright);
        assert_eq!(settings.imagery.min_imagery_zoom, 15.0);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let settings = DrawingSettings::from_json(r#"{"snap_distance_px": 20.0, "bearing_mode": "Raw"}"#);
        assert_eq!(settings.snap_distance_px, 20.0);
        assert_eq!(settings.bearing_mode, BearingMode::Raw);
        assert_eq!(settings.min_label_length_m, 0.1);
    }

    #[test]
    fn test_malformed_json_falls_back_to_defaults() {
        assert_eq!(DrawingSettings::from_json("{not json"), DrawingSettings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = DrawingSettings::default();
        settings.snap_distance_px = 8.0;
        let json = settings.to_json().unwrap();
        assert_eq!(DrawingSettings::from_json(&json), settings);
    }
}
