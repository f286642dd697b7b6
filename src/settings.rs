//! Game settings and preferences
//!
//! Presentation only. Gameplay constants live in `consts` and are not
//! configurable. On native builds settings are read from the JSON file named
//! by `BREAKOUT_SETTINGS`.

use serde::{Deserialize, Serialize};

use crate::platform::Colour;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window title
    pub title: String,
    /// Background colour
    pub clear_colour: Colour,
    /// Show FPS counter
    pub show_fps: bool,
    /// Fail `init` when any sprite could not be loaded
    pub strict_assets: bool,
    /// Fixed RNG seed for reproducible gem drops; random when unset
    pub rng_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Breakout!".to_string(),
            clear_colour: Colour::BLACK,
            show_fps: true,
            strict_assets: false,
            rng_seed: None,
        }
    }
}

impl Settings {
    /// Environment variable holding the settings file path
    pub const PATH_ENV: &'static str = "BREAKOUT_SETTINGS";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from the file named by `BREAKOUT_SETTINGS`
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::PATH_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Seed to start a run with
    pub fn seed(&self) -> u64 {
        self.rng_seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "show_fps": false, "rng_seed": 42 }"#).unwrap();
        assert!(!settings.show_fps);
        assert_eq!(settings.seed(), 42);
        assert_eq!(settings.title, "Breakout!");
        assert!(!settings.strict_assets);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_colour_round_trip() {
        let json = r#"{ "clear_colour": { "r": 0.1, "g": 0.2, "b": 0.3 } }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.clear_colour.g, 0.2);
    }
}
