//! Game settings and preferences
//!
//! Persisted as JSON in the user's home directory. A missing or unreadable
//! file simply means defaults; the simulation never depends on these.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Render entities in color (disable for monochrome terminals)
    pub color: bool,
    /// Show a frames-per-second counter in the HUD
    pub show_fps: bool,
    /// Fixed session seed for reproducible runs; `None` draws a fresh seed
    /// per session
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            show_fps: false,
            seed: None,
        }
    }
}

impl Settings {
    fn path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".coinfall.json")
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::path()) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("ignoring malformed settings file: {err}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Best-effort save
    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(Self::path(), json) {
                    log::warn!("could not save settings: {err}");
                }
            }
            Err(err) => log::warn!("could not serialize settings: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.color);
        assert!(!settings.show_fps);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_roundtrip_json() {
        let settings = Settings {
            color: false,
            show_fps: true,
            seed: Some(12345),
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(!back.color);
        assert!(back.show_fps);
        assert_eq!(back.seed, Some(12345));
    }
}
