//! Player preferences
//!
//! Persisted to LocalStorage, shared by both games.

use serde::{Deserialize, Serialize};

use crate::platform;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Confetti pieces drawn per sorted page, out of what the simulation tossed
    pub fn confetti_limit(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 64,
            QualityPreset::High => usize::MAX,
        }
    }

    /// Whether clouds and stars are drawn
    pub fn sky_details(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Vibrate on hits (mobile)
    pub vibration: bool,
    /// No red flash, no night-mode inversion
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            sound: true,
            master_volume: 0.8,
            vibration: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "status_arcade_settings";

    /// Volume to play at, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective critical-hit flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective night-mode inversion (respects reduced_motion)
    pub fn effective_invert(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings from storage, falling back to defaults
    pub fn load() -> Self {
        match platform::load_json(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from storage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        platform::save_json(Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_details() {
        assert!(!QualityPreset::Low.sky_details());
        assert!(QualityPreset::Medium.sky_details());
        assert_eq!(QualityPreset::Low.confetti_limit(), 0);
        assert!(QualityPreset::High.confetti_limit() > QualityPreset::Medium.confetti_limit());
    }

    #[test]
    fn test_muted_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.sound = false;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_flash());
        assert!(!settings.effective_invert());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "sound": false }"#).unwrap();
        assert!(!settings.sound);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.vibration);
    }

    #[test]
    fn test_native_load_is_default() {
        assert_eq!(Settings::load(), Settings::default());
    }
}
