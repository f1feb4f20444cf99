//! Game settings and preferences
//!
//! Read once at startup from an inline JSON block on the page; never written back.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::AudioConfig;

/// How the player picks an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum InputMode {
    /// Click an answer to kick at it
    #[default]
    Direct,
    /// Hold the kick key to build power; the power tier picks the answer
    Charge,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Direct => "Direct",
            InputMode::Charge => "Charge",
        }
    }
}

impl FromStr for InputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" | "click" => Ok(InputMode::Direct),
            "charge" | "power" => Ok(InputMode::Charge),
            _ => Err(ConfigError::UnknownInputMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for InputMode {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown input mode '{0}'")]
    UnknownInputMode(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_mode: InputMode,
    /// `KeyboardEvent.key` value of the charge key
    pub charge_key: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
    /// Pause the round when the tab is hidden or the window loses focus
    pub auto_pause: bool,
    pub audio: AudioConfig,

    // === Accessibility ===
    /// Reduced motion (no confetti)
    pub reduced_motion: bool,

    /// Fixed question seed (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Direct,
            charge_key: " ".to_string(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            auto_pause: true,
            audio: AudioConfig::default(),

            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.clamp_volumes();
        Ok(settings)
    }

    fn clamp_volumes(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }

    /// Whether to fire the celebration burst (respects reduced_motion)
    pub fn effective_celebration(&self) -> bool {
        !self.reduced_motion
    }

    /// Whether a key event value is the charge key
    pub fn is_charge_key(&self, key: &str) -> bool {
        key == self.charge_key || (self.charge_key == " " && key == "Spacebar")
    }

    /// Element holding the settings JSON
    #[allow(dead_code)]
    const CONFIG_ELEMENT_ID: &'static str = "soccer-math-config";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = text {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    return settings;
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioCue;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"input_mode":"charge","seed":42}"#).unwrap();
        assert_eq!(settings.input_mode, InputMode::Charge);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.charge_key, " ");
        assert!(settings.audio.source(AudioCue::Success).is_some());
    }

    #[test]
    fn test_volumes_clamped() {
        let settings = Settings::from_json(r#"{"master_volume":3.0,"sfx_volume":-1.0}"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_input_mode_from_str() {
        assert_eq!("Power".parse::<InputMode>().unwrap(), InputMode::Charge);
        assert_eq!("click".parse::<InputMode>().unwrap(), InputMode::Direct);
        assert!(matches!(
            "joystick".parse::<InputMode>(),
            Err(ConfigError::UnknownInputMode(_))
        ));
    }

    #[test]
    fn test_input_mode_aliases_in_json() {
        let settings = Settings::from_json(r#"{"input_mode":"Power"}"#).unwrap();
        assert_eq!(settings.input_mode, InputMode::Charge);
        assert!(Settings::from_json(r#"{"input_mode":"joystick"}"#).is_err());
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""input_mode":"charge""#));
    }

    #[test]
    fn test_auto_pause_setting() {
        assert!(Settings::default().auto_pause);
        let settings = Settings::from_json(r#"{"auto_pause":false}"#).unwrap();
        assert!(!settings.auto_pause);
    }

    #[test]
    fn test_reduced_motion_disables_celebration() {
        let mut settings = Settings::default();
        assert!(settings.effective_celebration());
        settings.reduced_motion = true;
        assert!(!settings.effective_celebration());
    }

    #[test]
    fn test_charge_key() {
        let settings = Settings::default();
        assert!(settings.is_charge_key(" "));
        assert!(settings.is_charge_key("Spacebar"));
        assert!(!settings.is_charge_key("Enter"));
    }
}
