//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Session length bounds and the end-of-session action
//! - Default scene, volume and media locations
//! - Gesture window and click thresholds
//! - Breathing cycle segment lengths
//!
//! Configuration is stored at `~/.config/restapp/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::breathing::BreathingCycle;
use crate::error::{ConfigError, CoreError, Result};
use crate::gesture::{
    GestureThresholds, BURST_WINDOW_MS, ENTER_BREATHING_CLICKS, EXIT_BREATHING_CLICKS,
};
use crate::scene::{AssetHandle, Volume};
use crate::timer::{TerminalAction, TimeScale};

/// Countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_minutes")]
    pub default_minutes: u64,
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u64,
    #[serde(default = "default_min_seconds")]
    pub min_seconds: u64,
    #[serde(default)]
    pub terminal_action: TerminalAction,
    /// Minute labels drawn under the duration slider.
    #[serde(default = "default_slider_marks")]
    pub slider_marks: Vec<u64>,
}

/// Audio and media configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_volume")]
    pub default_volume: u8,
    #[serde(default = "default_scene")]
    pub default_scene: String,
    /// Directory scanned for scenes. Defaults to `<data dir>/scenes`.
    #[serde(default)]
    pub scenes_dir: Option<PathBuf>,
    /// Tap sound used inside the breathing overlay.
    #[serde(default)]
    pub breath_click: Option<PathBuf>,
    /// One-shot channels available for overlapping taps.
    #[serde(default = "default_channels")]
    pub channels: usize,
}

/// Rapid-click gesture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_burst_window_ms")]
    pub burst_window_ms: u64,
    #[serde(default = "default_enter_clicks")]
    pub enter_breathing_clicks: usize,
    #[serde(default = "default_exit_clicks")]
    pub exit_breathing_clicks: usize,
}

/// Breathing cycle configuration, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_segment")]
    pub inhale_secs: f64,
    #[serde(default = "default_segment")]
    pub hold_high_secs: f64,
    #[serde(default = "default_segment")]
    pub exhale_secs: f64,
    #[serde(default = "default_segment")]
    pub hold_low_secs: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/restapp/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub gestures: GestureConfig,
    #[serde(default)]
    pub breathing: BreathingConfig,
}

// Default functions
fn default_minutes() -> u64 {
    90
}
fn default_max_minutes() -> u64 {
    240
}
fn default_min_seconds() -> u64 {
    60
}
fn default_slider_marks() -> Vec<u64> {
    vec![1, 10, 30, 60, 90, 120, 150, 180, 210, 240]
}
fn default_volume() -> u8 {
    20
}
fn default_scene() -> String {
    "fire".into()
}
fn default_channels() -> usize {
    32
}
fn default_burst_window_ms() -> u64 {
    BURST_WINDOW_MS as u64
}
fn default_enter_clicks() -> usize {
    ENTER_BREATHING_CLICKS
}
fn default_exit_clicks() -> usize {
    EXIT_BREATHING_CLICKS
}
fn default_segment() -> f64 {
    4.0
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            max_minutes: default_max_minutes(),
            min_seconds: default_min_seconds(),
            terminal_action: TerminalAction::Mute,
            slider_marks: default_slider_marks(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            default_scene: default_scene(),
            scenes_dir: None,
            breath_click: None,
            channels: default_channels(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            burst_window_ms: default_burst_window_ms(),
            enter_breathing_clicks: ENTER_BREATHING_CLICKS,
            exit_breathing_clicks: EXIT_BREATHING_CLICKS,
        }
    }
}

impl Default for BreathingConfig {
    fn default() -> Self {
        let cycle = BreathingCycle::default();
        Self {
            inhale_secs: cycle.inhale_secs,
            hold_high_secs: cycle.hold_high_secs,
            exhale_secs: cycle.exhale_secs,
            hold_low_secs: cycle.hold_low_secs,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Optional paths are null until first set.
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, or create the file with defaults if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// or leaves the configuration invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self).map_err(ConfigError::from)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// See [`Config::apply`]; also fails if the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check every invariant the session relies on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDurationConfig` for bad session bounds and
    /// `ConfigError::InvalidValue` for anything else out of range.
    pub fn validate(&self) -> Result<()> {
        self.time_scale()?;

        let invalid = |key: &str, message: &str| -> CoreError {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            }
            .into()
        };
        if self.audio.default_volume > 100 {
            return Err(invalid("audio.default_volume", "must be between 0 and 100"));
        }
        if self.audio.channels == 0 {
            return Err(invalid("audio.channels", "must be at least 1"));
        }
        if self.gestures.burst_window_ms == 0 {
            return Err(invalid("gestures.burst_window_ms", "must be positive"));
        }
        if self.gestures.enter_breathing_clicks == 0 {
            return Err(invalid("gestures.enter_breathing_clicks", "must be at least 1"));
        }
        if self.gestures.exit_breathing_clicks == 0 {
            return Err(invalid("gestures.exit_breathing_clicks", "must be at least 1"));
        }
        if !self.breathing_cycle().is_valid() {
            return Err(invalid(
                "breathing",
                "segments must be non-negative with a positive total",
            ));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidDurationConfig` when the maximum does not exceed the minimum.
    pub fn time_scale(&self) -> Result<TimeScale> {
        TimeScale::with_min(
            self.timer.max_minutes.saturating_mul(60),
            self.timer.min_seconds,
        )
    }

    pub fn default_duration_secs(&self) -> u64 {
        self.timer.default_minutes.saturating_mul(60)
    }

    pub fn default_volume(&self) -> Volume {
        Volume::new(self.audio.default_volume)
    }

    pub fn burst_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(
            i64::try_from(self.gestures.burst_window_ms).unwrap_or(i64::MAX),
        )
    }

    pub fn gesture_thresholds(&self) -> GestureThresholds {
        GestureThresholds {
            enter_breathing: self.gestures.enter_breathing_clicks,
            exit_breathing: self.gestures.exit_breathing_clicks,
        }
    }

    pub fn breathing_cycle(&self) -> BreathingCycle {
        BreathingCycle {
            inhale_secs: self.breathing.inhale_secs,
            hold_high_secs: self.breathing.hold_high_secs,
            exhale_secs: self.breathing.exhale_secs,
            hold_low_secs: self.breathing.hold_low_secs,
        }
    }

    pub fn breath_click(&self) -> Option<AssetHandle> {
        self.audio.breath_click.clone().map(AssetHandle::new)
    }

    /// Configured scenes directory, or `<data dir>/scenes`.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the data directory
    /// is unavailable.
    pub fn scenes_dir(&self) -> Result<PathBuf> {
        match &self.audio.scenes_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("scenes")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.default_minutes, 90);
        assert_eq!(parsed.timer.max_minutes, 240);
        assert_eq!(parsed.audio.default_volume, 20);
        assert_eq!(parsed.gestures.enter_breathing_clicks, 5);
        assert_eq!(parsed.gestures.exit_breathing_clicks, 8);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[timer]\nmax_minutes = 120\n").unwrap();
        assert_eq!(cfg.timer.max_minutes, 120);
        assert_eq!(cfg.timer.default_minutes, 90);
        assert_eq!(cfg.audio.default_scene, "fire");
        assert_eq!(cfg.breathing_cycle(), BreathingCycle::default());
    }

    #[test]
    fn default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_max_is_invalid_duration_config() {
        let mut cfg = Config::default();
        cfg.timer.max_minutes = 0;
        assert!(matches!(
            cfg.validate(),
            Err(CoreError::InvalidDurationConfig { .. })
        ));
        cfg.timer.max_minutes = 1;
        assert!(matches!(
            cfg.validate(),
            Err(CoreError::InvalidDurationConfig { .. })
        ));
    }

    #[test]
    fn get_by_path() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.max_minutes").as_deref(), Some("240"));
        assert_eq!(cfg.get("timer.terminal_action").as_deref(), Some("mute"));
        assert_eq!(cfg.get("audio.default_scene").as_deref(), Some("fire"));
        assert!(cfg.get("timer.nope").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_preserves_types() {
        let mut cfg = Config::default();
        cfg.apply("timer.default_minutes", "30").unwrap();
        cfg.apply("timer.terminal_action", "shutdown").unwrap();
        cfg.apply("breathing.exhale_secs", "6.5").unwrap();
        cfg.apply("audio.scenes_dir", "/srv/scenes").unwrap();
        assert_eq!(cfg.timer.default_minutes, 30);
        assert_eq!(cfg.timer.terminal_action, TerminalAction::Shutdown);
        assert_eq!(cfg.breathing.exhale_secs, 6.5);
        assert_eq!(cfg.audio.scenes_dir, Some(PathBuf::from("/srv/scenes")));
    }

    #[test]
    fn apply_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("timer.bogus", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.apply("timer.max_minutes", "abc").is_err());
        assert!(cfg.apply("timer.terminal_action", "reboot").is_err());
        assert!(matches!(
            cfg.apply("timer.max_minutes", "0"),
            Err(CoreError::InvalidDurationConfig { .. })
        ));
        // Rejected edits leave the config untouched.
        assert_eq!(cfg.timer.max_minutes, 240);
    }

    #[test]
    fn load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.default_minutes, 90);
        assert!(path.exists());

        let mut edited = cfg.clone();
        edited.apply("audio.default_volume", "0").unwrap();
        edited.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().audio.default_volume, 0);
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = 5").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
