//! Core error types for restapp-core.
//!
//! The hierarchy mirrors how failures are handled at runtime: scene and
//! timer errors are reported to the caller without changing state, playback
//! errors are never fatal, and duration misconfiguration stops start-up.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for restapp-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Scene switch requested for an id the registry does not know
    #[error("Unknown scene: '{id}'")]
    UnknownScene { id: String },

    /// An audio asset could not be loaded or played
    #[error("Playback unavailable: {0}")]
    PlaybackUnavailable(#[from] PlaybackError),

    /// Maximum/minimum session length misconfigured
    #[error("Invalid duration configuration: max {max_secs}s must exceed min {min_secs}s")]
    InvalidDurationConfig { max_secs: u64, min_secs: u64 },

    /// Timer state machine rejected a command
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Playback failure for a single asset.
///
/// Always recoverable: the session keeps counting down.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{asset}: {reason}")]
pub struct PlaybackError {
    pub asset: PathBuf,
    pub reason: String,
}

impl PlaybackError {
    pub fn new(asset: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            reason: reason.into(),
        }
    }
}

/// Commands the session timer refuses in its current state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// Duration or terminal action edited while Running/Paused
    #[error("session in progress: settings apply only between runs")]
    SessionInProgress,

    /// `start` issued in Completed without a reset
    #[error("session already completed: reset before starting a new run")]
    SessionCompleted,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Home/config directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
