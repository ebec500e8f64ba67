mod config;
mod state;

pub use config::{AudioConfig, BreathingConfig, Config, GestureConfig, TimerConfig};
pub use state::VolumeFlagFile;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/restapp[-dev]/` based on RESTAPP_ENV.
///
/// Set RESTAPP_ENV=dev to use the development data directory, or
/// RESTAPP_HOME to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("RESTAPP_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("RESTAPP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("restapp-dev")
            } else {
                base_dir.join("restapp")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
