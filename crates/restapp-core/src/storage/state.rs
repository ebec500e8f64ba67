//! Cross-run state: whether the volume was left at zero.
//!
//! Stored as a one-key TOML file (`state.toml`) next to the config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{CoreError, Result};
use crate::services::VolumeStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    vol_is_zero: bool,
}

/// File-backed [`VolumeStore`].
#[derive(Debug, Clone)]
pub struct VolumeFlagFile {
    path: PathBuf,
}

impl VolumeFlagFile {
    /// `state.toml` in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is unavailable.
    pub fn open() -> Result<Self> {
        Ok(Self::at(data_dir()?.join("state.toml")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> PersistedState {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }
}

impl VolumeStore for VolumeFlagFile {
    /// Missing or unreadable state reads as `false`.
    fn volume_was_zero(&self) -> bool {
        self.read().vol_is_zero
    }

    fn set_volume_was_zero(&mut self, was_zero: bool) -> Result<(), CoreError> {
        let content = toml::to_string(&PersistedState {
            vol_is_zero: was_zero,
        })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = VolumeFlagFile::at(dir.path().join("state.toml"));
        assert!(!store.volume_was_zero());
    }

    #[test]
    fn flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        let mut store = VolumeFlagFile::at(&path);
        store.set_volume_was_zero(true).unwrap();
        assert!(VolumeFlagFile::at(&path).volume_was_zero());
        store.set_volume_was_zero(false).unwrap();
        assert!(!VolumeFlagFile::at(&path).volume_was_zero());
    }

    #[test]
    fn garbage_reads_false() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        assert!(!VolumeFlagFile::at(&path).volume_was_zero());
    }
}
