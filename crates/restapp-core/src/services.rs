//! Collaborator interfaces implemented by the host.
//!
//! The core never produces sound, touches the filesystem for settings, or
//! talks to the operating system. It drives these traits instead.

use crate::error::{CoreError, PlaybackError};
use crate::scene::{AssetHandle, Volume};
use crate::timer::TerminalAction;

/// Audio output with one looping ambient track and a pool of one-shot channels.
///
/// Failures are reported as [`PlaybackError`] and must never abort the session.
pub trait AudioPlayback {
    /// Prepare an ambient loop without starting it.
    fn load_loop(&mut self, handle: &AssetHandle) -> Result<(), PlaybackError>;

    /// Start (or restart) the ambient loop at `volume`.
    fn play_loop(&mut self, handle: &AssetHandle, volume: Volume) -> Result<(), PlaybackError>;

    /// Fire-and-forget a one-shot effect on a free channel.
    fn play_once(&mut self, handle: &AssetHandle, volume: Volume) -> Result<(), PlaybackError>;

    /// Apply a new volume to whatever is playing.
    fn set_volume(&mut self, _volume: Volume) {}
}

/// Cross-run persistence of the "volume was zero" flag.
pub trait VolumeStore {
    fn volume_was_zero(&self) -> bool;

    /// # Errors
    ///
    /// Returns an error if the flag cannot be written.
    fn set_volume_was_zero(&mut self, was_zero: bool) -> Result<(), CoreError>;
}

/// OS-level end-of-session actions.
pub trait TerminalActionExecutor {
    /// # Errors
    ///
    /// Returns an error if the system refused to mute.
    fn mute(&mut self) -> Result<(), CoreError>;

    /// # Errors
    ///
    /// Returns an error if the shutdown command could not be issued.
    fn shutdown(&mut self) -> Result<(), CoreError>;

    /// # Errors
    ///
    /// Propagates the error of the selected action.
    fn execute(&mut self, action: TerminalAction) -> Result<(), CoreError> {
        match action {
            TerminalAction::Mute => self.mute(),
            TerminalAction::Shutdown => self.shutdown(),
        }
    }
}

/// In-memory [`VolumeStore`], for hosts without persistence and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryVolumeStore {
    was_zero: bool,
}

impl MemoryVolumeStore {
    pub fn new(was_zero: bool) -> Self {
        Self { was_zero }
    }
}

impl VolumeStore for MemoryVolumeStore {
    fn volume_was_zero(&self) -> bool {
        self.was_zero
    }

    fn set_volume_was_zero(&mut self, was_zero: bool) -> Result<(), CoreError> {
        self.was_zero = was_zero;
        Ok(())
    }
}
