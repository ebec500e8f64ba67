//! Headless audio service.
//!
//! Validates that assets are readable and keeps the bookkeeping a real mixer
//! would: one ambient loop plus a fixed pool of one-shot channels. A channel
//! stays busy for [`TAP_HOLD`] after a tap; when every channel is busy the
//! one closest to finishing is taken over.

use std::time::{Duration, Instant};

use restapp_core::{AssetHandle, AudioPlayback, PlaybackError, Volume};

/// How long a one-shot keeps its channel.
pub const TAP_HOLD: Duration = Duration::from_millis(600);

pub struct ConsolePlayback {
    /// Busy-until instant per channel.
    channels: Vec<Option<Instant>>,
    current_loop: Option<AssetHandle>,
}

impl ConsolePlayback {
    pub fn new(channels: usize) -> Self {
        Self {
            channels: vec![None; channels.max(1)],
            current_loop: None,
        }
    }

    pub fn current_loop(&self) -> Option<&AssetHandle> {
        self.current_loop.as_ref()
    }

    pub fn busy_channels(&self, now: Instant) -> usize {
        self.channels
            .iter()
            .filter(|slot| matches!(slot, Some(until) if *until > now))
            .count()
    }

    /// Index of a free channel, or of the one that frees up soonest.
    fn claim_channel(&mut self, now: Instant) -> usize {
        let index = self
            .channels
            .iter()
            .position(|slot| slot.map_or(true, |until| until <= now))
            .unwrap_or_else(|| {
                self.channels
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, slot)| **slot)
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            });
        self.channels[index] = Some(now + TAP_HOLD);
        index
    }
}

fn check_readable(handle: &AssetHandle) -> Result<(), PlaybackError> {
    match std::fs::metadata(handle.path()) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(PlaybackError::new(handle.path(), "not a file")),
        Err(err) => Err(PlaybackError::new(handle.path(), err.to_string())),
    }
}

impl AudioPlayback for ConsolePlayback {
    fn load_loop(&mut self, handle: &AssetHandle) -> Result<(), PlaybackError> {
        check_readable(handle)
    }

    fn play_loop(&mut self, handle: &AssetHandle, volume: Volume) -> Result<(), PlaybackError> {
        check_readable(handle)?;
        self.current_loop = Some(handle.clone());
        tracing::info!(asset = %handle, volume = %volume, "ambient loop playing");
        Ok(())
    }

    fn play_once(&mut self, handle: &AssetHandle, volume: Volume) -> Result<(), PlaybackError> {
        check_readable(handle)?;
        let now = Instant::now();
        let channel = self.claim_channel(now);
        tracing::info!(asset = %handle, volume = %volume, channel, busy = self.busy_channels(now), "tap");
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) {
        if let Some(handle) = self.current_loop() {
            tracing::debug!(asset = %handle, volume = %volume, "volume applied");
        }
    }
}
