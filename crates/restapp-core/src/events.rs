use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::breathing::BreathingStage;
use crate::gesture::Mode;
use crate::pulse::BouncePulse;
use crate::scene::{AssetHandle, SceneId, Volume};
use crate::timer::{ActionLabel, TerminalAction, TimerState};

/// Every state change in the system produces an Event.
/// The host renders them or, for `SessionCompleted`, executes the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: u64,
        action: TerminalAction,
    },
    TimerPaused {
        remaining_secs: u64,
    },
    TimerResumed {
        remaining_secs: u64,
    },
    TimerReset {
        remaining_secs: u64,
    },
    /// One second elapsed in a running session.
    Countdown {
        remaining_secs: u64,
    },
    /// Remaining time reached zero; the host must run `action` now.
    SessionCompleted {
        action: TerminalAction,
    },
    DurationChanged {
        duration_secs: u64,
    },
    TerminalActionChanged {
        action: TerminalAction,
    },
    SceneSwitched {
        scene_id: SceneId,
        loop_audio: AssetHandle,
        animation: AssetHandle,
        tap_audio: Option<AssetHandle>,
    },
    VolumeChanged {
        volume: Volume,
        is_zero: bool,
    },
    /// A tap sound was handed to the audio service.
    TapPlayed {
        asset: AssetHandle,
        mode: Mode,
    },
    /// Short scale pulse on the tapped element.
    Bounce {
        pulse: BouncePulse,
    },
    BreathingEntered,
    BreathingExited,
    /// Breathing clock crossed into a new stage.
    BreathingStageChanged {
        stage: BreathingStage,
        elapsed_secs: f64,
    },
    /// Non-fatal audio failure; playback was skipped.
    PlaybackUnavailable {
        asset: PathBuf,
        reason: String,
    },
    StateSnapshot {
        state: TimerState,
        remaining_secs: u64,
        configured_secs: u64,
        slider_position: u16,
        action: TerminalAction,
        action_label: ActionLabel,
        mode: Mode,
        scene: Option<SceneId>,
        volume: Volume,
    },
}
