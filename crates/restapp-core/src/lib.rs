//! # RestApp Core Library
//!
//! This library provides the session logic of the RestApp sleep timer: a
//! countdown that ends by muting the system or shutting it down, ambient
//! scenes with a tap effect, and a hidden breathing mode opened by a rapid
//! click burst. Hosts (the CLI, or a GUI) deliver ticks and input events and
//! render or execute the returned [`Event`]s.
//!
//! ## Architecture
//!
//! - **Session Timer**: a tick-driven state machine; the caller delivers one
//!   `tick()` per second
//! - **Gestures**: sliding-window click burst detection
//! - **Breathing Clock**: a pure function of elapsed wall-clock time
//! - **Scenes**: active scene selection over a host-supplied registry
//! - **Storage**: TOML configuration and the persisted volume flag
//!
//! ## Key Components
//!
//! - [`SessionController`]: single entry point composing everything above
//! - [`SessionTimer`]: countdown state machine
//! - [`ClickBurstDetector`]: rapid-click gesture recognizer
//! - [`Config`]: application configuration management

pub mod breathing;
pub mod controller;
pub mod error;
pub mod events;
pub mod gesture;
pub mod pulse;
pub mod scene;
pub mod services;
pub mod storage;
pub mod timer;

pub use breathing::{phase_at, BreathingCycle, BreathingPhase, BreathingStage};
pub use controller::SessionController;
pub use error::{ConfigError, CoreError, PlaybackError, TimerError};
pub use events::Event;
pub use gesture::{ClickBurstDetector, ClickHistory, Gesture, GestureThresholds, Mode};
pub use pulse::BouncePulse;
pub use scene::{
    AssetHandle, Scene, SceneAudioManager, SceneId, SceneRegistry, SceneSwitch, Volume,
    VolumeChange,
};
pub use services::{AudioPlayback, MemoryVolumeStore, TerminalActionExecutor, VolumeStore};
pub use storage::{Config, VolumeFlagFile};
pub use timer::{
    duration_to_slider, format_remaining, slider_to_duration, ActionLabel, SessionTimer,
    TerminalAction, TimeScale, TimerState,
};
