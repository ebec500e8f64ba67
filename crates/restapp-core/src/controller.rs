//! Session controller.
//!
//! Single entry point for host input. It owns the timer, the scene/audio
//! selection, the click-burst detector and the breathing clock, routes each
//! input to the right component and returns the resulting [`Event`]s.
//!
//! The controller never executes the terminal action itself: a
//! `SessionCompleted` event tells the host to do so.
//!
//! ## Inputs
//!
//! | Host input                 | Method                          |
//! |----------------------------|---------------------------------|
//! | 1 Hz countdown tick        | [`SessionController::on_timer_tick`] |
//! | ~30-60 Hz animation tick   | [`SessionController::on_animation_tick`] |
//! | Action button              | [`SessionController::on_action_button`] |
//! | Slider released            | [`SessionController::on_slider_released`] |
//! | Click on scene animation   | [`SessionController::on_element_click`] |
//! | Click in breathing overlay | [`SessionController::on_overlay_click`] |
//! | Back button / Escape       | [`SessionController::exit_breathing`] |
//! | Scene tile                 | [`SessionController::select_scene`] |
//! | Volume slider              | [`SessionController::set_volume`] |

use chrono::{DateTime, Utc};

use crate::breathing::{BreathingCycle, BreathingPhase, BreathingStage};
use crate::error::{PlaybackError, Result};
use crate::events::Event;
use crate::gesture::{ClickBurstDetector, Gesture, Mode};
use crate::pulse::BouncePulse;
use crate::scene::{AssetHandle, SceneAudioManager, SceneRegistry, SceneSwitch, Volume};
use crate::services::AudioPlayback;
use crate::storage::Config;
use crate::timer::{SessionTimer, TerminalAction, TimeScale};

pub struct SessionController<A: AudioPlayback> {
    timer: SessionTimer,
    scenes: SceneAudioManager,
    detector: ClickBurstDetector,
    cycle: BreathingCycle,
    scale: TimeScale,
    mode: Mode,
    breathing_since: Option<DateTime<Utc>>,
    last_stage: Option<BreathingStage>,
    breath_tap: Option<AssetHandle>,
    audio: A,
}

impl<A: AudioPlayback> SessionController<A> {
    /// Build a controller from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDurationConfig` (or another configuration error) if
    /// `config` does not validate. This is fatal at start-up.
    pub fn new(config: &Config, registry: SceneRegistry, audio: A, volume: Volume) -> Result<Self> {
        config.validate()?;
        let scale = config.time_scale()?;
        let timer = SessionTimer::new(
            scale.clamp(config.default_duration_secs()),
            config.timer.terminal_action,
        );
        let scenes = SceneAudioManager::new(registry, Some(config.audio.default_scene.as_str()), volume);
        Ok(Self {
            timer,
            scenes,
            detector: ClickBurstDetector::new(config.burst_window(), config.gesture_thresholds()),
            cycle: config.breathing_cycle(),
            scale,
            mode: Mode::Normal,
            breathing_since: None,
            last_stage: None,
            breath_tap: config.breath_click(),
            audio,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn scenes(&self) -> &SceneAudioManager {
        &self.scenes
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn time_scale(&self) -> TimeScale {
        self.scale
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Clicks currently counted toward a gesture.
    pub fn pending_clicks(&self) -> usize {
        self.detector.burst_size()
    }

    /// Breathing circle state at `now`, or `None` outside breathing mode.
    pub fn breathing_phase(&self, now: DateTime<Utc>) -> Option<BreathingPhase> {
        let since = self.breathing_since?;
        Some(self.cycle.phase_at(elapsed_secs(since, now)))
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.timer.state(),
            remaining_secs: self.timer.remaining_secs(),
            configured_secs: self.timer.configured_secs(),
            slider_position: self.scale.to_slider(self.timer.remaining_secs()),
            action: self.timer.terminal_action(),
            action_label: self.timer.action_label(),
            mode: self.mode,
            scene: self.scenes.active_id().cloned(),
            volume: self.scenes.volume(),
        }
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Deliver one 1-second countdown tick.
    pub fn on_timer_tick(&mut self) -> Vec<Event> {
        self.timer.tick().into_iter().collect()
    }

    /// The combined start/pause/resume/reset button.
    pub fn on_action_button(&mut self) -> Vec<Event> {
        self.timer.toggle().into_iter().collect()
    }

    /// Slider released at `pos`: set the next session's length.
    ///
    /// # Errors
    ///
    /// Returns `SessionInProgress` while a session is running or paused.
    pub fn on_slider_released(&mut self, pos: u16) -> Result<Event> {
        let secs = self.scale.to_duration(pos);
        Ok(self.timer.set_duration(secs)?)
    }

    /// Set the next session's length directly, clamped to the configured bounds.
    ///
    /// # Errors
    ///
    /// Returns `SessionInProgress` while a session is running or paused.
    pub fn set_duration(&mut self, secs: u64) -> Result<Event> {
        Ok(self.timer.set_duration(self.scale.clamp(secs))?)
    }

    /// # Errors
    ///
    /// Returns `SessionInProgress` while a session is running or paused.
    pub fn set_terminal_action(&mut self, action: TerminalAction) -> Result<Event> {
        self.timer.set_terminal_action(action)?;
        Ok(Event::TerminalActionChanged { action })
    }

    // ── Scenes & audio ───────────────────────────────────────────────

    /// Start the ambient loop of the active scene, if any.
    pub fn start_ambient(&mut self) -> Vec<Event> {
        match self.scenes.current() {
            Some(switch) => self.play_scene(switch),
            None => Vec::new(),
        }
    }

    /// Switch scenes and start the new ambient loop.
    ///
    /// # Errors
    ///
    /// Returns `UnknownScene` for an unregistered id; nothing changes.
    pub fn select_scene(&mut self, id: &str) -> Result<Vec<Event>> {
        let switch = self.scenes.switch_scene(id)?;
        Ok(self.play_scene(switch))
    }

    pub fn set_volume(&mut self, volume: Volume) -> Event {
        let change = self.scenes.set_volume(volume);
        self.audio.set_volume(volume);
        Event::VolumeChanged {
            volume: change.volume,
            is_zero: change.is_zero,
        }
    }

    // ── Gestures ─────────────────────────────────────────────────────

    /// Click on the scene animation.
    ///
    /// In normal mode this plays the scene's tap effect and a bounce unless
    /// the click completes an enter-breathing burst. In breathing mode the
    /// overlay covers the element, so the click counts as an overlay click.
    pub fn on_element_click(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.mode == Mode::Breathing {
            return self.on_overlay_click(now);
        }

        if let Some(Gesture::EnterBreathing) = self.detector.on_click(Mode::Normal, now) {
            return self.enter_breathing(now);
        }

        let mut events = Vec::new();
        if let Some(tap) = self.scenes.current_tap_effect().cloned() {
            events.push(self.play_tap(tap));
        }
        events.push(Event::Bounce {
            pulse: BouncePulse::SCENE_TAP,
        });
        events
    }

    /// Click inside the breathing overlay.
    ///
    /// Always plays the breathing tap sound and counts toward the exit burst.
    pub fn on_overlay_click(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(tap) = self.breath_tap.clone() {
            events.push(self.play_tap(tap));
        }
        events.push(Event::Bounce {
            pulse: BouncePulse::BREATHING_TAP,
        });

        if let Some(Gesture::ExitBreathing) = self.detector.on_click(Mode::Breathing, now) {
            events.extend(self.leave_breathing());
        }
        events
    }

    /// Back button or Escape in the breathing overlay.
    pub fn exit_breathing(&mut self) -> Vec<Event> {
        self.detector.reset();
        self.leave_breathing()
    }

    /// Animation tick while the overlay is visible: reports stage changes.
    pub fn on_animation_tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let Some(since) = self.breathing_since else {
            return Vec::new();
        };
        let elapsed = elapsed_secs(since, now);
        let stage = self.cycle.phase_at(elapsed).stage;
        if self.last_stage == Some(stage) {
            return Vec::new();
        }
        self.last_stage = Some(stage);
        vec![Event::BreathingStageChanged {
            stage,
            elapsed_secs: elapsed,
        }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_breathing(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.mode = Mode::Breathing;
        self.breathing_since = Some(now);
        self.last_stage = None;
        tracing::info!("breathing mode entered");
        vec![Event::BreathingEntered]
    }

    fn leave_breathing(&mut self) -> Vec<Event> {
        if self.mode != Mode::Breathing {
            return Vec::new();
        }
        self.mode = Mode::Normal;
        self.breathing_since = None;
        self.last_stage = None;
        tracing::info!("breathing mode exited");
        vec![Event::BreathingExited]
    }

    fn play_scene(&mut self, switch: SceneSwitch) -> Vec<Event> {
        let volume = self.scenes.volume();
        let mut events = vec![Event::SceneSwitched {
            scene_id: switch.scene_id.clone(),
            loop_audio: switch.loop_audio.clone(),
            animation: switch.animation.clone(),
            tap_audio: switch.tap_audio.clone(),
        }];
        let started = self
            .audio
            .load_loop(&switch.loop_audio)
            .and_then(|()| self.audio.play_loop(&switch.loop_audio, volume));
        if let Err(err) = started {
            events.push(playback_unavailable(err));
        }
        if let Some(tap) = &switch.tap_audio {
            tracing::debug!(scene = %switch.scene_id, tap = %tap, "tap effect ready");
        }
        events
    }

    fn play_tap(&mut self, tap: AssetHandle) -> Event {
        match self.audio.play_once(&tap, self.scenes.volume()) {
            Ok(()) => Event::TapPlayed {
                asset: tap,
                mode: self.mode,
            },
            Err(err) => playback_unavailable(err),
        }
    }
}

fn playback_unavailable(err: PlaybackError) -> Event {
    tracing::warn!(asset = %err.asset.display(), error = %err.reason, "playback unavailable");
    Event::PlaybackUnavailable {
        asset: err.asset,
        reason: err.reason,
    }
}

fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    now.signed_duration_since(since).num_milliseconds() as f64 / 1000.0
}
