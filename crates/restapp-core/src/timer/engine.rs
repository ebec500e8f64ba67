//! Session timer implementation.
//!
//! The session timer is a tick-driven state machine. It does not use
//! internal threads or read the clock - the host delivers one `tick()` per
//! second while a session is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!         Running -> Completed -> (reset) -> Idle
//! ```
//!
//! Each tick decrements first and then checks for zero, so a session of `n`
//! seconds completes on exactly the `n`-th tick. The terminal action is
//! reported once, on that transition.

use serde::{Deserialize, Serialize};

use crate::error::TimerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// What happens when a session reaches zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalAction {
    #[default]
    Mute,
    Shutdown,
}

impl std::fmt::Display for TerminalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalAction::Mute => f.write_str("mute"),
            TerminalAction::Shutdown => f.write_str("shutdown"),
        }
    }
}

impl std::str::FromStr for TerminalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mute" => Ok(TerminalAction::Mute),
            "shutdown" => Ok(TerminalAction::Shutdown),
            other => Err(format!("unknown terminal action: {other}")),
        }
    }
}

/// Label for the single start/pause/resume button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLabel {
    Start,
    Pause,
    Resume,
    Reset,
}

/// Countdown state machine for one application run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimer {
    state: TimerState,
    /// Session length applied on reset, in seconds.
    configured_secs: u64,
    /// Time left in the current run, in seconds.
    remaining_secs: u64,
    action: TerminalAction,
}

impl SessionTimer {
    /// Create an idle timer with the given session length.
    pub fn new(duration_secs: u64, action: TerminalAction) -> Self {
        Self {
            state: TimerState::Idle,
            configured_secs: duration_secs,
            remaining_secs: duration_secs,
            action,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn configured_secs(&self) -> u64 {
        self.configured_secs
    }

    pub fn terminal_action(&self) -> TerminalAction {
        self.action
    }

    /// True while a run is in flight and its settings are locked.
    pub fn in_progress(&self) -> bool {
        matches!(self.state, TimerState::Running | TimerState::Paused)
    }

    pub fn action_label(&self) -> ActionLabel {
        match self.state {
            TimerState::Idle => ActionLabel::Start,
            TimerState::Running => ActionLabel::Pause,
            TimerState::Paused => ActionLabel::Resume,
            TimerState::Completed => ActionLabel::Reset,
        }
    }

    /// 0.0 .. 1.0 progress through the current run.
    pub fn progress(&self) -> f64 {
        if self.configured_secs == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs as f64 / self.configured_secs as f64).clamp(0.0, 1.0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `Idle -> Running`. No-op (`Ok(None)`) when already running or paused.
    ///
    /// # Errors
    ///
    /// Returns `SessionCompleted` in `Completed`; call [`reset`](Self::reset) first.
    pub fn start(&mut self) -> Result<Option<Event>, TimerError> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                tracing::debug!(remaining_secs = self.remaining_secs, "session started");
                Ok(Some(Event::TimerStarted {
                    duration_secs: self.remaining_secs,
                    action: self.action,
                }))
            }
            TimerState::Running | TimerState::Paused => Ok(None),
            TimerState::Completed => Err(TimerError::SessionCompleted),
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                tracing::debug!(remaining_secs = self.remaining_secs, "session paused");
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                tracing::debug!(remaining_secs = self.remaining_secs, "session resumed");
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                })
            }
            _ => None,
        }
    }

    /// The combined action button: start, pause, resume or reset depending
    /// on the current state.
    pub fn toggle(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => self.start().ok().flatten(),
            TimerState::Running => self.pause(),
            TimerState::Paused => self.resume(),
            TimerState::Completed => Some(self.reset()),
        }
    }

    /// Back to `Idle` with the configured length.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.remaining_secs = self.configured_secs;
        Event::TimerReset {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Set the session length for the next run. Allowed in `Idle` and
    /// `Completed`; in `Completed` it also resets to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `SessionInProgress` while `Running` or `Paused`; the running
    /// session is left untouched.
    pub fn set_duration(&mut self, duration_secs: u64) -> Result<Event, TimerError> {
        if self.in_progress() {
            return Err(TimerError::SessionInProgress);
        }
        self.configured_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.state = TimerState::Idle;
        Ok(Event::DurationChanged { duration_secs })
    }

    /// Choose the terminal action. Locked once a run has started.
    ///
    /// # Errors
    ///
    /// Returns `SessionInProgress` while `Running` or `Paused`.
    pub fn set_terminal_action(&mut self, action: TerminalAction) -> Result<(), TimerError> {
        if self.in_progress() {
            return Err(TimerError::SessionInProgress);
        }
        self.action = action;
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Countdown` while running, `SessionCompleted` on the transition
    /// to `Completed`, and `None` in any other state.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Completed;
            tracing::info!(action = %self.action, "session completed");
            return Some(Event::SessionCompleted {
                action: self.action,
            });
        }
        Some(Event::Countdown {
            remaining_secs: self.remaining_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completions(events: &[Option<Event>]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Some(Event::SessionCompleted { .. })))
            .count()
    }

    #[test]
    fn start_pause_resume() {
        let mut timer = SessionTimer::new(90 * 60, TerminalAction::Mute);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.action_label(), ActionLabel::Start);

        assert!(timer.start().unwrap().is_some());
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.action_label(), ActionLabel::Pause);

        assert!(timer.pause().is_some());
        assert_eq!(timer.state(), TimerState::Paused);
        assert_eq!(timer.action_label(), ActionLabel::Resume);

        assert!(timer.resume().is_some());
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn completes_on_last_tick_and_fires_once() {
        let mut timer = SessionTimer::new(5, TerminalAction::Shutdown);
        timer.start().unwrap();

        let events: Vec<_> = (0..4).map(|_| timer.tick()).collect();
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(completions(&events), 0);
        assert_eq!(timer.remaining_secs(), 1);

        let fifth = timer.tick();
        assert!(matches!(
            fifth,
            Some(Event::SessionCompleted {
                action: TerminalAction::Shutdown
            })
        ));
        assert_eq!(timer.state(), TimerState::Completed);

        let late: Vec<_> = (0..10).map(|_| timer.tick()).collect();
        assert_eq!(completions(&late), 0);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn ticks_while_paused_do_not_count() {
        let mut timer = SessionTimer::new(10, TerminalAction::Mute);
        timer.start().unwrap();
        timer.tick();
        timer.tick();
        timer.pause();
        for _ in 0..5 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.remaining_secs(), 8);
        timer.resume();
        assert!(matches!(
            timer.tick(),
            Some(Event::Countdown { remaining_secs: 7 })
        ));
    }

    #[test]
    fn ticks_while_idle_do_not_count() {
        let mut timer = SessionTimer::new(10, TerminalAction::Mute);
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), 10);
    }

    #[test]
    fn duration_edits_rejected_mid_run() {
        let mut timer = SessionTimer::new(600, TerminalAction::Mute);
        timer.start().unwrap();
        assert_eq!(timer.set_duration(60), Err(TimerError::SessionInProgress));
        timer.pause();
        assert_eq!(timer.set_duration(60), Err(TimerError::SessionInProgress));
        assert_eq!(timer.remaining_secs(), 600);
        assert_eq!(
            timer.set_terminal_action(TerminalAction::Shutdown),
            Err(TimerError::SessionInProgress)
        );
        assert_eq!(timer.terminal_action(), TerminalAction::Mute);
    }

    #[test]
    fn completed_requires_reset_before_start() {
        let mut timer = SessionTimer::new(1, TerminalAction::Mute);
        timer.start().unwrap();
        timer.tick();
        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(timer.start(), Err(TimerError::SessionCompleted));

        // Adjusting the slider resets for the next run.
        timer.set_duration(120).unwrap();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_secs(), 120);
        assert!(timer.start().unwrap().is_some());
    }

    #[test]
    fn toggle_walks_the_button_cycle() {
        let mut timer = SessionTimer::new(1, TerminalAction::Mute);
        assert!(matches!(timer.toggle(), Some(Event::TimerStarted { .. })));
        assert!(matches!(timer.toggle(), Some(Event::TimerPaused { .. })));
        assert!(matches!(timer.toggle(), Some(Event::TimerResumed { .. })));
        timer.tick();
        assert_eq!(timer.action_label(), ActionLabel::Reset);
        assert!(matches!(
            timer.toggle(),
            Some(Event::TimerReset { remaining_secs: 1 })
        ));
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn zero_length_session_completes_on_first_tick() {
        let mut timer = SessionTimer::new(0, TerminalAction::Mute);
        timer.start().unwrap();
        assert!(matches!(
            timer.tick(),
            Some(Event::SessionCompleted { .. })
        ));
    }

    #[test]
    fn progress_tracks_countdown() {
        let mut timer = SessionTimer::new(4, TerminalAction::Mute);
        assert_eq!(timer.progress(), 0.0);
        timer.start().unwrap();
        timer.tick();
        assert!((timer.progress() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn terminal_action_parses() {
        assert_eq!("Mute".parse::<TerminalAction>(), Ok(TerminalAction::Mute));
        assert_eq!(
            "shutdown".parse::<TerminalAction>(),
            Ok(TerminalAction::Shutdown)
        );
        assert!("reboot".parse::<TerminalAction>().is_err());
    }
}
