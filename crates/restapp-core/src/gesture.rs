//! Rapid-click gesture recognition.
//!
//! Clicks are kept in a sliding look-back window (1.5 s by default). Five
//! clicks inside the window while in [`Mode::Normal`] enter breathing mode;
//! eight while in [`Mode::Breathing`] leave it. The history is cleared the
//! moment a threshold fires, so one burst fires at most once.
//!
//! Timestamps come from the wall clock and may jump backwards. Pruning is by
//! absolute age relative to the newest click: anything further than the
//! window from `now`, in either direction, is dropped.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default look-back window for a burst.
pub const BURST_WINDOW_MS: i64 = 1500;
/// Clicks needed to enter breathing mode.
pub const ENTER_BREATHING_CLICKS: usize = 5;
/// Clicks needed to leave breathing mode.
pub const EXIT_BREATHING_CLICKS: usize = 8;

/// Which gesture domain currently receives clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Breathing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    EnterBreathing,
    ExitBreathing,
}

/// Recent clicks inside the look-back window.
#[derive(Debug, Clone)]
pub struct ClickHistory {
    clicks: VecDeque<DateTime<Utc>>,
    window: Duration,
}

impl Default for ClickHistory {
    fn default() -> Self {
        Self::new(Duration::milliseconds(BURST_WINDOW_MS))
    }
}

impl ClickHistory {
    pub fn new(window: Duration) -> Self {
        Self {
            clicks: VecDeque::new(),
            window,
        }
    }

    /// Record a click at `now`, prune stale entries and return the burst size.
    pub fn register(&mut self, now: DateTime<Utc>) -> usize {
        self.clicks.push_back(now);
        let window = self.window;
        self.clicks.retain(|&t| {
            let age = now.signed_duration_since(t);
            age < window && age > -window
        });
        self.clicks.len()
    }

    pub fn clear(&mut self) {
        self.clicks.clear();
    }

    pub fn len(&self) -> usize {
        self.clicks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Click-count thresholds per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureThresholds {
    pub enter_breathing: usize,
    pub exit_breathing: usize,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            enter_breathing: ENTER_BREATHING_CLICKS,
            exit_breathing: EXIT_BREATHING_CLICKS,
        }
    }
}

/// Turns clicks into enter/exit gestures.
#[derive(Debug, Clone, Default)]
pub struct ClickBurstDetector {
    history: ClickHistory,
    thresholds: GestureThresholds,
}

impl ClickBurstDetector {
    pub fn new(window: Duration, thresholds: GestureThresholds) -> Self {
        Self {
            history: ClickHistory::new(window),
            thresholds,
        }
    }

    /// Register a click received under `mode`.
    ///
    /// Returns the gesture that fired, if any; the history is empty afterwards.
    pub fn on_click(&mut self, mode: Mode, now: DateTime<Utc>) -> Option<Gesture> {
        let burst = self.history.register(now);
        let gesture = match mode {
            Mode::Normal if burst >= self.thresholds.enter_breathing => Gesture::EnterBreathing,
            Mode::Breathing if burst >= self.thresholds.exit_breathing => Gesture::ExitBreathing,
            _ => return None,
        };
        self.history.clear();
        tracing::info!(?gesture, burst, "click burst");
        Some(gesture)
    }

    /// Number of clicks currently inside the window.
    pub fn burst_size(&self) -> usize {
        self.history.len()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn thresholds(&self) -> GestureThresholds {
        self.thresholds
    }
}
