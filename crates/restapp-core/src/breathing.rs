//! Breathing-mode phase clock.
//!
//! The breathing overlay follows a box-breathing cycle: inhale, hold,
//! exhale, hold (4 s each by default). The visual state is a pure function
//! of the absolute time elapsed since the overlay appeared, so a renderer
//! that was backgrounded simply asks again with the current elapsed value.
//! Nothing accumulates per frame.

use serde::{Deserialize, Serialize};

/// Circle radius at rest, as a fraction of the element's shorter side.
pub const BASE_RADIUS_RATIO: f64 = 0.20;
/// Extra radius at full inhale, as a fraction of the element's shorter side.
pub const RADIUS_AMPLITUDE_RATIO: f64 = 0.30;
/// Alpha reached at the end of the exhale segment.
pub const MIN_ALPHA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathingStage {
    Inhale,
    HoldHigh,
    Exhale,
    HoldLow,
}

/// Segment lengths of one breathing cycle, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreathingCycle {
    pub inhale_secs: f64,
    pub hold_high_secs: f64,
    pub exhale_secs: f64,
    pub hold_low_secs: f64,
}

impl Default for BreathingCycle {
    fn default() -> Self {
        Self {
            inhale_secs: 4.0,
            hold_high_secs: 4.0,
            exhale_secs: 4.0,
            hold_low_secs: 4.0,
        }
    }
}

/// Visual state of the breathing circle at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreathingPhase {
    pub stage: BreathingStage,
    /// 0.0 .. 1.0 through the current stage.
    pub stage_progress: f64,
    /// 0.0 (rest) .. 1.0 (full inhale).
    pub radius_fraction: f64,
    /// 1.0 except while exhaling, where it fades to [`MIN_ALPHA`].
    pub alpha_fraction: f64,
}

impl BreathingPhase {
    /// Circle radius in pixels for an element whose shorter side is `min_side`.
    pub fn radius(&self, min_side: f64) -> f64 {
        let base = BASE_RADIUS_RATIO * min_side;
        let amp = RADIUS_AMPLITUDE_RATIO * min_side;
        base + amp * self.radius_fraction
    }
}

impl BreathingCycle {
    pub fn period_secs(&self) -> f64 {
        self.inhale_secs + self.hold_high_secs + self.exhale_secs + self.hold_low_secs
    }

    /// True when every segment is non-negative and the period is positive.
    pub fn is_valid(&self) -> bool {
        let segments = [
            self.inhale_secs,
            self.hold_high_secs,
            self.exhale_secs,
            self.hold_low_secs,
        ];
        segments.iter().all(|s| s.is_finite() && *s >= 0.0) && self.period_secs() > 0.0
    }

    /// Phase after `elapsed_secs`. Negative or non-finite input reads as 0.
    pub fn phase_at(&self, elapsed_secs: f64) -> BreathingPhase {
        let period = self.period_secs();
        let mut t = if elapsed_secs.is_finite() && period > 0.0 {
            elapsed_secs.max(0.0).rem_euclid(period)
        } else {
            0.0
        };

        if t < self.inhale_secs {
            let k = t / self.inhale_secs;
            return BreathingPhase {
                stage: BreathingStage::Inhale,
                stage_progress: k,
                radius_fraction: k,
                alpha_fraction: 1.0,
            };
        }
        t -= self.inhale_secs;

        if t < self.hold_high_secs {
            return BreathingPhase {
                stage: BreathingStage::HoldHigh,
                stage_progress: t / self.hold_high_secs,
                radius_fraction: 1.0,
                alpha_fraction: 1.0,
            };
        }
        t -= self.hold_high_secs;

        if t < self.exhale_secs {
            let k = t / self.exhale_secs;
            return BreathingPhase {
                stage: BreathingStage::Exhale,
                stage_progress: k,
                radius_fraction: 1.0 - k,
                alpha_fraction: 1.0 - k * (1.0 - MIN_ALPHA),
            };
        }
        t -= self.exhale_secs;

        let stage_progress = if self.hold_low_secs > 0.0 {
            (t / self.hold_low_secs).min(1.0)
        } else {
            0.0
        };
        BreathingPhase {
            stage: BreathingStage::HoldLow,
            stage_progress,
            radius_fraction: 0.0,
            alpha_fraction: 1.0,
        }
    }
}

/// Phase of the default 4-4-4-4 cycle.
pub fn phase_at(elapsed_secs: f64) -> BreathingPhase {
    BreathingCycle::default().phase_at(elapsed_secs)
}
