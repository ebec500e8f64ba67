//! Tap feedback "bounce" curve.
//!
//! A single sine swing of the element's scale, sampled by the renderer with
//! the time elapsed since the tap.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Scale oscillation triggered by a tap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BouncePulse {
    /// Peak deviation from 1.0.
    pub amplitude: f64,
    /// Length of the single swing, in seconds.
    pub period_secs: f64,
}

impl BouncePulse {
    /// Tap on the scene animation: ±10% over ~1.26 s.
    pub const SCENE_TAP: BouncePulse = BouncePulse {
        amplitude: 0.10,
        period_secs: 1.2566,
    };

    /// Tap inside the breathing overlay: ±4% over ~0.63 s.
    pub const BREATHING_TAP: BouncePulse = BouncePulse {
        amplitude: 0.04,
        period_secs: 0.6283,
    };

    /// Scale factor `elapsed_secs` after the tap, or `None` once the swing is over.
    pub fn scale_at(&self, elapsed_secs: f64) -> Option<f64> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 || elapsed_secs > self.period_secs {
            return None;
        }
        Some(1.0 + (TAU * elapsed_secs / self.period_secs).sin() * self.amplitude)
    }
}
