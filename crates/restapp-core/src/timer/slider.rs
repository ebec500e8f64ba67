//! Slider position <-> session length conversion.
//!
//! The duration slider is a fixed 0..=1000 scale relative to a configured
//! maximum. Conversion is lossy: one slider step covers `max / 1000` seconds.
//! Sessions shorter than the minimum (60 s by default) cannot be configured,
//! including at position 0.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Upper bound of the slider scale.
pub const SLIDER_RANGE: u16 = 1000;

/// Shortest configurable session, in seconds.
pub const MIN_SESSION_SECS: u64 = 60;

/// Map a duration to a slider position: `round(d / max * 1000)`, capped at the
/// end of the scale. Returns 0 when `max_secs` is 0.
pub fn duration_to_slider(duration_secs: u64, max_secs: u64) -> u16 {
    if max_secs == 0 {
        return 0;
    }
    let pos = (duration_secs as f64 / max_secs as f64 * f64::from(SLIDER_RANGE)).round();
    pos.min(f64::from(SLIDER_RANGE)) as u16
}

/// Map a slider position back to seconds, floored at [`MIN_SESSION_SECS`].
pub fn slider_to_duration(pos: u16, max_secs: u64) -> u64 {
    slider_to_duration_with_floor(pos, max_secs, MIN_SESSION_SECS)
}

fn slider_to_duration_with_floor(pos: u16, max_secs: u64, min_secs: u64) -> u64 {
    let pos = pos.min(SLIDER_RANGE);
    let secs = (f64::from(pos) / f64::from(SLIDER_RANGE) * max_secs as f64).round() as u64;
    secs.max(min_secs)
}

/// Validated conversion bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeScale {
    max_secs: u64,
    min_secs: u64,
}

impl TimeScale {
    /// Scale with the standard one-minute floor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDurationConfig` when `max_secs` does not exceed the floor.
    pub fn new(max_secs: u64) -> Result<Self> {
        Self::with_min(max_secs, MIN_SESSION_SECS)
    }

    /// # Errors
    ///
    /// Returns `InvalidDurationConfig` unless `min_secs < max_secs` and
    /// `max_secs > 0`.
    pub fn with_min(max_secs: u64, min_secs: u64) -> Result<Self> {
        if max_secs == 0 || max_secs <= min_secs {
            return Err(CoreError::InvalidDurationConfig { max_secs, min_secs });
        }
        Ok(Self { max_secs, min_secs })
    }

    pub fn max_secs(&self) -> u64 {
        self.max_secs
    }

    pub fn min_secs(&self) -> u64 {
        self.min_secs
    }

    pub fn to_slider(&self, duration_secs: u64) -> u16 {
        duration_to_slider(duration_secs, self.max_secs)
    }

    pub fn to_duration(&self, pos: u16) -> u64 {
        slider_to_duration_with_floor(pos, self.max_secs, self.min_secs)
    }

    /// Clamp an arbitrary duration into `[min, max]`.
    pub fn clamp(&self, duration_secs: u64) -> u64 {
        duration_secs.clamp(self.min_secs, self.max_secs)
    }

    /// Slider positions for tick-mark labels given in minutes.
    ///
    /// Marks beyond the maximum are dropped.
    pub fn mark_positions(&self, marks_min: &[u64]) -> Vec<(u64, u16)> {
        marks_min
            .iter()
            .filter(|&&m| m.saturating_mul(60) <= self.max_secs)
            .map(|&m| (m, self.to_slider(m.saturating_mul(60))))
            .collect()
    }
}

/// Human-readable remaining time: `"90 min 00 sec"`.
pub fn format_remaining(secs: u64) -> String {
    format!("{} min {:02} sec", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAX: u64 = 240 * 60;

    #[test]
    fn zero_position_is_floored_to_one_minute() {
        assert_eq!(slider_to_duration(0, MAX), 60);
        assert_eq!(slider_to_duration(1, MAX), 60);
    }

    #[test]
    fn full_scale_maps_to_max() {
        assert_eq!(slider_to_duration(SLIDER_RANGE, MAX), MAX);
        assert_eq!(duration_to_slider(MAX, MAX), SLIDER_RANGE);
    }

    #[test]
    fn durations_past_max_stay_on_scale() {
        assert_eq!(duration_to_slider(MAX * 2, MAX), SLIDER_RANGE);
        assert_eq!(slider_to_duration(u16::MAX, MAX), MAX);
    }

    #[test]
    fn default_session_position() {
        // 90 of 240 minutes
        assert_eq!(duration_to_slider(90 * 60, MAX), 375);
        assert_eq!(slider_to_duration(375, MAX), 90 * 60);
    }

    #[test]
    fn scale_rejects_bad_max() {
        assert!(matches!(
            TimeScale::new(0),
            Err(CoreError::InvalidDurationConfig { max_secs: 0, .. })
        ));
        assert!(TimeScale::new(60).is_err());
        assert!(TimeScale::new(61).is_ok());
    }

    #[test]
    fn mark_positions_skip_marks_past_max() {
        let scale = TimeScale::new(MAX).unwrap();
        let marks = scale.mark_positions(&[1, 60, 240, 300]);
        assert_eq!(marks, vec![(1, 4), (60, 250), (240, 1000)]);
    }

    #[test]
    fn remaining_label() {
        assert_eq!(format_remaining(90 * 60), "90 min 00 sec");
        assert_eq!(format_remaining(61), "1 min 01 sec");
        assert_eq!(format_remaining(0), "0 min 00 sec");
    }

    proptest! {
        #[test]
        fn round_trip_within_one_step(d in 60u64..=MAX) {
            let back = slider_to_duration(duration_to_slider(d, MAX), MAX);
            let step = MAX / u64::from(SLIDER_RANGE);
            prop_assert!(back.abs_diff(d) <= step, "d={} back={}", d, back);
        }

        #[test]
        fn short_durations_clamp_to_floor(d in 0u64..60) {
            prop_assert_eq!(slider_to_duration(duration_to_slider(d, MAX), MAX), 60);
        }

        #[test]
        fn conversions_are_monotonic(a in 0u64..=MAX, b in 0u64..=MAX) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(duration_to_slider(lo, MAX) <= duration_to_slider(hi, MAX));
            let (pa, pb) = (duration_to_slider(lo, MAX), duration_to_slider(hi, MAX));
            prop_assert!(slider_to_duration(pa, MAX) <= slider_to_duration(pb, MAX));
        }
    }
}
