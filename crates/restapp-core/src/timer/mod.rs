mod engine;
mod slider;

pub use engine::{ActionLabel, SessionTimer, TerminalAction, TimerState};
pub use slider::{
    duration_to_slider, format_remaining, slider_to_duration, TimeScale, MIN_SESSION_SECS,
    SLIDER_RANGE,
};
