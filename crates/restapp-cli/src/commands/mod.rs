pub mod config;
pub mod phase;
pub mod run;
pub mod scenes;

use restapp_core::Event;

/// Print one event as a JSON line on stdout.
pub(crate) fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

pub(crate) fn emit_all(events: &[Event]) -> Result<(), serde_json::Error> {
    events.iter().try_for_each(emit)
}
