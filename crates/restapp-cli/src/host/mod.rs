//! Collaborators the CLI supplies to the session controller.

pub mod discovery;
pub mod playback;
pub mod system;

pub use discovery::discover_scenes;
pub use playback::ConsolePlayback;
pub use system::{DryRunActions, SystemActions};
