use clap::Args;
use std::path::PathBuf;

use restapp_core::Config;

use crate::host::discover_scenes;

#[derive(Args)]
pub struct ScenesArgs {
    /// Scenes directory (defaults to the configured one)
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Print the registry as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ScenesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => Config::load()?.scenes_dir()?,
    };
    let registry = discover_scenes(&dir)?;

    if args.json {
        let scenes: Vec<_> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&scenes)?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("no scenes in {}", dir.display());
        return Ok(());
    }
    for scene in registry.iter() {
        let tap = if scene.tap_audio.is_some() { "tap" } else { "-" };
        println!("{:<16} {:<4} {}", scene.id, tap, scene.loop_audio);
    }
    Ok(())
}
