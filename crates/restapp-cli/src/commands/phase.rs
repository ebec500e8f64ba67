use clap::Args;
use serde::Serialize;

use restapp_core::{BreathingPhase, Config};

#[derive(Args)]
pub struct PhaseArgs {
    /// Seconds since the breathing overlay appeared
    elapsed: f64,
    /// Shorter side of the animated element, in pixels
    #[arg(long, default_value = "240")]
    size: f64,
}

#[derive(Serialize)]
struct PhaseReport {
    #[serde(flatten)]
    phase: BreathingPhase,
    radius_px: f64,
}

pub fn run(args: PhaseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cycle = Config::load_or_default().breathing_cycle();
    let phase = cycle.phase_at(args.elapsed);
    let report = PhaseReport {
        phase,
        radius_px: phase.radius(args.size),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
