use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod host;

#[derive(Parser)]
#[command(name = "restapp", version, about = "RestApp sleep timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sleep-timer session (reads commands from stdin)
    Run(commands::run::RunArgs),
    /// List scenes found in the scenes directory
    Scenes(commands::scenes::ScenesArgs),
    /// Print the breathing phase for an elapsed time
    Phase(commands::phase::PhaseArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let debug_enabled = std::env::var("RESTAPP_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Scenes(args) => commands::scenes::run(args),
        Commands::Phase(args) => commands::phase::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
