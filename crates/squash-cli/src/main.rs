//! squash CLI - render and simulate the squash compressor/limiter on WAV files.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "squash")]
#[command(author, version, about = "squash compressor/limiter CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress or limit a WAV file offline
    Render(commands::render::RenderArgs),

    /// Stream a WAV file through realtime channel groups and report compression
    Simulate(commands::simulate::SimulateArgs),

    /// List factory presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
