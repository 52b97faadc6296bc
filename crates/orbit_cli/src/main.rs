//! Orbit CLI
//!
//! Replays scroll scenes against a headless progress ring and prints the
//! resulting progress, listener state and revealed blocks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orbit_ring::ProgressCanvasOptions;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod simulate;

use config::Scene;

#[derive(Parser)]
#[command(name = "orbit")]
#[command(version, about = "Scroll-driven circular progress ring simulator")]
struct Cli {
    /// Log lifecycle events (debug level) unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scene file (TOML, or JSON by extension)
    Simulate {
        /// Path to the scene file
        scene: PathBuf,

        /// Print steps as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the default component options as TOML
    Defaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate { scene, json } => {
            let loaded = Scene::load(&scene)?;
            let steps = simulate::run(&loaded)
                .with_context(|| format!("Failed to simulate {}", scene.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                print!("{}", simulate::format_table(&steps));
            }
        }
        Commands::Defaults => {
            let options = toml::to_string_pretty(&ProgressCanvasOptions::default())
                .context("Failed to serialize default options")?;
            print!("{options}");
        }
    }

    Ok(())
}
