//! Verdant CLI Application
//!
//! Command-line interface for the verdant cultivation tracking tool.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use verdant_core::{params::ListPlants, TrackerBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args { database_file, no_color, command } = Args::parse();

    let mut builder = TrackerBuilder::new();
    if let Some(path) = database_file {
        builder = builder.with_database_path(path);
    }
    let tracker = builder
        .build()
        .await
        .context("Failed to initialize tracker")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Verdant started");

    match command {
        Some(Plant { command }) => {
            Cli::new(tracker, renderer)
                .handle_plant_command(command)
                .await
        }
        Some(Phase { command }) => {
            Cli::new(tracker, renderer)
                .handle_phase_command(command)
                .await
        }
        Some(Event { command }) => {
            Cli::new(tracker, renderer)
                .handle_event_command(command)
                .await
        }
        None => {
            Cli::new(tracker, renderer)
                .list_plants(&ListPlants { archived: false })
                .await
        }
    }
}
