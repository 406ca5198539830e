use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{EventCommands, PhaseCommands, PlantCommands};

/// Main command-line interface for the Verdant cultivation tracker
///
/// Verdant tracks plants through their growth phases. Each plant carries an
/// ordered phase sequence with expected durations; starting phases moves the
/// plant along its timeline, and care events (watering, feeding, ...) are
/// logged against the phase they happened in.
#[derive(Parser)]
#[command(version, about, name = "vd")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/verdant/verdant.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Verdant CLI
///
/// The CLI is organized into three main command categories:
/// - `plant`: Operations on whole plants (create, list, show, archive, etc.)
/// - `phase`: Operations on a plant's phase sequence
/// - `event`: The care event log
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plants
    #[command(alias = "p")]
    Plant {
        #[command(subcommand)]
        command: PlantCommands,
    },
    /// Manage a plant's growth phases
    #[command(alias = "ph")]
    Phase {
        #[command(subcommand)]
        command: PhaseCommands,
    },
    /// Record and inspect care events
    #[command(alias = "e")]
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
}
