use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Task board CLI.
/// Storage defaults to ~/.taskboard/board.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tb", version, about = "Task board with categories and completion stats")]
pub struct Cli {
    /// Path to the JSON data file (file backend).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Path to config.toml. Defaults to the data directory's config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a throwaway in-memory store seeded with sample data.
    #[arg(long, global = true, conflicts_with = "db")]
    pub memory: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}
