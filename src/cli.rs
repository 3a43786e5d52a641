use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// In-memory task list with a terminal UI.
/// Nothing is written to disk; a JSON seed file can provide the starting tasks.
#[derive(Parser)]
#[command(name = "tasks", version, about = "Personal task list for the terminal")]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true, env = "TASKS_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON file with the starting task list (read only).
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    /// Start with an empty list instead of the starter tasks.
    #[arg(long, global = true)]
    pub empty: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, global = true, env = "TASKS_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
