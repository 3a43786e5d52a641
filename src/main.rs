//! # tasks - a terminal task list
//!
//! A small, in-memory task list with an interactive terminal UI.
//!
//! ## Key Features
//!
//! - **Add, edit, complete, delete**: tasks carry a title, a free-form description
//!   and a pending/completed status
//! - **Detail screen**: open any row to see all of its fields, then go back
//! - **Confirmed deletes**: removing a task always asks first
//! - **Seed files**: start from a JSON list instead of the starter tasks
//!
//! Nothing is persisted. Every run starts from the starter tasks, an empty list
//! (`--empty`), or a seed file (`--seed tasks.json`), and changes are lost on exit.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the UI
//! tasks
//!
//! # Print the starting list
//! tasks list --status pending
//!
//! # Show one task
//! tasks view 2
//! ```
//!
//! Logs go to `<data dir>/tasks/tasks.log` so they never draw over the UI.
//! `RUST_LOG` overrides the configured level.

use std::fs::OpenOptions;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod fields;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let _guard = init_logging(&config);

    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let store = match load_store(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "failed to load starting tasks");
            eprintln!("Failed to load tasks: {e}");
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(store, &config),
        Commands::List { status, json } => cmd_list(&store, status, json),
        Commands::View { id } => cmd_view(&store, id),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}

/// Route `tracing` output to the log file.
///
/// Returns `None` (logging disabled) when the log file cannot be opened; the
/// guard must be held until exit so buffered lines are flushed.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let path = config.log_path()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    tracing::debug!(path = %path.display(), "logging initialised");
    Some(guard)
}
