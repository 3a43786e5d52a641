//! Command implementations for the CLI interface.
//!
//! Each subcommand works on a freshly built `TaskStore`; the interactive UI
//! is the only place the list changes, and nothing outlives the process.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::config::Config;
use crate::fields::*;
use crate::store::*;
use crate::task::{Task, TaskId};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (default).
    Ui,

    /// List the starting tasks.
    List {
        /// Only show tasks with this status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show every field of a single task.
    View {
        /// Task ID.
        id: TaskId,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Build the starting store: seed file if configured, else starter tasks or nothing.
pub fn load_store(config: &Config) -> Result<TaskStore, SeedError> {
    match &config.seed_file {
        Some(path) => TaskStore::load_seed(path),
        None if config.demo_tasks => Ok(TaskStore::with_demo_tasks()),
        None => Ok(TaskStore::new()),
    }
}

pub fn cmd_ui(store: TaskStore, config: &Config) {
    if let Err(e) = run_tui(store, config) {
        tracing::error!(error = %e, "ui exited with an error");
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

pub fn cmd_list(store: &TaskStore, status: Option<Status>, json: bool) {
    let tasks: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .collect();

    if json {
        match serde_json::to_string_pretty(&tasks) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Failed to encode tasks: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    print_table(&tasks);
    let (pending, completed) = store.counts();
    println!("\n{} pending, {} completed", pending, completed);
}

pub fn cmd_view(store: &TaskStore, id: TaskId) {
    let Some(t) = store.get(id) else {
        eprintln!("Task with ID {} not found", id);
        std::process::exit(1);
    };
    for line in detail_lines(t) {
        println!("{line}");
    }
}

/// Plain-text field listing shared by `view`.
pub fn detail_lines(t: &Task) -> Vec<String> {
    vec![
        format!("ID:          {}", t.id),
        format!("Title:       {}", t.title),
        format!("Status:      {}", format_status(t.status)),
        format!("Created:     {}", format_timestamp(t.created_at_utc)),
        format!("Updated:     {}", format_timestamp(t.updated_at_utc)),
        String::new(),
        "Description:".to_string(),
        if t.description.is_empty() { "-".to_string() } else { t.description.clone() },
    ]
}

pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_prefers_demo_then_empty() {
        let demo = load_store(&Config::default()).unwrap();
        assert_eq!(demo.len(), 5);

        let empty = load_store(&Config { demo_tasks: false, ..Config::default() }).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_load_store_reports_bad_seed() {
        let config = Config {
            seed_file: Some(std::env::temp_dir().join("tasks-no-such-seed.json")),
            ..Config::default()
        };
        assert!(load_store(&config).is_err());
    }

    #[test]
    fn test_detail_lines_show_placeholder_for_empty_description() {
        let mut store = TaskStore::new();
        store.add("Plan trip", "").unwrap();
        let lines = detail_lines(&store.tasks()[0]);
        assert_eq!(lines[0], "ID:          1");
        assert_eq!(lines[2], "Status:      Pending");
        assert_eq!(lines.last().unwrap(), "-");
    }
}
