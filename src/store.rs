//! Task store and display helpers.
//!
//! This module provides the `TaskStore` that owns the ordered task collection
//! and the single in-flight edit draft, along with formatting helpers shared by
//! the CLI and the TUI.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::fields::*;
use crate::task::{EditDraft, Task, TaskId};

const EMPTY_TITLE: &str = "Task title cannot be empty!";

/// Errors raised by store operations. A failed operation never mutates the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Title is empty after trimming.
    #[error("{0}")]
    Validation(String),
    /// The referenced task (or edit draft) does not exist.
    #[error("{0} not found")]
    NotFound(String),
}

impl StoreError {
    /// Short heading used when the error is shown to the user.
    pub fn heading(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "Validation Error",
            StoreError::NotFound(_) => "Not Found",
        }
    }
}

/// Errors raised while loading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("seed file contains duplicate task id {0}")]
    DuplicateId(TaskId),
    #[error("seed task {0} has an empty title")]
    EmptyTitle(TaskId),
}

/// In-memory store for the task list.
///
/// Tasks keep insertion order. At most one `EditDraft` exists at a time.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    draft: Option<EditDraft>,
}

impl TaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing list, keeping its order.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks, draft: None }
    }

    /// A store holding the five starter tasks shown on first launch.
    pub fn with_demo_tasks() -> Self {
        let now = now_utc();
        let demo = [
            ("Learn the Basics", "Read the documentation and understand the building blocks.", Status::Completed),
            ("Design Task List UI", "Sketch out the layout and elements for the task list screen.", Status::Pending),
            ("Implement Add Task Feature", "Create a form to add new tasks and connect it to state.", Status::Pending),
            ("Set Up Navigation", "Move between the list and the detail screen.", Status::Pending),
            ("Refactor Code for Readability", "Improve code organization and use meaningful names.", Status::Pending),
        ];
        let tasks = demo
            .iter()
            .enumerate()
            .map(|(i, (title, description, status))| Task {
                id: TaskId(i as u64 + 1),
                title: title.to_string(),
                description: description.to_string(),
                status: *status,
                created_at_utc: now,
                updated_at_utc: now,
            })
            .collect();
        Self::from_tasks(tasks)
    }

    /// Load the initial task list from a JSON seed file.
    ///
    /// The file is only ever read. Ids must be unique and titles non-blank;
    /// missing timestamps are filled with the current time.
    pub fn load_seed(path: &Path) -> Result<Self, SeedError> {
        let mut buf = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .map_err(|source| SeedError::Read { path: path.to_path_buf(), source })?;
        let mut tasks: Vec<Task> = serde_json::from_str(&buf)
            .map_err(|source| SeedError::Parse { path: path.to_path_buf(), source })?;

        let now = now_utc();
        let mut seen = HashSet::new();
        for t in tasks.iter_mut() {
            if !seen.insert(t.id) {
                return Err(SeedError::DuplicateId(t.id));
            }
            let title = t.title.trim();
            if title.is_empty() {
                return Err(SeedError::EmptyTitle(t.id));
            }
            t.title = title.to_string();
            if t.created_at_utc == 0 {
                t.created_at_utc = now;
            }
            if t.updated_at_utc == 0 {
                t.updated_at_utc = t.created_at_utc;
            }
        }
        info!(path = %path.display(), count = tasks.len(), "loaded seed tasks");
        Ok(Self::from_tasks(tasks))
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of pending and completed tasks.
    pub fn counts(&self) -> (usize, usize) {
        let completed = self.tasks.iter().filter(|t| t.status.is_completed()).count();
        (self.tasks.len() - completed, completed)
    }

    /// Generate the next available task ID: one past the largest, or 1 when empty.
    pub fn next_id(&self) -> TaskId {
        self.tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(TaskId(1), TaskId::next)
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// The active edit draft, if any.
    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    /// Append a new pending task.
    pub fn add(&mut self, title: &str, description: &str) -> Result<&[Task], StoreError> {
        let title = title.trim();
        if title.is_empty() {
            warn!("rejected add: empty title");
            return Err(StoreError::Validation(EMPTY_TITLE.to_string()));
        }

        let now = now_utc();
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            status: Status::Pending,
            created_at_utc: now,
            updated_at_utc: now,
        });
        info!(%id, "added task");
        Ok(&self.tasks)
    }

    /// Flip the status of a task. Unknown ids are ignored.
    pub fn toggle_status(&mut self, id: TaskId) -> &[Task] {
        match self.get_mut(id) {
            Some(task) => {
                task.status = task.status.toggled();
                task.updated_at_utc = now_utc();
                info!(%id, status = task.status.as_param(), "toggled task");
            }
            None => debug!(%id, "toggle ignored: no such task"),
        }
        &self.tasks
    }

    /// Remove a task. Unknown ids are ignored.
    ///
    /// Callers are expected to have confirmed the deletion with the user.
    pub fn remove(&mut self, id: TaskId) -> &[Task] {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            debug!(%id, "remove ignored: no such task");
        } else {
            info!(%id, "removed task");
            if self.draft.as_ref().is_some_and(|d| d.task_id == id) {
                self.draft = None;
            }
        }
        &self.tasks
    }

    /// Start editing a task, replacing any draft already in progress.
    pub fn begin_edit(&mut self, id: TaskId) -> Result<&EditDraft, StoreError> {
        let Some(task) = self.get(id) else {
            warn!(%id, "rejected edit: no such task");
            return Err(StoreError::NotFound(format!("task {}", id)));
        };
        let draft = EditDraft::from_task(task);
        debug!(%id, "edit started");
        Ok(&*self.draft.insert(draft))
    }

    /// Commit the active draft with the given title and description.
    ///
    /// On a validation failure nothing changes and the draft stays active. Only
    /// `title`, `description` and the update timestamp of the task are touched.
    pub fn commit_edit(&mut self, title: &str, description: &str) -> Result<&[Task], StoreError> {
        let Some(task_id) = self.draft.as_ref().map(|d| d.task_id) else {
            warn!("rejected commit: no edit in progress");
            return Err(StoreError::NotFound("edit draft".to_string()));
        };

        let title = title.trim();
        if title.is_empty() {
            warn!(id = %task_id, "rejected commit: empty title");
            return Err(StoreError::Validation(EMPTY_TITLE.to_string()));
        }

        self.draft = None;
        let Some(task) = self.get_mut(task_id) else {
            warn!(id = %task_id, "rejected commit: task no longer exists");
            return Err(StoreError::NotFound(format!("task {}", task_id)));
        };
        task.title = title.to_string();
        task.description = description.to_string();
        task.updated_at_utc = now_utc();
        info!(id = %task_id, "edited task");
        Ok(&self.tasks)
    }

    /// Discard the active draft without touching any task.
    pub fn cancel_edit(&mut self) {
        if let Some(draft) = self.draft.take() {
            debug!(id = %draft.task_id, "edit cancelled");
        }
    }
}

fn now_utc() -> i64 {
    Utc::now().timestamp()
}

/// Format a unix timestamp in local time, or `-` when unset.
pub fn format_timestamp(ts: i64) -> String {
    if ts == 0 {
        return "-".into();
    }
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".into(),
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!("{:<5} {:<10} {:<32} {}", "ID", "Status", "Title", "Description");
    for t in tasks {
        println!(
            "{:<5} {:<10} {:<32} {}",
            t.id,
            format_status(t.status),
            truncate(&t.title, 32),
            truncate(&t.description, 48)
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn task(id: u64, title: &str) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            description: String::new(),
            status: Status::Pending,
            created_at_utc: 1,
            updated_at_utc: 1,
        }
    }

    fn store_with_ids(ids: &[u64]) -> TaskStore {
        TaskStore::from_tasks(ids.iter().map(|&i| task(i, &format!("task {}", i))).collect())
    }

    fn ids(store: &TaskStore) -> Vec<u64> {
        store.tasks().iter().map(|t| t.id.0).collect()
    }

    fn temp_seed(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tasks-seed-{}-{}.json", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_add_to_empty_store_starts_at_one() {
        let mut store = TaskStore::new();
        let tasks = store.add("First", "").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, TaskId(1));
        assert_eq!(tasks[0].status, Status::Pending);
    }

    #[test]
    fn test_add_uses_max_id_not_length() {
        let mut store = store_with_ids(&[1, 2, 3, 5]);
        store.add("Next", "desc").unwrap();
        assert_eq!(ids(&store), vec![1, 2, 3, 5, 6]);
        assert_eq!(store.get(TaskId(6)).unwrap().description, "desc");
    }

    #[test]
    fn test_add_does_not_reuse_removed_max_id_gap() {
        let mut store = store_with_ids(&[1, 2, 3]);
        store.remove(TaskId(2));
        store.add("Again", "").unwrap();
        assert_eq!(ids(&store), vec![1, 3, 4]);
    }

    #[test]
    fn test_add_trims_title_keeps_description() {
        let mut store = TaskStore::new();
        store.add("  Buy milk  ", "  two litres ").unwrap();
        let t = &store.tasks()[0];
        assert_eq!(t.title, "Buy milk");
        assert_eq!(t.description, "  two litres ");
    }

    #[test]
    fn test_add_blank_title_is_rejected_without_change() {
        let mut store = store_with_ids(&[1, 2]);
        let err = store.add("   \t ", "ignored").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.heading(), "Validation Error");
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_toggle_twice_restores_status() {
        let mut store = store_with_ids(&[1, 2]);
        store.toggle_status(TaskId(2));
        assert_eq!(store.get(TaskId(2)).unwrap().status, Status::Completed);
        assert_eq!(store.get(TaskId(1)).unwrap().status, Status::Pending);
        store.toggle_status(TaskId(2));
        assert_eq!(store.get(TaskId(2)).unwrap().status, Status::Pending);
    }

    #[test]
    fn test_toggle_missing_id_is_noop() {
        let mut store = store_with_ids(&[1, 2]);
        let before = store.tasks().to_vec();
        let after = store.toggle_status(TaskId(9)).to_vec();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_present_and_absent() {
        let mut store = store_with_ids(&[1, 2, 3]);
        assert_eq!(store.remove(TaskId(2)).len(), 2);
        assert!(store.get(TaskId(2)).is_none());
        assert_eq!(ids(&store), vec![1, 3]);

        let before = store.tasks().to_vec();
        assert_eq!(store.remove(TaskId(2)), before.as_slice());
    }

    #[test]
    fn test_begin_edit_prepopulates_draft() {
        let mut store = store_with_ids(&[1, 2]);
        let draft = store.begin_edit(TaskId(2)).unwrap();
        assert_eq!(draft.task_id, TaskId(2));
        assert_eq!(draft.title, "task 2");
        assert!(store.draft().is_some());
    }

    #[test]
    fn test_begin_edit_missing_is_not_found() {
        let mut store = store_with_ids(&[1]);
        let err = store.begin_edit(TaskId(4)).unwrap_err();
        assert_eq!(err, StoreError::NotFound("task 4".into()));
        assert!(store.draft().is_none());
    }

    #[test]
    fn test_begin_edit_replaces_previous_draft() {
        let mut store = store_with_ids(&[1, 2]);
        store.begin_edit(TaskId(1)).unwrap();
        store.begin_edit(TaskId(2)).unwrap();
        assert_eq!(store.draft().unwrap().task_id, TaskId(2));
    }

    #[test]
    fn test_commit_edit_updates_title_and_description_only() {
        let mut store = store_with_ids(&[1, 2]);
        store.toggle_status(TaskId(2));
        store.begin_edit(TaskId(2)).unwrap();
        store.commit_edit(" Renamed ", "new body").unwrap();

        let t = store.get(TaskId(2)).unwrap();
        assert_eq!(t.id, TaskId(2));
        assert_eq!(t.title, "Renamed");
        assert_eq!(t.description, "new body");
        assert_eq!(t.status, Status::Completed);
        assert_eq!(t.created_at_utc, 1);
        assert!(store.draft().is_none());
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_commit_edit_blank_title_keeps_task_and_draft() {
        let mut store = store_with_ids(&[1]);
        store.begin_edit(TaskId(1)).unwrap();
        let before = store.tasks().to_vec();
        let err = store.commit_edit("  ", "changed").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.tasks(), before.as_slice());
        assert!(store.draft().is_some());
    }

    #[test]
    fn test_commit_without_draft_is_not_found() {
        let mut store = store_with_ids(&[1]);
        let err = store.commit_edit("Title", "").unwrap_err();
        assert_eq!(err.heading(), "Not Found");
    }

    #[test]
    fn test_remove_discards_draft_of_removed_task() {
        let mut store = store_with_ids(&[1, 2]);
        store.begin_edit(TaskId(2)).unwrap();
        store.remove(TaskId(1));
        assert!(store.draft().is_some());
        store.remove(TaskId(2));
        assert!(store.draft().is_none());
        assert!(store.commit_edit("x", "").is_err());
    }

    #[test]
    fn test_cancel_edit_never_mutates() {
        let mut store = store_with_ids(&[1, 2, 3]);
        let before = store.tasks().to_vec();
        store.begin_edit(TaskId(3)).unwrap();
        store.cancel_edit();
        assert!(store.draft().is_none());
        assert_eq!(store.tasks(), before.as_slice());
        // Cancelling with no draft is harmless.
        store.cancel_edit();
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_demo_tasks() {
        let store = TaskStore::with_demo_tasks();
        assert_eq!(ids(&store), vec![1, 2, 3, 4, 5]);
        assert_eq!(store.counts(), (4, 1));
        assert_eq!(store.next_id(), TaskId(6));
    }

    #[test]
    fn test_load_seed_accepts_string_and_numeric_ids() {
        let path = temp_seed(
            "ok",
            r#"[
                {"id": "2", "title": " Water plants ", "description": "", "status": "completed"},
                {"id": 7, "title": "Call mum"}
            ]"#,
        );
        let store = TaskStore::load_seed(&path).unwrap();
        assert_eq!(ids(&store), vec![2, 7]);
        assert_eq!(store.tasks()[0].title, "Water plants");
        assert_eq!(store.tasks()[0].status, Status::Completed);
        assert!(store.tasks()[1].created_at_utc > 0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_seed_rejects_duplicates_and_blank_titles() {
        let dup = temp_seed("dup", r#"[{"id": "1", "title": "a"}, {"id": 1, "title": "b"}]"#);
        assert!(matches!(TaskStore::load_seed(&dup), Err(SeedError::DuplicateId(TaskId(1)))));
        std::fs::remove_file(dup).ok();

        let blank = temp_seed("blank", r#"[{"id": "3", "title": "   "}]"#);
        assert!(matches!(TaskStore::load_seed(&blank), Err(SeedError::EmptyTitle(TaskId(3)))));
        std::fs::remove_file(blank).ok();

        let bad = temp_seed("bad", r#"[{"id": "1", "title": "a", "status": "archived"}]"#);
        assert!(matches!(TaskStore::load_seed(&bad), Err(SeedError::Parse { .. })));
        std::fs::remove_file(bad).ok();
    }

    #[test]
    fn test_load_seed_missing_file() {
        let path = std::env::temp_dir().join("tasks-seed-does-not-exist.json");
        assert!(matches!(TaskStore::load_seed(&path), Err(SeedError::Read { .. })));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }

    #[test]
    fn test_format_timestamp_unset() {
        assert_eq!(format_timestamp(0), "-");
        assert_ne!(format_timestamp(1_700_000_000), "-");
    }

    proptest! {
        #[test]
        fn prop_next_id_is_one_past_max(raw in prop::collection::hash_set(1u64..10_000, 0..20)) {
            let mut list: Vec<u64> = raw.into_iter().collect();
            list.sort_unstable();
            let expected = list.iter().max().map_or(1, |m| m + 1);
            let mut store = store_with_ids(&list);
            let len = store.len();
            store.add("new", "").unwrap();
            prop_assert_eq!(store.len(), len + 1);
            prop_assert_eq!(store.tasks().last().unwrap().id, TaskId(expected));
        }

        #[test]
        fn prop_toggle_twice_is_identity(count in 1u64..10, pick in 0u64..12) {
            let list: Vec<u64> = (1..=count).collect();
            let mut store = store_with_ids(&list);
            let before: Vec<Status> = store.tasks().iter().map(|t| t.status).collect();
            store.toggle_status(TaskId(pick));
            store.toggle_status(TaskId(pick));
            let after: Vec<Status> = store.tasks().iter().map(|t| t.status).collect();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn prop_blank_titles_never_added(spaces in "[ \t\n]{0,8}") {
            let mut store = store_with_ids(&[1, 2]);
            prop_assert!(store.add(&spaces, "x").is_err());
            prop_assert_eq!(store.len(), 2);
        }
    }
}
