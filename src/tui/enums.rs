//! Enumerations for TUI state management.

use crate::fields::Status;
use crate::store::format_timestamp;
use crate::task::Task;

/// Screen currently shown by the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    TaskList,
    TaskDetail,
    EditTask,
    Confirm,
    Alert,
    Help,
}

/// Which part of the list screen receives key presses.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Focus {
    Title,
    Description,
    List,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Title => Focus::Description,
            Focus::Description => Focus::List,
            Focus::List => Focus::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Title => Focus::List,
            Focus::Description => Focus::Title,
            Focus::List => Focus::Description,
        }
    }
}

/// Navigation parameters handed to the detail screen.
///
/// Captured as strings when the row is opened; the detail screen only echoes
/// them back and never looks the task up again.
#[derive(Clone, PartialEq, Debug)]
pub struct DetailParams {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created: String,
}

impl DetailParams {
    pub fn from_task(task: &Task) -> Self {
        DetailParams {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.as_param().to_string(),
            created: format_timestamp(task.created_at_utc),
        }
    }

    /// Status parameter decoded back into a `Status`.
    pub fn status(&self) -> Status {
        Status::from_param(&self.status)
    }
}

/// A blocking notification shown over the current screen.
#[derive(Clone, PartialEq, Debug)]
pub struct Alert {
    pub heading: String,
    pub message: String,
}
