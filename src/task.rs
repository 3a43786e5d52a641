//! Task data structure and related functionality.
//!
//! This module defines the `Task` struct that represents a single work item,
//! its identifier type, and the `EditDraft` used while a task is being edited.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::fields::Status;

/// Numeric task identifier.
///
/// Serialized as a string (`"3"`); deserialization also accepts a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl TaskId {
    /// The id that follows this one.
    pub fn next(self) -> Self {
        TaskId(self.0 + 1)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(TaskId)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(TaskId(n)),
            Raw::Text(s) => s
                .parse()
                .map_err(|_| D::Error::custom(format!("task id '{}' is not a number", s))),
        }
    }
}

/// A unit of work with a title, a free-form description and a completion status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub created_at_utc: i64,
    #[serde(default)]
    pub updated_at_utc: i64,
}

/// Working copy of a task's editable fields.
///
/// Only `title` and `description` are editable; status changes go through
/// toggling, never through an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub task_id: TaskId,
    pub title: String,
    pub description: String,
}

impl EditDraft {
    /// Create a draft pre-populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_accepts_string_or_number() {
        let a: TaskId = serde_json::from_str("\"7\"").unwrap();
        let b: TaskId = serde_json::from_str("7").unwrap();
        assert_eq!(a, TaskId(7));
        assert_eq!(a, b);
        assert!(serde_json::from_str::<TaskId>("\"seven\"").is_err());
    }

    #[test]
    fn test_task_id_serializes_as_string() {
        assert_eq!(serde_json::to_string(&TaskId(12)).unwrap(), "\"12\"");
        assert_eq!("  4 ".parse::<TaskId>().unwrap(), TaskId(4));
    }

    #[test]
    fn test_task_defaults_missing_fields() {
        let t: Task = serde_json::from_str(r#"{"id": "1", "title": "Write docs"}"#).unwrap();
        assert_eq!(t.description, "");
        assert_eq!(t.status, Status::Pending);
        assert_eq!(t.created_at_utc, 0);
    }

    #[test]
    fn test_draft_copies_editable_fields() {
        let t = Task {
            id: TaskId(3),
            title: "Ship".into(),
            description: "v1".into(),
            status: Status::Completed,
            created_at_utc: 1,
            updated_at_utc: 1,
        };
        let d = EditDraft::from_task(&t);
        assert_eq!(d.task_id, TaskId(3));
        assert_eq!(d.title, "Ship");
        assert_eq!(d.description, "v1");
    }
}
