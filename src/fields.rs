//! Enumerations and field types for tasks.
//!
//! Task status is a closed two-state type; there is no way to represent a
//! third state, in memory or in a seed file.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task completion status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Completed")]
    Completed,
}

impl Status {
    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            Status::Pending => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Status::Completed
    }

    /// Parse a navigation parameter. Anything other than `completed` is pending.
    pub fn from_param(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("completed") {
            Status::Completed
        } else {
            Status::Pending
        }
    }

    /// Lowercase wire form, as used in seed files and navigation parameters.
    pub fn as_param(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }
}

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::Completed => "Completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_involution() {
        assert_eq!(Status::Pending.toggled(), Status::Completed);
        assert_eq!(Status::Completed.toggled(), Status::Pending);
        assert_eq!(Status::Pending.toggled().toggled(), Status::Pending);
    }

    #[test]
    fn test_from_param_defaults_to_pending() {
        assert_eq!(Status::from_param("completed"), Status::Completed);
        assert_eq!(Status::from_param("Completed"), Status::Completed);
        assert_eq!(Status::from_param("pending"), Status::Pending);
        assert_eq!(Status::from_param("done"), Status::Pending);
        assert_eq!(Status::from_param(""), Status::Pending);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Status::Completed).unwrap(), "\"completed\"");
        let s: Status = serde_json::from_str("\"Pending\"").unwrap();
        assert_eq!(s, Status::Pending);
        assert!(serde_json::from_str::<Status>("\"archived\"").is_err());
    }
}
