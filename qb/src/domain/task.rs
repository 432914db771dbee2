//! Task domain type
//!
//! A unit of work on the board. Ids and EXP rewards are assigned by the authority.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Identity assigned by the authority on create
pub type TaskId = i64;

/// Board column / lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,
    /// In progress
    Doing,
    /// Finished; counts toward EXP on the authority side
    Done,
}

impl TaskStatus {
    /// All statuses in board column order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Doing, TaskStatus::Done];

    /// Wire name used in query parameters and JSON bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "TaskStatus::from_str: called");
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            other => Err(format!("Unknown status '{}'. Expected one of: todo, doing, done", other)),
        }
    }
}

/// A task as returned by the authority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Authority-assigned identity
    pub id: TaskId,

    /// Short title shown on the card
    pub title: String,

    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,

    /// Current board column
    pub status: TaskStatus,

    /// EXP reward granted when the task is done
    pub exp: u32,

    /// Creation timestamp as sent by the authority (not interpreted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub status: TaskStatus,
}

impl NewTask {
    /// A new task in the `todo` column
    pub fn todo(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("todo".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        assert_eq!(" Doing ".parse::<TaskStatus>().unwrap(), TaskStatus::Doing);
        assert_eq!("DONE".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_deserialize_authority_task() {
        let json = r#"{
            "id": 7,
            "title": "Write report",
            "description": null,
            "status": "todo",
            "exp": 20,
            "created_at": "2024-05-01T10:00:00"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.exp, 20);
        assert!(task.description.is_none());
        assert!(!task.is_done());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{"id": 1, "title": "x", "status": "blocked", "exp": 10}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_new_task_body_omits_missing_description() {
        let body = serde_json::to_value(NewTask::todo("Write report")).unwrap();
        assert_eq!(body["title"], "Write report");
        assert_eq!(body["status"], "todo");
        assert!(body.get("description").is_none());

        let body = serde_json::to_value(NewTask::todo("a").with_description("b")).unwrap();
        assert_eq!(body["description"], "b");
    }
}
