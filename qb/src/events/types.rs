//! Event types for Questboard domain activity
//!
//! These events represent everything the presentation layer may react to:
//! - Task lifecycle (created, moved, deleted)
//! - Gamification (level up)
//! - Analysis jobs (started, succeeded, cancelled, failed)
//! - The user-visible error channel

use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisMode, JobId, Task, TaskId, TaskStatus};

/// Core event enum - the vocabulary of Questboard activity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // === Tasks ===
    /// The authority created a task
    TaskCreated { task: Task },
    /// The authority confirmed a status change
    TaskStatusChanged {
        id: TaskId,
        title: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    /// The authority acknowledged a delete
    TaskDeleted { id: TaskId, title: String },

    // === Gamification ===
    /// The fetched level is strictly greater than the held one
    LevelUp { level: u32, title: String },

    // === Analysis jobs ===
    /// A job entered `running`
    JobStarted {
        job_id: JobId,
        file_name: String,
        mode: AnalysisMode,
    },
    /// The current job produced a result
    JobSucceeded { job_id: JobId, action_items: usize },
    /// A running job was cancelled by the user or superseded
    JobCancelled { job_id: JobId, reason: CancelReason },
    /// The current job failed
    JobFailed { job_id: JobId, message: String },

    // === Errors ===
    /// Non-fatal, user-visible error (transport or validation)
    Error { context: String, message: String },
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TaskCreated { .. } => "TaskCreated",
            Event::TaskStatusChanged { .. } => "TaskStatusChanged",
            Event::TaskDeleted { .. } => "TaskDeleted",
            Event::LevelUp { .. } => "LevelUp",
            Event::JobStarted { .. } => "JobStarted",
            Event::JobSucceeded { .. } => "JobSucceeded",
            Event::JobCancelled { .. } => "JobCancelled",
            Event::JobFailed { .. } => "JobFailed",
            Event::Error { .. } => "Error",
        }
    }

    /// Job this event belongs to, if any
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Event::JobStarted { job_id, .. }
            | Event::JobSucceeded { job_id, .. }
            | Event::JobCancelled { job_id, .. }
            | Event::JobFailed { job_id, .. } => Some(*job_id),
            _ => None,
        }
    }

    /// True for events on the user-visible error channel
    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error { .. } | Event::JobFailed { .. })
    }
}

/// Why a running job was cancelled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// Explicit user cancellation
    User,
    /// A newer job was started
    Superseded,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "cancelled"),
            Self::Superseded => write!(f, "replaced by a newer request"),
        }
    }
}
