//! Task store error types

use thiserror::Error;

use crate::domain::TaskId;
use crate::gateway::GatewayError;

/// Failures of task store operations
#[derive(Debug, Error)]
pub enum TaskError {
    /// Rejected locally, no request was made
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Unknown column '{0}'. Expected one of: todo, doing, done")]
    UnknownColumn(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_error_messages() {
        assert_eq!(TaskError::NotFound(3).to_string(), "Task 3 not found");
        assert_eq!(
            TaskError::UnknownColumn("later".to_string()).to_string(),
            "Unknown column 'later'. Expected one of: todo, doing, done"
        );
    }

    #[test]
    fn test_gateway_error_is_transparent() {
        let err: TaskError = GatewayError::Api {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API error 500: boom");
    }
}
