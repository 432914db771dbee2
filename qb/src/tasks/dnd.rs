//! Drag-and-drop surface of the board

use async_trait::async_trait;
use tracing::debug;

use super::{TaskError, TaskStore};
use crate::domain::{Task, TaskId, TaskStatus};

/// Something a task card can be dropped onto
#[async_trait]
pub trait DropTarget: Send + Sync {
    /// Move `task_id` into the column named `target_column`
    async fn on_drop(&self, task_id: TaskId, target_column: &str) -> Result<Task, TaskError>;
}

/// Parse a column name into the status it represents
pub fn parse_column(column: &str) -> Result<TaskStatus, TaskError> {
    column
        .parse::<TaskStatus>()
        .map_err(|_| TaskError::UnknownColumn(column.to_string()))
}

#[async_trait]
impl DropTarget for TaskStore {
    async fn on_drop(&self, task_id: TaskId, target_column: &str) -> Result<Task, TaskError> {
        debug!(%task_id, %target_column, "on_drop: called");
        let status = parse_column(target_column)?;
        self.set_status(task_id, status).await
    }
}
