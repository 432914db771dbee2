//! Gateway trait definition

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::{AnalysisRequest, AnalysisResponse, NewTask, Task, TaskId, TaskStatus, UserStats};

/// Typed access to the remote task/stats/analysis authority
///
/// Implementations only shape requests and responses. They never keep a
/// copy of the task list: the Task Store owns the cache, the authority owns
/// the truth. Injected as `Arc<dyn Gateway>` so tests can swap in a fake.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch every task, in authority order
    async fn list_tasks(&self) -> Result<Vec<Task>, GatewayError>;

    /// Create a task; the authority assigns id and EXP
    async fn create_task(&self, task: NewTask) -> Result<Task, GatewayError>;

    /// Move a task to another column
    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, GatewayError>;

    /// Delete a task
    async fn delete_task(&self, id: TaskId) -> Result<(), GatewayError>;

    /// Fetch the current level/EXP snapshot
    async fn fetch_stats(&self) -> Result<UserStats, GatewayError>;

    /// Run one audio analysis (long-running)
    ///
    /// Callers cancel by dropping the returned future.
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, GatewayError>;
}
