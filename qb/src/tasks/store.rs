//! TaskStore - local task cache kept consistent with the authority
//!
//! Status changes are applied to the cache before the request settles.
//! Everything else round-trips first. Reconciliation is always a full
//! refetch, never a field merge.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::TaskError;
use crate::domain::{NewTask, Task, TaskId, TaskStatus};
use crate::events::EventEmitter;
use crate::gateway::{Gateway, GatewayError};
use crate::state::StateManager;
use crate::stats::StatsMonitor;

/// User confirmation before a destructive delete
pub trait ConfirmDelete: Send + Sync {
    fn confirm(&self, task: &Task) -> bool;
}

impl<F> ConfirmDelete for F
where
    F: Fn(&Task) -> bool + Send + Sync,
{
    fn confirm(&self, task: &Task) -> bool {
        self(task)
    }
}

/// Owner of the task cache
#[derive(Clone)]
pub struct TaskStore {
    gateway: Arc<dyn Gateway>,
    state: StateManager,
    events: EventEmitter,
    stats: StatsMonitor,
}

impl TaskStore {
    pub fn new(gateway: Arc<dyn Gateway>, state: StateManager, events: EventEmitter, stats: StatsMonitor) -> Self {
        Self {
            gateway,
            state,
            events,
            stats,
        }
    }

    /// Cached tasks in authority order
    pub fn list(&self) -> Vec<Task> {
        self.state.tasks()
    }

    /// Replace the cache with the authority's list
    pub async fn reload(&self) -> Result<Vec<Task>, TaskError> {
        debug!("reload: called");
        let tasks = self.gateway.list_tasks().await?;
        debug!(count = tasks.len(), "reload: fetched tasks");
        self.state.replace_tasks(tasks.clone());
        Ok(tasks)
    }

    pub async fn create(&self, title: &str) -> Result<Task, TaskError> {
        self.create_with_description(title, None).await
    }

    /// Create a task through the authority, then refresh the cache
    ///
    /// Nothing is appended locally: the new task appears once the authority
    /// has assigned its id and EXP.
    pub async fn create_with_description(&self, title: &str, description: Option<&str>) -> Result<Task, TaskError> {
        debug!(%title, has_description = description.is_some(), "create_with_description: called");
        let title = title.trim();
        if title.is_empty() {
            let err = TaskError::Validation("Task title cannot be empty".to_string());
            self.events.error("create task", &err.to_string());
            return Err(err);
        }

        let mut new_task = NewTask::todo(title);
        if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
            new_task = new_task.with_description(description);
        }

        let created = match self.gateway.create_task(new_task).await {
            Ok(task) => task,
            Err(e) => {
                warn!(error = %e, "create_with_description: create failed");
                self.events.error("create task", &e.to_string());
                return Err(e.into());
            }
        };
        info!(id = created.id, exp = created.exp, "create_with_description: task created");
        self.events.task_created(&created);

        self.reload_or_report().await;
        self.refresh_stats().await;
        Ok(created)
    }

    /// Turn an analysis action item into a new `todo` task
    pub async fn accept_action_item(&self, item: &str) -> Result<Task, TaskError> {
        debug!(%item, "accept_action_item: called");
        self.create(item).await
    }

    /// Move a task to another column
    ///
    /// The cache shows `status` as soon as this is called. If the authority
    /// rejects the change, the cache is rebuilt from a fresh list.
    pub async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, TaskError> {
        debug!(%id, %status, "set_status: called");
        let Some(current) = self.state.task(id) else {
            debug!(%id, "set_status: not in cache");
            return Err(TaskError::NotFound(id));
        };
        if current.status == status {
            debug!(%id, %status, "set_status: already in column, nothing to do");
            return Ok(current);
        }

        // Optimistic write; `from` is whatever the cache showed at issue time
        let from = self.state.set_task_status(id, status).map(|t| t.status).unwrap_or(current.status);

        match self.gateway.update_status(id, status).await {
            Ok(updated) => {
                info!(%id, %from, to = %updated.status, "set_status: confirmed");
                self.events.task_status_changed(&updated, from);
                self.refresh_stats().await;
                Ok(updated)
            }
            Err(e) => {
                warn!(%id, error = %e, "set_status: update failed, rolling back");
                self.events.error("update task", &e.to_string());
                self.rollback(&e).await;
                Err(e.into())
            }
        }
    }

    /// Delete a task after the user confirms
    ///
    /// Returns `Ok(false)` when the user declines.
    pub async fn remove(&self, id: TaskId, confirm: &dyn ConfirmDelete) -> Result<bool, TaskError> {
        debug!(%id, "remove: called");
        let Some(task) = self.state.task(id) else {
            return Err(TaskError::NotFound(id));
        };
        if !confirm.confirm(&task) {
            debug!(%id, "remove: declined");
            return Ok(false);
        }

        if let Err(e) = self.gateway.delete_task(id).await {
            if e.is_not_found() {
                warn!(%id, "remove: task already gone on authority");
            } else {
                warn!(%id, error = %e, "remove: delete failed");
            }
            self.events.error("delete task", &e.to_string());
            self.reload_or_report().await;
            return Err(e.into());
        }

        self.state.remove_task(id);
        info!(%id, title = %task.title, "remove: deleted");
        self.events.task_deleted(id, &task.title);

        self.reload_or_report().await;
        self.refresh_stats().await;
        Ok(true)
    }

    async fn rollback(&self, cause: &GatewayError) {
        debug!(%cause, "rollback: called");
        if let Err(e) = self.reload().await {
            // Cache keeps the optimistic value until the next successful fetch
            warn!(error = %e, "rollback: refetch failed");
            self.events.error("reload tasks", &e.to_string());
        }
    }

    async fn reload_or_report(&self) {
        if let Err(e) = self.reload().await {
            warn!(error = %e, "reload_or_report: refetch failed");
            self.events.error("reload tasks", &e.to_string());
        }
    }

    async fn refresh_stats(&self) {
        if let Err(e) = self.stats.refresh().await {
            warn!(error = %e, "refresh_stats: stats refresh failed");
            self.events.error("refresh stats", &e.to_string());
        }
    }
}
