//! StateManager - observable snapshot of everything the board shows
//!
//! Controllers mutate the snapshot through short synchronous closures;
//! presentation subscribes and re-renders on change.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::{AnalysisMode, AnalysisResult, JobId, SummaryLevel, Task, TaskId, TaskStatus, UserStats};

/// Lifecycle state of the analysis job slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// No job started yet, or the last one was reset
    #[default]
    Idle,
    /// Request in flight
    Running,
    /// User cancelled or superseded
    Cancelled,
    /// Result available
    Succeeded,
    /// Transport or server failure
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// What the UI knows about the current/last analysis job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobView {
    /// Job the state below belongs to
    pub job_id: Option<JobId>,
    pub state: JobState,
    pub file_name: Option<String>,
    pub mode: AnalysisMode,
    pub summary_level: SummaryLevel,
    /// Last successful result; only a newer success replaces it
    pub result: Option<AnalysisResult>,
    /// Message of the last failure
    pub error: Option<String>,
}

/// Full board snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Task cache in authority order
    pub tasks: Vec<Task>,
    /// Last fetched gamification stats
    pub stats: Option<UserStats>,
    /// Issue number of the fetch that produced `stats` (0 before the first)
    pub stats_seq: u64,
    pub job: JobView,
}

/// Result of offering a fetched stats snapshot to the state
#[derive(Debug, Clone, PartialEq)]
pub enum StatsSwap {
    /// First snapshot held
    Baseline,
    /// Snapshot replaced; carries the one it replaced
    Replaced(UserStats),
    /// A fetch issued later already landed; the snapshot was dropped
    Stale,
}

impl AppState {
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in one board column, keeping authority order
    pub fn column(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.status == status)
    }
}

/// Handle to the shared board snapshot
///
/// Every mutation runs under the channel's internal lock, so the cache has a
/// single writer at a time even when controllers run on different threads.
#[derive(Clone)]
pub struct StateManager {
    tx: Arc<watch::Sender<AppState>>,
    stats_issued: Arc<AtomicU64>,
}

impl StateManager {
    pub fn new() -> Self {
        debug!("StateManager::new: called");
        let (tx, _) = watch::channel(AppState::default());
        Self {
            tx: Arc::new(tx),
            stats_issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to snapshot changes (presentation layer)
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        debug!("StateManager::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Clone of the current snapshot
    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tx.borrow().tasks.clone()
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.tx.borrow().task(id).cloned()
    }

    pub fn stats(&self) -> Option<UserStats> {
        self.tx.borrow().stats.clone()
    }

    pub fn job(&self) -> JobView {
        self.tx.borrow().job.clone()
    }

    /// Mutate the snapshot; subscribers are notified only when `f` returns true
    pub fn modify(&self, f: impl FnOnce(&mut AppState) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    // === Task cache ===

    /// Replace the whole cache with an authoritative list
    pub fn replace_tasks(&self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "replace_tasks: called");
        self.modify(|state| {
            if state.tasks == tasks {
                return false;
            }
            state.tasks = tasks;
            true
        });
    }

    /// Overwrite one task's status, returning the task as it was before
    pub fn set_task_status(&self, id: TaskId, status: TaskStatus) -> Option<Task> {
        debug!(%id, %status, "set_task_status: called");
        let mut previous = None;
        self.modify(|state| match state.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                previous = Some(task.clone());
                let changed = task.status != status;
                task.status = status;
                changed
            }
            None => false,
        });
        previous
    }

    /// Drop one task from the cache
    pub fn remove_task(&self, id: TaskId) -> Option<Task> {
        debug!(%id, "remove_task: called");
        let mut removed = None;
        self.modify(|state| match state.tasks.iter().position(|t| t.id == id) {
            Some(idx) => {
                removed = Some(state.tasks.remove(idx));
                true
            }
            None => false,
        });
        removed
    }

    // === Stats ===

    /// Reserve the issue number for a stats fetch about to be sent
    pub fn issue_stats_fetch(&self) -> u64 {
        self.stats_issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Offer the snapshot produced by fetch `seq`
    ///
    /// Snapshots are held in issue order: a response from a fetch issued
    /// before the held one is dropped. The compare-and-replace happens in one
    /// step, so concurrent callers each see a distinct predecessor.
    pub fn swap_stats(&self, seq: u64, stats: UserStats) -> StatsSwap {
        debug!(seq, level = stats.level, "swap_stats: called");
        let mut outcome = StatsSwap::Stale;
        self.modify(|state| {
            if seq <= state.stats_seq {
                return false;
            }
            state.stats_seq = seq;
            let changed = state.stats.as_ref() != Some(&stats);
            outcome = match state.stats.replace(stats) {
                Some(prev) => StatsSwap::Replaced(prev),
                None => StatsSwap::Baseline,
            };
            changed
        });
        outcome
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: TaskId, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            description: None,
            status,
            exp: 20,
            created_at: None,
        }
    }

    #[test]
    fn test_replace_and_query_tasks() {
        let state = StateManager::new();
        state.replace_tasks(vec![task(2, TaskStatus::Todo), task(1, TaskStatus::Done)]);

        // Authority order is kept, not re-sorted
        let ids: Vec<TaskId> = state.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(state.task(1).unwrap().status, TaskStatus::Done);
        assert!(state.task(3).is_none());

        let snapshot = state.snapshot();
        assert_eq!(snapshot.column(TaskStatus::Todo).count(), 1);
        assert_eq!(snapshot.column(TaskStatus::Doing).count(), 0);
    }

    #[test]
    fn test_set_task_status_returns_previous() {
        let state = StateManager::new();
        state.replace_tasks(vec![task(1, TaskStatus::Todo)]);

        let previous = state.set_task_status(1, TaskStatus::Doing).unwrap();
        assert_eq!(previous.status, TaskStatus::Todo);
        assert_eq!(state.task(1).unwrap().status, TaskStatus::Doing);

        assert!(state.set_task_status(42, TaskStatus::Done).is_none());
    }

    #[test]
    fn test_remove_task() {
        let state = StateManager::new();
        state.replace_tasks(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Todo)]);

        assert_eq!(state.remove_task(1).unwrap().id, 1);
        assert!(state.remove_task(1).is_none());
        assert_eq!(state.tasks().len(), 1);
    }

    #[test]
    fn test_swap_stats_returns_predecessor() {
        let state = StateManager::new();
        let stats = |level| UserStats {
            level,
            total_exp: 0,
            next_level_exp_req: 100,
            progress_percentage: 0.0,
            title: String::new(),
        };

        assert_eq!(state.swap_stats(state.issue_stats_fetch(), stats(1)), StatsSwap::Baseline);
        assert_eq!(state.swap_stats(state.issue_stats_fetch(), stats(2)), StatsSwap::Replaced(stats(1)));
        assert_eq!(state.stats().unwrap().level, 2);
    }

    #[test]
    fn test_swap_stats_drops_older_fetch() {
        let state = StateManager::new();
        let stats = |level| UserStats {
            level,
            total_exp: 0,
            next_level_exp_req: 100,
            progress_percentage: 0.0,
            title: String::new(),
        };

        let early = state.issue_stats_fetch();
        let late = state.issue_stats_fetch();
        assert!(late > early);

        assert_eq!(state.swap_stats(late, stats(4)), StatsSwap::Baseline);
        assert_eq!(state.swap_stats(early, stats(3)), StatsSwap::Stale);
        assert_eq!(state.stats().unwrap().level, 4);
        assert_eq!(state.snapshot().stats_seq, late);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let state = StateManager::new();
        let mut rx = state.subscribe();

        state.replace_tasks(vec![task(1, TaskStatus::Todo)]);
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        // Same list again is not a change
        state.replace_tasks(vec![task(1, TaskStatus::Todo)]);
        assert!(!rx.has_changed().unwrap());

        state.set_task_status(1, TaskStatus::Done);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().tasks[0].status, TaskStatus::Done);
    }

    #[test]
    fn test_job_state_terminal() {
        assert!(!JobState::Idle.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }
}
