//! Event Bus - central pub/sub system for Questboard events
//!
//! The EventBus uses a tokio broadcast channel to deliver events to all
//! subscribers. Controllers emit, the side-effect dispatcher (and anything
//! else interested) subscribes.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use super::types::{CancelReason, Event};
use crate::domain::{AnalysisMode, JobId, Task, TaskId, TaskStatus};

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_024;

/// Central event bus for domain activity
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "EventBus::new: creating event bus");
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Create a new event bus with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// Fire-and-forget: if there are no subscribers, the event is dropped.
    pub fn emit(&self, event: Event) {
        debug!(event_type = event.event_type(), "EventBus::emit");
        let _ = self.tx.send(event);
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        debug!("EventBus::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Create an emitter handle for a controller
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter { tx: self.tx.clone() }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Handle for controllers to emit events without owning the bus
///
/// Cheap to clone. Emitting never blocks and never fails the caller.
#[derive(Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<Event>,
}

impl EventEmitter {
    /// Emit a raw event
    pub fn emit(&self, event: Event) {
        debug!(event_type = event.event_type(), "EventEmitter::emit");
        let _ = self.tx.send(event);
    }

    // === Convenience methods ===

    pub fn task_created(&self, task: &Task) {
        self.emit(Event::TaskCreated { task: task.clone() });
    }

    pub fn task_status_changed(&self, task: &Task, from: TaskStatus) {
        self.emit(Event::TaskStatusChanged {
            id: task.id,
            title: task.title.clone(),
            from,
            to: task.status,
        });
    }

    pub fn task_deleted(&self, id: TaskId, title: &str) {
        self.emit(Event::TaskDeleted {
            id,
            title: title.to_string(),
        });
    }

    pub fn level_up(&self, level: u32, title: &str) {
        self.emit(Event::LevelUp {
            level,
            title: title.to_string(),
        });
    }

    pub fn job_started(&self, job_id: JobId, file_name: &str, mode: AnalysisMode) {
        self.emit(Event::JobStarted {
            job_id,
            file_name: file_name.to_string(),
            mode,
        });
    }

    pub fn job_succeeded(&self, job_id: JobId, action_items: usize) {
        self.emit(Event::JobSucceeded { job_id, action_items });
    }

    pub fn job_cancelled(&self, job_id: JobId, reason: CancelReason) {
        self.emit(Event::JobCancelled { job_id, reason });
    }

    pub fn job_failed(&self, job_id: JobId, message: &str) {
        self.emit(Event::JobFailed {
            job_id,
            message: message.to_string(),
        });
    }

    /// Report a non-fatal error to the user
    pub fn error(&self, context: &str, message: &str) {
        self.emit(Event::Error {
            context: context.to_string(),
            message: message.to_string(),
        });
    }
}

/// Create an event bus wrapped in an Arc for shared ownership
pub fn create_event_bus() -> Arc<EventBus> {
    Arc::new(EventBus::with_default_capacity())
}
