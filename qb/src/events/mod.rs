//! Event bus for domain activity
//!
//! Every controller emits events for what it did; presentation subscribes.
//!
//! ```text
//!   TaskStore         StatsMonitor        JobController
//!   - TaskCreated     - LevelUp           - JobStarted / JobSucceeded
//!   - TaskStatusChanged                   - JobCancelled / JobFailed
//!   - TaskDeleted
//!         \                |                   /
//!          +------ EventBus (broadcast) ------+
//!                          |
//!                 SideEffectDispatcher -> Presenter
//! ```
//!
//! `Error` events form the user-visible error channel: transport failures
//! and rejected input end up there, never as panics.

mod bus;
mod types;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventEmitter, create_event_bus};
pub use types::{CancelReason, Event};
