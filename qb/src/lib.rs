//! Questboard - client-side controller for a gamified task board
//!
//! Questboard keeps a local task cache in step with a remote authority,
//! tracks level/EXP to celebrate level-ups exactly once, and runs a
//! single-flight, cancellable audio analysis job whose stale responses never
//! overwrite a newer request's result.
//!
//! # Core Concepts
//!
//! - **Optimistic moves**: a status change shows locally before the authority answers
//! - **Reconcile by refetch**: failures are repaired with a full list fetch, never a merge
//! - **Single-flight jobs**: starting an analysis revokes the running one
//! - **Effects are pure reactions**: presentation never feeds back into domain state
//!
//! # Modules
//!
//! - [`gateway`] - Typed access to the remote authority
//! - [`tasks`] - Task cache, optimistic status changes, drop targets
//! - [`stats`] - Level/EXP tracking and level-up detection
//! - [`jobs`] - Single-flight analysis job controller
//! - [`effects`] - Side-effect dispatcher and presenters
//! - [`state`] - Observable board snapshot
//! - [`events`] - Event bus shared by all controllers
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod board;
pub mod cli;
pub mod config;
pub mod domain;
pub mod effects;
pub mod events;
pub mod gateway;
pub mod jobs;
pub mod state;
pub mod stats;
pub mod tasks;

// Re-export commonly used types
pub use board::Board;
pub use config::{AnalysisConfig, Config, GatewayConfig};
pub use domain::{
    AnalysisMode, AnalysisRequest, AnalysisResponse, AnalysisResult, AudioInput, JobId, NewTask, SummaryLevel, Task,
    TaskId, TaskStatus, UserStats,
};
pub use effects::{
    Celebration, CueKind, Effect, Notification, NotificationLevel, Presenter, SideEffectDispatcher, SoundEffect,
    TerminalPresenter, effects_for, sound_effect,
};
pub use events::{CancelReason, Event, EventBus, EventEmitter, create_event_bus};
pub use gateway::{Gateway, GatewayError, HttpGateway, create_gateway};
pub use jobs::{JobController, JobError, JobLimits, JobOutcome, JobTicket};
pub use state::{AppState, JobState, JobView, StateManager, StatsSwap};
pub use stats::StatsMonitor;
pub use tasks::{ConfirmDelete, DropTarget, TaskError, TaskStore, parse_column};
