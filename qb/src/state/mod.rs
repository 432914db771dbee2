//! Observable board state
//!
//! StateManager owns the single AppState snapshot (task cache, stats, job
//! slot). Controllers write to it, presentation subscribes to it.

mod manager;

pub use manager::{AppState, JobState, JobView, StateManager, StatsSwap};
