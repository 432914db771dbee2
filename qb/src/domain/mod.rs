//! Domain types for Questboard
//!
//! Core wire/domain types shared by the gateway and the controllers:
//! Task, UserStats, and the analysis job payload/result types.
//! All of them are owned by the remote authority; the client only caches them.

mod analysis;
mod stats;
mod task;

pub use analysis::{
    AnalysisMode, AnalysisRequest, AnalysisResponse, AnalysisResult, AudioInput, JobId, SummaryLevel,
};
pub use stats::UserStats;
pub use task::{NewTask, Task, TaskId, TaskStatus};
