//! Single-flight audio analysis jobs
//!
//! At most one job runs at a time. Starting another revokes the running
//! one; a revoked job's response is dropped, never shown.

mod controller;
mod error;

pub use controller::{JobController, JobLimits, JobOutcome, JobTicket};
pub use error::JobError;
