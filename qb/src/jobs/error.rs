//! Job controller error types

use thiserror::Error;

/// Reasons a job is refused before any request is made
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Audio payload too large: {size} bytes (limit {limit} bytes)")]
    PayloadTooLarge { size: usize, limit: usize },
}
