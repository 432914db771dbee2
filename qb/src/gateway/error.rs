//! Gateway error types

use std::time::Duration;
use thiserror::Error;

/// Transport-level failures talking to the remote authority
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            GatewayError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Api { status, .. } => matches!(status, 408 | 429) || *status >= 500,
            GatewayError::Network(e) => !e.is_decode(),
            GatewayError::Timeout(_) => true,
            GatewayError::InvalidResponse(_) => false,
            GatewayError::Json(_) => false,
        }
    }

    /// Check if the authority reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        // 5xx errors should be retryable
        assert!(
            GatewayError::Api {
                status: 503,
                message: "Service unavailable".to_string()
            }
            .is_retryable()
        );

        assert!(
            GatewayError::Api {
                status: 429,
                message: "Slow down".to_string()
            }
            .is_retryable()
        );

        // 4xx errors should not be retryable
        assert!(
            !GatewayError::Api {
                status: 422,
                message: "Unprocessable".to_string()
            }
            .is_retryable()
        );

        assert!(GatewayError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!GatewayError::InvalidResponse("Bad JSON".to_string()).is_retryable());
    }

    #[test]
    fn test_status_and_not_found() {
        let err = GatewayError::Api {
            status: 404,
            message: "Task not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());

        assert_eq!(GatewayError::Timeout(Duration::from_secs(1)).status(), None);
    }

    #[test]
    fn test_display() {
        let err = GatewayError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error 500: boom");
    }
}
