//! Error types for remote timeline operations
//!
//! Errors are categorized so the scheduler can log them meaningfully; none
//! of them abort the control loop, every operation is retried on its next
//! scheduled tick.

use thiserror::Error;

/// Errors that can occur when talking to the remote timeline service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Network-related errors (connection issues, DNS failures)
    #[error("Network error: {message}")]
    Network {
        /// Error message
        message: String,
    },

    /// Authentication errors (invalid or expired credentials)
    #[error("Authentication error: {message}")]
    Auth {
        /// Error message
        message: String,
    },

    /// Rate limit errors (too many requests)
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message
        message: String,
        /// Optional retry-after duration in seconds
        retry_after: Option<u64>,
    },

    /// Request took longer than the client timeout
    #[error("Request timed out")]
    Timeout,

    /// Any other non-success response from the service
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Response body could not be decoded
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },

    /// Client could not be constructed from the given configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },
}

impl TimelineError {
    /// Returns true if this error is worth retrying on the next tick
    /// without operator intervention
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TimelineError::Network { .. }
                | TimelineError::RateLimit { .. }
                | TimelineError::Timeout
        )
    }
}

impl From<reqwest::Error> for TimelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TimelineError::Timeout
        } else if err.is_decode() {
            TimelineError::Serialization {
                message: err.to_string(),
            }
        } else {
            TimelineError::Network {
                message: err.to_string(),
            }
        }
    }
}
