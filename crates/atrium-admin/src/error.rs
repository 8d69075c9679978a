//! Error types for the control-plane admin API client.

use thiserror::Error;

/// Result type for admin API operations
pub type Result<T> = std::result::Result<T, AdminError>;

/// Errors produced by the admin API client
#[derive(Debug, Error)]
pub enum AdminError {
    /// Transport-level failure before a response was received
    /// (connection refused/reset, timeout, DNS). Retryable.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The control plane answered with a status outside [200, 300).
    /// Terminal: the response is deterministic for the request, and
    /// mutating calls must not be repeated.
    #[error("admin API rejected the request: status {status}: {body}")]
    Rejection { status: u16, body: String },

    /// A 2xx response whose body could not be decoded into the target type
    #[error("failed to decode admin API response: {message}")]
    Decode { message: String },

    /// All attempts failed with transient errors
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<AdminError>,
    },

    /// The caller cancelled the operation or its deadline elapsed
    #[error("operation cancelled")]
    Cancelled,

    /// Client construction or request-building failure
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl AdminError {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this error may be retried.
    ///
    /// Only transport-level failures qualify; a received HTTP response of
    /// any status is terminal.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else if err.is_builder() {
            Self::Configuration {
                message: err.to_string(),
            }
        } else {
            // Connect, timeout, DNS, and mid-body failures all happen at
            // the transport level without a decoded response.
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}
