//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Every way a remote completion can fail
///
/// The set is closed: the plan generator falls back on any of these, so adding
/// a variant means deciding how it is reported, not whether it is caught.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Quota or rate limit exceeded: {message}")]
    Quota {
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response contained no content")]
    EmptyContent,
}

impl LlmError {
    /// Classify a transport-level failure from reqwest
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::Network(err)
        }
    }

    /// Short stable label for logs and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::Auth { .. } => "auth",
            LlmError::Quota { .. } => "quota",
            LlmError::Network(_) => "network",
            LlmError::Timeout(_) => "timeout",
            LlmError::Api { .. } => "api",
            LlmError::MalformedResponse(_) => "malformed-response",
            LlmError::EmptyContent => "empty-content",
        }
    }

    /// Check if the credential was rejected
    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::Auth { .. })
    }

    /// Check if this is a quota or rate limit rejection
    pub fn is_quota(&self) -> bool {
        matches!(self, LlmError::Quota { .. })
    }

    /// Get the server-suggested wait, if this is a quota rejection that sent one
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::Quota { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
