//! Failure taxonomy for the transport client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`TodoistClient`](super::TodoistClient).
///
/// Every variant is propagated to the caller unchanged; the client never
/// retries or recovers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// No response arrived within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The request succeeded at the transport level but the response broke the
    /// endpoint contract (undecodable JSON, or no body where one was required).
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The credential cannot be encoded as an `Authorization` header value.
    #[error("Credential contains characters not allowed in an HTTP header")]
    InvalidCredential,

    /// Connection-level failure other than a timeout.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl ApiError {
    /// Status code of an [`ApiError::Http`] failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for a 404 answer, which some tools treat as a soft failure.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Response body of an [`ApiError::Http`] decoded as JSON, when it is JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Http { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}
