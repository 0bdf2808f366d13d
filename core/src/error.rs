//! Failure taxonomy for upstream calls.
//!
//! # Design
//! Each variant maps to one HTTP status and one machine-readable code, so the
//! serving layer never has to inspect error text. `ConnectivityError` covers
//! the startup probe, whose outcome is only logged.

use thiserror::Error;

use crate::types::ErrorPayload;

/// Appended to every upstream-related error message.
pub const MOCK_MODE_HINT: &str = "Set MOCK_MODE=true to serve synthetic data instead.";

/// Errors produced while listing connections from the upstream API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// DNS, connect, timeout or body read failure.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    /// The upstream answered with an HTML page (usually a login page).
    #[error("upstream returned HTML instead of JSON; credentials or authentication method may be wrong")]
    AuthOrProtocol,

    /// Non-200 response that was not an HTML page.
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16, body_excerpt: String },

    /// 200 response whose body is not a listing document.
    #[error("upstream response is not a valid listing: {0}")]
    MalformedResponse(String),
}

impl UpstreamError {
    /// Status the gateway answers with. `UpstreamStatus` mirrors the upstream.
    pub fn http_status(&self) -> u16 {
        match self {
            UpstreamError::Unreachable(_) => 502,
            UpstreamError::AuthOrProtocol => 401,
            UpstreamError::UpstreamStatus { status, .. } => *status,
            UpstreamError::MalformedResponse(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UpstreamError::Unreachable(_) => "upstream_unreachable",
            UpstreamError::AuthOrProtocol => "upstream_auth_failed",
            UpstreamError::UpstreamStatus { .. } => "upstream_status",
            UpstreamError::MalformedResponse(_) => "malformed_upstream_response",
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let detail = match self {
            UpstreamError::UpstreamStatus { body_excerpt, .. } if !body_excerpt.is_empty() => {
                body_excerpt.clone()
            }
            other => other.to_string(),
        };
        ErrorPayload::new(self.code(), Some(format!("{detail}\n\n{MOCK_MODE_HINT}")))
    }
}

/// Outcome of the startup connectivity probe when it does not succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    #[error("connection failed: {0}")]
    Transport(String),

    #[error("authentication failed (401), check AUTH_USER and AUTH_PASS")]
    Unauthorized,

    #[error("unexpected status {status}: {body_excerpt}")]
    UnexpectedStatus { status: u16, body_excerpt: String },

    #[error("response is not JSON (Content-Type: {content_type})")]
    NotJson { content_type: String },
}
