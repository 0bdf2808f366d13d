//! Handler-boundary errors and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use conngate_core::{ErrorPayload, UpstreamError};
use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("only GET is allowed on this endpoint")]
    MethodNotAllowed,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Mirrored upstream codes can be anything; fall back to 502 for
            // values that are not valid HTTP statuses.
            GatewayError::Upstream(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        match self {
            GatewayError::Upstream(err) => err.to_payload(),
            GatewayError::Session(err) => ErrorPayload::new("session_unavailable", Some(err.to_string())),
            GatewayError::MethodNotAllowed => ErrorPayload::new("method_not_allowed", Some(self.to_string())),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.payload())).into_response()
    }
}
