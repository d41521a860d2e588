use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{models::ErrorBody, store::StoreError};

/// Message shown when the remote store rejects a delete.
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete the ad request";
/// Fallback when an unexpected failure carries no message.
pub const FALLBACK_MESSAGE: &str = "Internal server error";

/// ProxyError
///
/// Every way a proxy invocation can fail. Each variant renders as exactly one
/// JSON response with an `error` field.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// (a) client input error
    #[error("Missing ad request id")]
    MissingId,

    /// (b) unsupported operation
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    /// (c) the remote store answered with a non-success status
    #[error("{}", DELETE_FAILED_MESSAGE)]
    Upstream { status: u16, detail: String },

    /// (d) anything else that went wrong while processing
    #[error("{0}")]
    Unexpected(String),
}

impl ProxyError {
    /// Builds an `Unexpected` error, substituting the fallback for blank messages.
    pub fn unexpected(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ProxyError::Unexpected(FALLBACK_MESSAGE.to_string())
        } else {
            ProxyError::Unexpected(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingId => StatusCode::BAD_REQUEST,
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Upstream { .. } | ProxyError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for ProxyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Remote { status, message } => ProxyError::Upstream {
                status,
                detail: message,
            },
            StoreError::Transport(message) => ProxyError::unexpected(message),
        }
    }
}

/// Client errors are logged at WARN, server errors at ERROR. Remote details stay
/// in the logs and never reach the response body.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ProxyError::Upstream { status: remote, detail } => {
                tracing::error!(remote_status = remote, detail = %detail, "document store rejected request");
            }
            ProxyError::Unexpected(message) => {
                tracing::error!(message = %message, "unexpected proxy failure");
            }
            _ => tracing::warn!(status = status.as_u16(), "{}", self),
        }

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
