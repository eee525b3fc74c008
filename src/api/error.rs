use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{management::AuthError, spotify::UpstreamError};

/// Request-level failures, rendered as a uniform JSON envelope
/// `{"error": ..., "details"?: ...}`.
///
/// Every handler returns `Result<_, ApiError>`; nothing else ever reaches
/// the transport layer. No variant triggers a retry — each failure is
/// terminal for its request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, invalid, or unrefreshable token.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Missing or malformed request parameter.
    #[error("{0}")]
    BadRequest(String),

    /// Non-2xx from the resource API or accounts server; status and body
    /// are kept for diagnostics.
    #[error("Upstream request failed with status {status}")]
    Upstream { status: u16, body: String },

    /// Anything unexpected: transport failures, malformed upstream
    /// payloads, unwritable state.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Not authenticated"})),
            )
                .into_response(),
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
            }
            Self::Upstream { status, body } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Upstream request failed",
                    "details": {"status": status, "body": body},
                })),
            )
                .into_response(),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": msg})),
            )
                .into_response(),
        }
    }
}

// Unauthenticated and RefreshFailed both mean the same thing to the
// browser: run the authorization flow again.
impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        Self::Unauthenticated
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Transport(e) => Self::Internal(e.to_string()),
            UpstreamError::Status { status, body } => Self::Upstream { status, body },
        }
    }
}
