use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use slotswap_core::error::DomainError;
use tracing::error;

/// Boundary error type: the domain taxonomy plus the 401 failures of the
/// auth boundary, which sit outside the core's kinds.
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    Unauthorized(&'static str),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Domain(DomainError::Internal(err))
    }
}

impl ApiError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        ApiError::Domain(DomainError::Internal(err.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            ApiError::Domain(err) => {
                let status = match err {
                    DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                    DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                    DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
                    DomainError::Conflict(_) => StatusCode::CONFLICT,
                    DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                // Storage details stay in the logs, not the response body.
                let message = if let DomainError::Internal(inner) = err {
                    error!("Internal error: {:#}", inner);
                    "internal server error".to_string()
                } else {
                    err.to_string()
                };
                (status, err.kind(), message)
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", (*msg).to_string())
            }
        };

        (status, Json(json!({ "kind": kind, "message": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A panicked or cancelled blocking task is an internal failure.
pub(crate) fn join_error(err: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", err);
    ApiError::internal(err)
}
