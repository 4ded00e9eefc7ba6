//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stats_engine::EngineError;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Every variant renders as `{ "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("not found: {0}")]
    NotFound(String),

    /// The detail is logged, never sent.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "Request failed");
        }
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing => ApiError::Unauthorized("Not a Telegram Web App request"),
            AuthError::InvalidHash => ApiError::Forbidden("Invalid hash"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("group -1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = ApiError::Internal("no such table: user_profiles".into());
        assert_eq!(err.to_string(), "internal error");
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            ApiError::from(AuthError::Missing).to_string(),
            "Not a Telegram Web App request"
        );
        assert_eq!(ApiError::from(AuthError::InvalidHash).to_string(), "Invalid hash");
    }
}
