//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No authorization header")]
    MissingAuthHeader,

    #[error("Invalid token format")]
    InvalidAuthHeader,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token")]
    InvalidToken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token signing error: {0}")]
    TokenIssue(String),
}

impl AuthError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::PasswordHash(_) | AuthError::TokenIssue(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message safe to return to the caller
    pub fn public_message(&self) -> String {
        match self {
            AuthError::PasswordHash(_) | AuthError::TokenIssue(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }

    /// Short label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_header",
            AuthError::InvalidAuthHeader => "malformed_header",
            AuthError::TokenExpired => "expired",
            AuthError::InvalidToken => "invalid",
            AuthError::PasswordHash(_) => "password_hash",
            AuthError::TokenIssue(_) => "token_issue",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = axum::Json(json!({
            "status": "failed",
            "message": self.public_message(),
        }));

        (self.status_code(), body).into_response()
    }
}
