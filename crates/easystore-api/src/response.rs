//! Success response envelope

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Serialize)]
struct Envelope<'a, T> {
    status: &'static str,
    message: &'a str,
    result: &'a T,
}

/// `{status: "success", message, result}` with an HTTP status
pub struct ApiResponse<T> {
    code: StatusCode,
    message: String,
    result: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, result: T) -> Self {
        Self {
            code: StatusCode::OK,
            message: message.into(),
            result,
        }
    }

    pub fn created(message: impl Into<String>, result: T) -> Self {
        Self {
            code: StatusCode::CREATED,
            message: message.into(),
            result,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Json(Envelope {
            status: "success",
            message: &self.message,
            result: &self.result,
        });

        (self.code, body).into_response()
    }
}
