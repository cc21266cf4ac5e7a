//! Authentication middleware for Axum

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::AuthError;
use crate::jwt::{Claims, JwtManager};

/// Authenticated employee, taken from a verified token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthEmployee {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl TryFrom<&Claims> for AuthEmployee {
    type Error = AuthError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        Ok(Self {
            id,
            name: claims.name.clone(),
            email: claims.email.clone(),
        })
    }
}

/// Extract bearer token from authorization header
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

fn authenticate(request: &Request, jwt_manager: &JwtManager) -> Result<AuthEmployee, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = extract_bearer_token(header)?;
    let claims = jwt_manager.validate_token(token)?;
    AuthEmployee::try_from(&claims)
}

/// Authentication middleware
///
/// Every request must carry `Authorization: Bearer <token>`. On success the
/// `AuthEmployee` is added to request extensions; otherwise the request is
/// rejected with 401 before reaching the handler.
pub async fn auth_middleware(
    State(jwt_manager): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let employee = match authenticate(&request, &jwt_manager) {
        Ok(employee) => employee,
        Err(e) => {
            debug!("Rejected request to {}: {}", request.uri().path(), e);
            metrics::counter!("easystore_auth_rejections_total", "reason" => e.reason())
                .increment(1);
            return Err(e);
        }
    };

    debug!("Authenticated employee: {} ({})", employee.id, employee.email);

    request.extensions_mut().insert(employee);

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthEmployee
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthEmployee>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}
