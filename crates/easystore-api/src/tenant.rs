//! Outlet scope gate
//!
//! Runs after the auth gate on every outlet-scoped route. The caller must
//! hold a membership in the outlet named by the `outlet_id` path segment;
//! the resolved outlet and the caller's role there are attached to the
//! request as an [`OutletScope`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use easystore_auth::{AuthEmployee, AuthError};
use easystore_db::Role;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::extract::Path;
use crate::state::AppState;

/// Outlet the current request acts on, verified against the caller's memberships
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutletScope {
    pub outlet_id: i64,
    pub role: Role,
}

fn reject(reason: &'static str, err: ApiError) -> ApiError {
    metrics::counter!("easystore_tenant_rejections_total", "reason" => reason).increment(1);
    err
}

/// Tenant scope middleware
pub async fn outlet_scope_middleware(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw_id = params
        .get("outlet_id")
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            reject(
                "missing_outlet",
                ApiError::bad_request("Outlet ID is required"),
            )
        })?;

    let employee = request
        .extensions()
        .get::<AuthEmployee>()
        .cloned()
        .ok_or(AuthError::MissingAuthHeader)?;

    let memberships = state.db.list_memberships_for_employee(employee.id).await?;

    let outlet_id: i64 = raw_id
        .parse()
        .map_err(|_| reject("malformed_outlet", ApiError::bad_request("Invalid outlet id")))?;

    let outlet = state
        .db
        .get_outlet(outlet_id)
        .await?
        .ok_or_else(|| reject("unknown_outlet", ApiError::not_found("Outlet")))?;

    let Some(membership) = memberships.iter().find(|m| m.outlet_id == outlet.id) else {
        warn!(
            "Employee {} has no membership in outlet {}",
            employee.id, outlet.id
        );
        return Err(reject(
            "not_a_member",
            ApiError::bad_request("Invalid outlet id"),
        ));
    };

    debug!(
        "Employee {} scoped to outlet {} as {}",
        employee.id,
        outlet.id,
        membership.role.as_str()
    );

    request.extensions_mut().insert(OutletScope {
        outlet_id: outlet.id,
        role: membership.role,
    });

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for OutletScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OutletScope>()
            .copied()
            .ok_or_else(|| ApiError::Internal("route is missing the outlet scope gate".to_string()))
    }
}
