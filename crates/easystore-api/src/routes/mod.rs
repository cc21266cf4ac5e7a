//! API routes
//!
//! Three groups share one router: public routes, routes behind the auth
//! gate, and outlet routes behind both the auth gate and the outlet scope
//! gate. Layers added later run first, so auth always precedes scoping.

mod categories;
mod employees;
mod health;
pub mod metrics;
mod outlets;
mod products;
pub mod types;
mod variants;

use axum::{Router, middleware::from_fn_with_state};
use easystore_auth::auth_middleware;
use std::sync::Arc;

use crate::state::{AppState, MetricsHandle};
use crate::tenant::outlet_scope_middleware;

/// Prefix shared by every route
pub const API_PREFIX: &str = "/api/v1";

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let public = Router::new()
        .merge(health::routes())
        .merge(employees::public_routes());

    let authenticated = Router::new()
        .merge(employees::routes())
        .merge(outlets::routes())
        .route_layer(from_fn_with_state(state.jwt.clone(), auth_middleware));

    let scoped = Router::new()
        .merge(outlets::scoped_routes())
        .merge(categories::routes())
        .merge(products::routes())
        .merge(variants::routes())
        .route_layer(from_fn_with_state(state.clone(), outlet_scope_middleware))
        .route_layer(from_fn_with_state(state.jwt.clone(), auth_middleware));

    let mut api = public
        .merge(authenticated)
        .merge(scoped)
        .with_state(state);

    if let Some(handle) = metrics_handle {
        api = api.merge(metrics::routes(handle));
    }

    Router::new().nest(API_PREFIX, api)
}
