//! EasyStore REST API
//!
//! This crate provides the Axum-based HTTP API for EasyStore: the route
//! table, the outlet scope gate, field validation and the response envelope.

pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;
pub mod tenant;
pub mod validation;

pub use error::ApiError;
pub use response::ApiResponse;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
pub use tenant::OutletScope;

#[cfg(test)]
mod test_support;
