//! EasyStore Database Layer
//!
//! This crate provides the persistence layer for EasyStore: employees,
//! outlets and their memberships, the product catalog and stock, stored
//! in SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::{Database, UniqueField};

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
