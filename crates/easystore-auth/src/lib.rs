//! EasyStore Authentication
//!
//! This crate provides employee password hashing, JWT issuance and
//! verification, and the bearer-token middleware that guards the API.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtManager, TOKEN_TTL_MINUTES};
pub use middleware::{AuthEmployee, auth_middleware};
pub use password::{hash_password, verify_password};
