//! Middleware for the API layer.

pub mod auth;

pub use auth::{AuthUser, auth_middleware};
