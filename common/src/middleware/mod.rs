//! Middleware shared by both services
//!
//! Request logging and security headers, plus the bearer token extractor.

pub mod auth;
mod security;
mod tracing;

pub use auth::AuthenticatedUser;
pub use security::security_headers;
pub use tracing::request_tracing;
