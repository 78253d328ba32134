//! Route definitions for the user service

mod auth;

pub use auth::auth_routes;
