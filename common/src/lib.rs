//! Config Manager shared library
//!
//! Code shared by the user service and the config service: the user model and
//! credential store, password hashing, bearer token issuance and verification,
//! and the HTTP plumbing both services run on.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod server;
pub mod store;
