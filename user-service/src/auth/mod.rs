//! Registration and login
//!
//! Orchestrates the credential store, the password hasher and the token
//! service. Both flows are single-shot: nothing is retained between calls.

mod service;

pub use service::{AuthError, AuthService};
