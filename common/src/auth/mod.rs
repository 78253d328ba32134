//! Authentication primitives for Config Manager
//!
//! - Salted one-way password hashing
//! - Signed, time-limited bearer tokens asserting a username

mod jwt;
mod password;

pub use jwt::{Claims, JwtError, TokenService, MIN_SECRET_LEN};
pub use password::{PasswordError, PasswordHasher};
