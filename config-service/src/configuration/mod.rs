//! Key/value configuration entries
//!
//! - Entry model and request body
//! - Store trait with Postgres and in-memory implementations
//! - Service enforcing key uniqueness and audit fields

mod model;
mod service;
mod store;

pub use model::{Configuration, ConfigurationChanges, ConfigurationRequest, NewConfiguration};
pub use service::{ConfigurationError, ConfigurationService};
pub use store::{ConfigurationStore, InMemoryConfigurationStore, PgConfigurationStore};
