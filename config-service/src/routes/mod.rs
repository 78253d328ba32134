//! Route definitions for the config service

mod configuration;

pub use configuration::configuration_routes;
