//! HTTP handlers for the config service

pub mod configuration;
