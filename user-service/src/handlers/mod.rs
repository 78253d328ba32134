//! HTTP handlers for the user service

pub mod auth;
