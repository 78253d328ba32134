//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use configmanager_common::auth::TokenService;
use configmanager_common::store::CredentialStore;

use crate::configuration::ConfigurationService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub configuration_service: Arc<ConfigurationService>,
    pub token_service: Arc<TokenService>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(
        configuration_service: Arc<ConfigurationService>,
        token_service: Arc<TokenService>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            configuration_service,
            token_service,
            credentials,
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.token_service.clone()
    }
}

impl FromRef<AppState> for Arc<dyn CredentialStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.credentials.clone()
    }
}
