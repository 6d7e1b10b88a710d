pub mod board;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::application_service::ApplicationService;

/// Shared state of the applications API service.
#[derive(Clone, Default)]
pub struct AppState {
    pub application_service: ApplicationService,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(application_service: ApplicationService) -> Self {
        Self {
            application_service,
        }
    }
}
