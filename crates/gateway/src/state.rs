//! Application state for dependency injection.

use std::sync::Arc;

use social_service_lib::infra::Database;
use social_service_lib::service::SocialService;

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn SocialService>,
    /// Pool probed by the health check; `None` when the service runs detached
    pub database: Option<Database>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        service: Arc<dyn SocialService>,
        database: Option<Database>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            service,
            database,
            config,
        }
    }
}
