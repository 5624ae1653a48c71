use std::sync::Arc;

use crate::config::AppConfig;

/// State shared by every axum handler: the configuration loaded at startup.
///
/// Nothing else lives here. Each request opens its own database connection.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<AppConfig>,
}

impl SharedState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner
    }

    pub fn server_port(&self) -> u16 {
        self.inner.server_port
    }
}
