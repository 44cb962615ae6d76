use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Database;

/// Shared request state: the pool handle and the loaded configuration
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
