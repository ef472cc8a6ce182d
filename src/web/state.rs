use crate::config::AppConfig;
use crate::db::DbPool;
use crate::translator::Translator;

/// Shared application state for the web server
pub struct AppState {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub translator: Translator,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, db_pool: DbPool, translator: Translator) -> Self {
        Self {
            config,
            db_pool,
            translator,
            startup_time: chrono::Utc::now(),
        }
    }
}
