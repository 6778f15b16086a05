use crate::config::AppConfig;
use crate::services::brief::BriefService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub briefs: Arc<BriefService>,
}

impl AppState {
    pub fn new(config: AppConfig, briefs: BriefService) -> Self {
        Self {
            config: Arc::new(config),
            briefs: Arc::new(briefs),
        }
    }
}
