use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::EntityStore;
use crate::telemetry::HttpMetrics;
use crate::trace::TraceUploadService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn EntityStore>,
    pub uploads: Arc<TraceUploadService>,
    pub metrics: HttpMetrics,
}
