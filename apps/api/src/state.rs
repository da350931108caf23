use std::sync::Arc;

use crate::config::Config;
use crate::screening::pipeline::AnalysisPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<AnalysisPipeline>,
}
