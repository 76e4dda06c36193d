use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LanguageModel;
use crate::screening::staging::StagingArea;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; every screening run shares it.
    pub llm: Arc<dyn LanguageModel>,
    pub config: Config,
    pub staging: StagingArea,
}
