use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::store::ScholarshipStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Data store. `PgStore` in production.
    pub store: Arc<dyn ScholarshipStore>,
    /// Completion service. `LlmClient` in production; the only path to the model.
    pub llm: Arc<dyn CompletionService>,
    pub config: Config,
}
