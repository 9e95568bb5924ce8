use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::render::pdf::PdfRenderer;
use crate::storage::ArtifactStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The three external capabilities sit behind traits so
/// backends can be swapped without touching handler or pipeline code.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn TextGenerator>,
    pub renderer: Arc<dyn PdfRenderer>,
    pub store: Arc<dyn ArtifactStore>,
    #[allow(dead_code)]
    pub config: Config,
}
