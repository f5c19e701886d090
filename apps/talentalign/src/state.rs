use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; the embedding model inside is read-only.
    pub analyzer: Arc<ResumeAnalyzer>,
}
