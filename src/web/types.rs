use crate::config::AppConfig;
use crate::llm::ImageAnalyzer;
use std::sync::Arc;

/// Read-only state shared by every request.
pub struct AppState {
    pub analyzer: Arc<ImageAnalyzer>,
    pub default_prompt: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(analyzer: Arc<ImageAnalyzer>, config: &AppConfig) -> Self {
        Self {
            analyzer,
            default_prompt: config.default_prompt.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
