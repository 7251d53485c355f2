use crate::error::Result;
use crate::llm::models::{AnalysisRequest, GatewayResponse};
use async_trait::async_trait;

/// Sampling parameters forwarded to the inference service.
///
/// `None` leaves the parameter to the service's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    pub fn is_default(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

/// Abstract interface for multimodal inference backends
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Generate text for one image and prompt. A single attempt; no retries.
    async fn generate(
        &self,
        model: &str,
        request: &AnalysisRequest<'_>,
        config: &GenerationConfig,
    ) -> Result<GatewayResponse>;

    /// Get list of available models
    async fn get_available_models(&self) -> Result<Vec<String>>;
}
