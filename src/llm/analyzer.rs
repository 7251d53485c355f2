use crate::error::Result;
use crate::intake::UploadedImage;
use crate::llm::gateway::{GenerationConfig, InferenceGateway};
use crate::llm::models::{AnalysisRequest, AnalysisResult, GatewayResponse};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Turns an image and a prompt into a normalized [`AnalysisResult`].
///
/// Built once at startup and shared read-only between requests. Every call makes exactly one
/// attempt against the gateway and recovers every failure into a result variant.
pub struct ImageAnalyzer {
    model: String,
    gateway: Arc<dyn InferenceGateway>,
    config: GenerationConfig,
}

impl ImageAnalyzer {
    pub fn new(model: impl Into<String>, gateway: Arc<dyn InferenceGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
            config: GenerationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Analyze one request.
    pub async fn analyze(&self, request: &AnalysisRequest<'_>) -> AnalysisResult {
        let (width, height) = request.image().dimensions();
        info!(model = %self.model, width, height, "Requesting image analysis");

        let outcome = self.gateway.generate(&self.model, request, &self.config).await;
        normalize(outcome)
    }

    /// Build the request and analyze it. An empty prompt is returned as an error and never
    /// reaches the gateway.
    pub async fn analyze_image(
        &self,
        image: &UploadedImage,
        prompt: impl Into<String>,
    ) -> Result<AnalysisResult> {
        let request = AnalysisRequest::new(image, prompt)?;
        Ok(self.analyze(&request).await)
    }
}

/// Map a gateway outcome onto exactly one [`AnalysisResult`] variant.
pub fn normalize(outcome: Result<GatewayResponse>) -> AnalysisResult {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Inference call failed");
            return AnalysisResult::TransportError {
                message: e.to_string(),
            };
        }
    };

    if response.parts.is_empty() {
        return match response.block_reason {
            Some(reason) => {
                warn!(reason = %reason, "Response blocked by content filter");
                AnalysisResult::Blocked { reason }
            }
            None => {
                warn!(finish_reason = ?response.finish_reason, "Response carried no content");
                AnalysisResult::Empty
            }
        };
    }

    let text = response.parts.concat();
    debug!(text_len = text.len(), parts = response.parts.len(), "Analysis succeeded");
    AnalysisResult::Success { text }
}
