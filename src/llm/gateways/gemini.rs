//! Gemini Gateway for multimodal inference.
//!
//! This module provides a gateway for Google's Generative Language API,
//! sending one image plus a prompt to `generateContent` and listing models.

use crate::error::{Result, WallDefectError};
use crate::llm::gateway::{GenerationConfig, InferenceGateway};
use crate::llm::gateways::gemini_request_adapter::{
    adapt_request_to_gemini, convert_gemini_response, extract_error_message, model_path,
};
use crate::llm::models::{AnalysisRequest, GatewayResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for connecting to the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<std::time::Duration>,
}

impl GeminiConfig {
    /// Configuration for the public endpoint with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Gateway for the Gemini inference service.
pub struct GeminiGateway {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGateway {
    /// Create a new Gemini gateway with custom configuration.
    ///
    /// Fails when the HTTP client cannot be built with the requested settings.
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        let config = GeminiConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { client, config })
    }

    /// Create gateway with custom API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(GeminiConfig {
            base_url: base_url.into(),
            ..GeminiConfig::new(api_key)
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.config.base_url, model_path(model))
    }

    async fn error_for_status(response: reqwest::Response) -> WallDefectError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        WallDefectError::GatewayError(format!(
            "Gemini API error: {} - {}",
            status,
            extract_error_message(&error_text)
        ))
    }
}

#[async_trait]
impl InferenceGateway for GeminiGateway {
    async fn generate(
        &self,
        model: &str,
        request: &AnalysisRequest<'_>,
        config: &GenerationConfig,
    ) -> Result<GatewayResponse> {
        info!("Delegating to Gemini for image analysis");
        debug!(
            model = model,
            prompt_len = request.prompt().len(),
            image_bytes = request.image().bytes().len(),
            mime_type = request.image().mime_type(),
            "Building generateContent request"
        );

        let body = adapt_request_to_gemini(request, config);

        let response = self
            .client
            .post(self.endpoint_for_model(model))
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let response_body: Value = serde_json::from_str(&response.text().await?)?;
        convert_gemini_response(&response_body)
    }

    async fn get_available_models(&self) -> Result<Vec<String>> {
        info!("Fetching available Gemini models");

        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let body: Value = serde_json::from_str(&response.text().await?)?;

        let models = body["models"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m["name"].as_str())
                    .map(|name| name.trim_start_matches("models/").to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }
}
