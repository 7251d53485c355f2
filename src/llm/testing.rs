//! Scripted gateway used by unit tests across the crate.

use crate::error::Result;
use crate::llm::gateway::{GenerationConfig, InferenceGateway};
use crate::llm::models::{AnalysisRequest, GatewayResponse};
use async_trait::async_trait;
use std::sync::Mutex;

/// Replays scripted outcomes, one per call, then answers with empty responses.
pub struct StubGateway {
    outcomes: Mutex<Vec<Result<GatewayResponse>>>,
    call_count: Mutex<usize>,
    prompts: Mutex<Vec<String>>,
}

impl StubGateway {
    pub fn new(mut outcomes: Vec<Result<GatewayResponse>>) -> Self {
        outcomes.reverse();
        Self {
            outcomes: Mutex::new(outcomes),
            call_count: Mutex::new(0),
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceGateway for StubGateway {
    async fn generate(
        &self,
        _model: &str,
        request: &AnalysisRequest<'_>,
        _config: &GenerationConfig,
    ) -> Result<GatewayResponse> {
        *self.call_count.lock().unwrap() += 1;
        self.prompts.lock().unwrap().push(request.prompt().to_string());
        self.outcomes.lock().unwrap().pop().unwrap_or_else(|| Ok(GatewayResponse::empty()))
    }

    async fn get_available_models(&self) -> Result<Vec<String>> {
        Ok(vec!["stub-model".to_string()])
    }
}
