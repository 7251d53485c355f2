pub mod analyzer;
pub mod gateway;
pub mod gateways;
pub mod models;

pub use analyzer::ImageAnalyzer;
pub use gateway::{GenerationConfig, InferenceGateway};
pub use models::{AnalysisRequest, AnalysisResult, GatewayResponse};

#[cfg(test)]
pub(crate) mod testing;
