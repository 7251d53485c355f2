pub mod config;
pub mod error;
pub mod intake;
pub mod llm;
pub mod web;

pub use error::{Result, WallDefectError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::{Result, WallDefectError};
    pub use crate::intake::{decode, read_image_file, DecodeError, UploadedImage};
    pub use crate::llm::gateways::GeminiGateway;
    pub use crate::llm::{
        AnalysisRequest, AnalysisResult, GenerationConfig, ImageAnalyzer, InferenceGateway,
    };
}
