pub mod gemini;
pub mod gemini_request_adapter;

pub use gemini::{GeminiConfig, GeminiGateway, DEFAULT_GEMINI_BASE_URL};
