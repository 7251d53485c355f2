use crate::error::{Result, WallDefectError};
use crate::intake::UploadedImage;

/// A single image-analysis call: one image, one non-empty prompt.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    prompt: String,
    image: &'a UploadedImage,
}

impl<'a> AnalysisRequest<'a> {
    /// Build a request, rejecting prompts that are empty or whitespace.
    pub fn new(image: &'a UploadedImage, prompt: impl Into<String>) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(WallDefectError::EmptyPrompt);
        }

        Ok(Self { prompt, image })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image(&self) -> &UploadedImage {
        self.image
    }
}

/// Response from an inference gateway on a completed call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayResponse {
    /// Text parts of the first candidate, in order
    pub parts: Vec<String>,
    /// Block reason reported by the service's safety feedback, if any
    pub block_reason: Option<String>,
    pub finish_reason: Option<String>,
}

impl GatewayResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
            ..Default::default()
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            block_reason: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Normalized outcome of one analysis call.
///
/// Exactly one variant is produced per call; callers branch on it before reading any payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Success { text: String },
    Blocked { reason: String },
    Empty,
    TransportError { message: String },
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success { .. })
    }

    /// Human-readable message for the non-success variants.
    pub fn message(&self) -> Option<String> {
        match self {
            AnalysisResult::Success { .. } => None,
            AnalysisResult::Blocked { reason } => {
                Some(format!("The response was blocked by the content filter ({}).", reason))
            }
            AnalysisResult::Empty => {
                Some("The model returned an empty response. Try another image or prompt.".into())
            }
            AnalysisResult::TransportError { message } => {
                Some(format!("An error occurred calling the inference service: {}", message))
            }
        }
    }
}
