//! Error types and result aliases for the walldefect crate.
//!
//! This module defines the core error type [`WallDefectError`] and the [`Result`] type alias
//! used throughout the library. Per-request failures are recovered into page notices by the
//! web layer; only configuration errors are fatal to the process.

use crate::intake::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WallDefectError {
    #[error("Inference gateway error: {0}")]
    GatewayError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("Prompt must not be empty")]
    EmptyPrompt,
}

pub type Result<T> = std::result::Result<T, WallDefectError>;
