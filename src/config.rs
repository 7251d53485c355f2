//! Process configuration, read once at startup.
//!
//! Values come from the environment (after loading a `.env` file if one exists). The only
//! required variable is `GOOGLE_API_KEY`; everything else has a default.

use crate::error::{Result, WallDefectError};
use crate::llm::gateway::GenerationConfig;
use crate::llm::gateways::{GeminiConfig, DEFAULT_GEMINI_BASE_URL};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_PROMPT: &str = "Please describe the surface defects visible on the wall, identify root causes and suggest possible corrections";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub default_prompt: String,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    pub request_timeout: Option<Duration>,
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("GOOGLE_API_KEY").ok_or_else(|| {
            WallDefectError::ConfigError(
                "GOOGLE_API_KEY is not set; it is required to call the inference service"
                    .to_string(),
            )
        })?;

        let bind_addr = match get("WALLDEFECT_BIND") {
            Some(addr) => parse_value::<SocketAddr>("WALLDEFECT_BIND", &addr)?,
            None => {
                let port = match get("PORT") {
                    Some(port) => parse_value::<u16>("PORT", &port)?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let max_upload_bytes = match get("WALLDEFECT_MAX_UPLOAD_BYTES") {
            Some(raw) => parse_value::<usize>("WALLDEFECT_MAX_UPLOAD_BYTES", &raw)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let request_timeout = get("WALLDEFECT_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_value::<u64>("WALLDEFECT_REQUEST_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let generation = GenerationConfig {
            temperature: get("WALLDEFECT_TEMPERATURE")
                .map(|raw| parse_value::<f32>("WALLDEFECT_TEMPERATURE", &raw))
                .transpose()?,
            max_output_tokens: get("WALLDEFECT_MAX_OUTPUT_TOKENS")
                .map(|raw| parse_value::<u32>("WALLDEFECT_MAX_OUTPUT_TOKENS", &raw))
                .transpose()?,
        };

        Ok(Self {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            default_prompt: get("WALLDEFECT_PROMPT").unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            bind_addr,
            max_upload_bytes,
            request_timeout,
            generation,
        })
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout: self.request_timeout,
        }
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| WallDefectError::ConfigError(format!("{} has an invalid value: '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_api_key_fails() {
        match config_from(&[]) {
            Err(WallDefectError::ConfigError(message)) => {
                assert!(message.contains("GOOGLE_API_KEY"))
            }
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_api_key_fails() {
        assert!(config_from(&[("GOOGLE_API_KEY", "   ")]).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("GOOGLE_API_KEY", "secret")]).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.default_prompt, DEFAULT_PROMPT);
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.request_timeout.is_none());
        assert!(config.generation.is_default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-pro-latest"),
            ("GEMINI_API_BASE", "http://localhost:8080/v1beta"),
            ("WALLDEFECT_PROMPT", "List every crack."),
            ("WALLDEFECT_BIND", "127.0.0.1:8081"),
            ("WALLDEFECT_MAX_UPLOAD_BYTES", "1048576"),
            ("WALLDEFECT_REQUEST_TIMEOUT_SECS", "45"),
            ("WALLDEFECT_TEMPERATURE", "0.2"),
            ("WALLDEFECT_MAX_OUTPUT_TOKENS", "2048"),
        ])
        .unwrap();

        assert_eq!(config.model, "gemini-1.5-pro-latest");
        assert_eq!(config.base_url, "http://localhost:8080/v1beta");
        assert_eq!(config.default_prompt, "List every crack.");
        assert_eq!(config.bind_addr, "127.0.0.1:8081".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_upload_bytes, 1_048_576);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.generation.temperature, Some(0.2));
        assert_eq!(config.generation.max_output_tokens, Some(2048));
    }

    #[test]
    fn test_port_fallback() {
        let config = config_from(&[("GOOGLE_API_KEY", "secret"), ("PORT", "8000")]).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
    }

    #[test]
    fn test_invalid_numbers_fail() {
        assert!(config_from(&[("GOOGLE_API_KEY", "k"), ("PORT", "eighty")]).is_err());
        assert!(config_from(&[("GOOGLE_API_KEY", "k"), ("WALLDEFECT_MAX_UPLOAD_BYTES", "-1")])
            .is_err());
        assert!(config_from(&[("GOOGLE_API_KEY", "k"), ("WALLDEFECT_BIND", "nowhere")]).is_err());
        assert!(config_from(&[("GOOGLE_API_KEY", "k"), ("WALLDEFECT_TEMPERATURE", "warm")]).is_err());
    }

    #[test]
    fn test_gemini_config() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("WALLDEFECT_REQUEST_TIMEOUT_SECS", "10"),
        ])
        .unwrap();

        let gemini = config.gemini_config();
        assert_eq!(gemini.api_key, "secret");
        assert_eq!(gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(gemini.timeout, Some(Duration::from_secs(10)));
    }
}
