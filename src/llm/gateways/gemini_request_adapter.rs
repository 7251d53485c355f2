//! Adapter between analysis requests and the Gemini `generateContent` wire format.

use crate::error::{Result, WallDefectError};
use crate::llm::gateway::GenerationConfig;
use crate::llm::models::{AnalysisRequest, GatewayResponse};
use serde_json::Value;
use tracing::debug;

/// Finish reasons that mean a content filter suppressed the candidate.
const FILTER_FINISH_REASONS: [&str; 6] =
    ["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII", "IMAGE_SAFETY"];

/// Resolve the REST path segment for a model identifier.
pub fn model_path(model: &str) -> String {
    let trimmed = model.trim();
    if trimmed.starts_with("models/") {
        trimmed.to_string()
    } else {
        format!("models/{}", trimmed)
    }
}

/// Build the `generateContent` request body.
pub fn adapt_request_to_gemini(request: &AnalysisRequest<'_>, config: &GenerationConfig) -> Value {
    let image = request.image();

    let mut body = serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "text": request.prompt() },
                {
                    "inline_data": {
                        "mime_type": image.mime_type(),
                        "data": image.to_base64()
                    }
                }
            ]
        }]
    });

    if !config.is_default() {
        let mut generation_config = serde_json::Map::new();
        if let Some(temperature) = config.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temperature));
        }
        if let Some(max_output_tokens) = config.max_output_tokens {
            generation_config
                .insert("maxOutputTokens".to_string(), serde_json::json!(max_output_tokens));
        }
        body["generationConfig"] = Value::Object(generation_config);
    }

    body
}

fn field<'v>(value: &'v Value, camel: &str, snake: &str) -> &'v Value {
    match value.get(camel) {
        Some(v) if !v.is_null() => v,
        _ => value.get(snake).unwrap_or(&Value::Null),
    }
}

/// Convert a `generateContent` response body into a [`GatewayResponse`].
///
/// Fails only when the body is not a JSON object.
pub fn convert_gemini_response(body: &Value) -> Result<GatewayResponse> {
    if !body.is_object() {
        return Err(WallDefectError::ApiError(format!(
            "unexpected Gemini response shape: {}",
            body
        )));
    }

    let candidate = body["candidates"].as_array().and_then(|c| c.first());

    let parts: Vec<String> = candidate
        .and_then(|c| c["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .filter(|text| !text.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = candidate
        .and_then(|c| field(c, "finishReason", "finish_reason").as_str())
        .map(String::from);

    let prompt_feedback = field(body, "promptFeedback", "prompt_feedback");
    let block_reason = field(prompt_feedback, "blockReason", "block_reason")
        .as_str()
        .map(String::from)
        .or_else(|| {
            finish_reason
                .as_deref()
                .filter(|reason| FILTER_FINISH_REASONS.contains(reason))
                .map(String::from)
        });

    debug!(
        part_count = parts.len(),
        block_reason = ?block_reason,
        finish_reason = ?finish_reason,
        "Converted Gemini response"
    );

    Ok(GatewayResponse {
        parts,
        block_reason,
        finish_reason,
    })
}

/// Pull a readable message out of a Gemini error body, falling back to the raw text.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{decode, test_images::png};

    #[test]
    fn test_model_path() {
        assert_eq!(model_path("gemini-1.5-flash-latest"), "models/gemini-1.5-flash-latest");
        assert_eq!(model_path("models/gemini-1.5-pro"), "models/gemini-1.5-pro");
        assert_eq!(model_path("  gemini-2.0-flash "), "models/gemini-2.0-flash");
    }

    #[test]
    fn test_adapt_request_to_gemini() {
        let image = decode(png(3, 2)).unwrap();
        let request = AnalysisRequest::new(&image, "Describe the wall").unwrap();

        let body = adapt_request_to_gemini(&request, &GenerationConfig::default());

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], "Describe the wall");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], image.to_base64());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_adapt_request_with_generation_config() {
        let image = decode(png(3, 2)).unwrap();
        let request = AnalysisRequest::new(&image, "Describe the wall").unwrap();
        let config = GenerationConfig {
            temperature: Some(0.5),
            max_output_tokens: Some(256),
        };

        let body = adapt_request_to_gemini(&request, &config);

        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn test_convert_text_response() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Cracks observed "}, {"text": "near the ceiling."}]
                },
                "finishReason": "STOP"
            }]
        });

        let response = convert_gemini_response(&body).unwrap();

        assert_eq!(response.parts, vec!["Cracks observed ", "near the ceiling."]);
        assert_eq!(response.finish_reason, Some("STOP".to_string()));
        assert!(response.block_reason.is_none());
    }

    #[test]
    fn test_convert_prompt_feedback_block() {
        let body = serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY", "safetyRatings": []}
        });

        let response = convert_gemini_response(&body).unwrap();

        assert!(response.parts.is_empty());
        assert_eq!(response.block_reason, Some("SAFETY".to_string()));
    }

    #[test]
    fn test_convert_snake_case_feedback() {
        let body = serde_json::json!({
            "prompt_feedback": {"block_reason": "OTHER"}
        });

        let response = convert_gemini_response(&body).unwrap();
        assert_eq!(response.block_reason, Some("OTHER".to_string()));
    }

    #[test]
    fn test_convert_candidate_finish_reason_block() {
        let body = serde_json::json!({
            "candidates": [{"finishReason": "SAFETY", "index": 0}]
        });

        let response = convert_gemini_response(&body).unwrap();

        assert!(response.parts.is_empty());
        assert_eq!(response.block_reason, Some("SAFETY".to_string()));
    }

    #[test]
    fn test_convert_non_filter_finish_reason() {
        let body = serde_json::json!({
            "candidates": [{"finishReason": "MAX_TOKENS", "content": {"parts": []}}]
        });

        let response = convert_gemini_response(&body).unwrap();

        assert!(response.parts.is_empty());
        assert!(response.block_reason.is_none());
        assert_eq!(response.finish_reason, Some("MAX_TOKENS".to_string()));
    }

    #[test]
    fn test_convert_empty_object() {
        let response = convert_gemini_response(&serde_json::json!({})).unwrap();
        assert_eq!(response, GatewayResponse::default());
    }

    #[test]
    fn test_convert_non_object() {
        let result = convert_gemini_response(&serde_json::json!(["unexpected"]));
        assert!(matches!(result, Err(WallDefectError::ApiError(_))));
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(extract_error_message(body), "API key not valid.");
        assert_eq!(extract_error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
