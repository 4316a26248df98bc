use serde::Deserialize;

use crate::error::ApiError;

pub const MISSING_TEXT: &str = "Missing 'text' parameter";

/// Body of `POST /tts`.
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Parse a `/tts` body and return the text to speak.
///
/// The body is always treated as JSON, whatever `Content-Type` says.
pub fn parse_tts_request(body: &[u8]) -> Result<String, ApiError> {
    if body.is_empty() {
        return Err(ApiError::InvalidInput(MISSING_TEXT.to_string()));
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid JSON body: {e}")))?;
    if !value.is_object() {
        return Err(ApiError::InvalidInput(
            "Request body must be a JSON object".to_string(),
        ));
    }
    let req: TtsRequest = serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid 'text' parameter: {e}")))?;

    let text = req.text.unwrap_or_default();
    validate_tts_request(&text)?;
    Ok(text)
}

/// Validate TTS request
pub fn validate_tts_request(text: &str) -> Result<(), ApiError> {
    if text.is_empty() {
        return Err(ApiError::InvalidInput(MISSING_TEXT.to_string()));
    }
    Ok(())
}
