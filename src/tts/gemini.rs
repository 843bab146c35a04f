//! Google Gemini TTS client.
//!
//! Calls the REST `models/{model}:generateContent` endpoint with the audio
//! response modality.  The response carries base64-encoded PCM (24 kHz,
//! 16-bit, mono) inline, which is decoded before returning — so the engine
//! satisfies the [`TtsEngine`] contract directly.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::StatusCode;

use crate::config::GeminiConfig;

use super::{TtsEngine, TtsError};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// ---------------------------------------------------------------------------
// GeminiEngine
// ---------------------------------------------------------------------------

/// Gemini TTS engine.  Stateless apart from the shared HTTP client; the API
/// key travels with each call so the rotation wrapper can vary it.
pub struct GeminiEngine {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiEngine {
    /// Build an engine from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl TtsEngine for GeminiEngine {
    async fn synthesize(&self, text: &str, api_key: &str) -> Result<Vec<u8>, TtsError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{API_BASE}/models/{}:generateContent", self.config.model);

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.config.voice }
                    }
                }
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(categorize_failure(status, &body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TtsError::Parse(e.to_string()))?;

        let base64_audio = json["candidates"][0]["content"]["parts"][0]["inlineData"]["data"]
            .as_str()
            .ok_or_else(|| TtsError::Parse("response contained no audio data".into()))?;

        BASE64
            .decode(base64_audio)
            .map_err(|e| TtsError::Parse(format!("invalid base64 audio payload: {e}")))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ---------------------------------------------------------------------------
// Error categorization
// ---------------------------------------------------------------------------

/// Map a failed Gemini response onto a [`TtsError`] category.
///
/// 401/403 always mean the key was rejected.  Gemini additionally reports
/// an invalid key as 400 `INVALID_ARGUMENT` with an "API key not valid"
/// message, so that shape is treated as a credential failure too.
fn categorize_failure(status: StatusCode, body: &str) -> TtsError {
    let message = error_message(body);

    let key_invalid_400 = status == StatusCode::BAD_REQUEST
        && (message.contains("API key not valid") || body.contains("API_KEY_INVALID"));

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || key_invalid_400 {
        TtsError::InvalidCredential(message)
    } else {
        TtsError::Provider(format!("{status}: {message}"))
    }
}

/// Pull the human-readable message out of a Gemini error body, falling back
/// to the raw body text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::TtsEngine;

    const KEY_NOT_VALID: &str = r#"{
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT",
            "details": [{ "reason": "API_KEY_INVALID" }]
        }
    }"#;

    #[tokio::test]
    async fn empty_text_returns_empty_buffer_without_network() {
        let engine = GeminiEngine::from_config(&GeminiConfig::default());
        // No server is reachable in tests — an empty input must short-circuit
        // before any request is made.
        let pcm = engine.synthesize("   ", "unused-key").await.unwrap();
        assert!(pcm.is_empty());
    }

    #[test]
    fn unauthorized_is_a_credential_failure() {
        let err = categorize_failure(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Request had invalid authentication credentials."}}"#,
        );
        assert!(err.is_credential());
    }

    #[test]
    fn forbidden_is_a_credential_failure() {
        let err = categorize_failure(
            StatusCode::FORBIDDEN,
            r#"{"error":{"message":"The caller does not have permission"}}"#,
        );
        assert!(err.is_credential());
    }

    #[test]
    fn bad_request_with_invalid_key_marker_is_a_credential_failure() {
        let err = categorize_failure(StatusCode::BAD_REQUEST, KEY_NOT_VALID);
        assert!(err.is_credential());
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn other_bad_request_is_a_provider_failure() {
        let err = categorize_failure(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"Voice 'nope' is not supported."}}"#,
        );
        assert!(!err.is_credential());
        assert!(matches!(err, TtsError::Provider(_)));
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn rate_limit_is_a_provider_failure() {
        let err = categorize_failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Resource has been exhausted"}}"#,
        );
        assert!(!err.is_credential());
    }

    #[test]
    fn unparseable_body_falls_back_to_raw_text() {
        let err = categorize_failure(StatusCode::INTERNAL_SERVER_ERROR, "upstream broke");
        assert!(err.to_string().contains("upstream broke"));
    }

    #[test]
    fn engine_is_object_safe() {
        let engine: Box<dyn TtsEngine> = Box::new(GeminiEngine::from_config(&GeminiConfig::default()));
        assert_eq!(engine.name(), "gemini");
    }
}
