//! ElevenLabs TTS client.
//!
//! `POST /v1/text-to-speech/{voice}` with `output_format=pcm_24000`, so the
//! vendor delivers the fixed PCM format directly and no audio decoding is
//! needed on our side.  Voice shaping goes through the structured
//! `voice_settings` body rather than a verbal instruction prefix.
//!
//! Also exposes the voice and model catalog endpoints used by the CLI
//! `voices` / `models` commands.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::ElevenLabsConfig;

use super::{TtsEngine, TtsError};

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// One voice from `GET /v1/voices`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<VoiceInfo>,
}

/// One text-to-speech-capable model from `GET /v1/models`.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub model_id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    model_id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    can_do_text_to_speech: bool,
}

// ---------------------------------------------------------------------------
// ElevenLabsEngine
// ---------------------------------------------------------------------------

/// ElevenLabs TTS engine.  The base URL is configurable to support proxies
/// and regional endpoints.
pub struct ElevenLabsEngine {
    client: reqwest::Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsEngine {
    /// Build an engine from application config.
    pub fn from_config(config: &ElevenLabsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// List the account's voices.
    pub async fn list_voices(&self, api_key: &str) -> Result<Vec<VoiceInfo>, TtsError> {
        let url = format!("{}/v1/voices", self.base_url());
        let response = self
            .client
            .get(&url)
            .header("xi-api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(categorize_failure(status, &body));
        }

        let parsed: VoicesResponse = response
            .json()
            .await
            .map_err(|e| TtsError::Parse(e.to_string()))?;
        Ok(parsed.voices)
    }

    /// List the models that can do text-to-speech.
    pub async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, TtsError> {
        let url = format!("{}/v1/models", self.base_url());
        let response = self
            .client
            .get(&url)
            .header("xi-api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(categorize_failure(status, &body));
        }

        let parsed: Vec<RawModel> = response
            .json()
            .await
            .map_err(|e| TtsError::Parse(e.to_string()))?;

        Ok(tts_capable(parsed))
    }
}

/// Keep only the models that explicitly support text-to-speech.
fn tts_capable(models: Vec<RawModel>) -> Vec<ModelInfo> {
    models
        .into_iter()
        .filter(|m| m.can_do_text_to_speech)
        .map(|m| ModelInfo {
            model_id: m.model_id,
            name: m.name,
            description: m.description,
        })
        .collect()
}

#[async_trait]
impl TtsEngine for ElevenLabsEngine {
    async fn synthesize(&self, text: &str, api_key: &str) -> Result<Vec<u8>, TtsError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/v1/text-to-speech/{}?output_format=pcm_24000",
            self.base_url(),
            self.config.voice_id
        );

        let mut body = serde_json::json!({
            "text": text,
            "model_id": self.config.model_id,
            "voice_settings": {
                "stability": self.config.stability,
                "similarity_boost": self.config.similarity_boost,
            }
        });
        if let Some(code) = &self.config.language_code {
            body["language_code"] = serde_json::Value::String(code.clone());
        }

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(categorize_failure(status, &body));
        }

        let pcm = response.bytes().await?.to_vec();
        Ok(pcm)
    }

    fn name(&self) -> &'static str {
        "elevenlabs"
    }
}

// ---------------------------------------------------------------------------
// Error categorization
// ---------------------------------------------------------------------------

/// Map a failed ElevenLabs response onto a [`TtsError`] category.
/// 401/403 mean the key was rejected; everything else is a provider error.
fn categorize_failure(status: StatusCode, body: &str) -> TtsError {
    let message = error_message(body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        TtsError::InvalidCredential(message)
    } else {
        TtsError::Provider(format!("{status}: {message}"))
    }
}

/// Extract `detail.message` (or a plain-string `detail`) from an ElevenLabs
/// error body, falling back to the raw body text.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .and_then(|v| {
            let detail = &v["detail"];
            detail["message"]
                .as_str()
                .or_else(|| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
