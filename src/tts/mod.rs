//! TTS provider clients and the key-rotation wrapper.
//!
//! # Overview
//!
//! [`TtsEngine`] is the per-provider synthesis interface: text plus one
//! credential in, raw PCM out.  [`GeminiEngine`] and [`ElevenLabsEngine`]
//! implement it over the vendors' REST APIs.
//!
//! [`SpeechSource`] is the capability the pipeline consumes — just text in,
//! PCM out.  [`RotatingEngine`] bridges the two by pairing an engine with a
//! [`KeyRing`] so every call transparently rotates across the configured
//! API keys (see [`rotation`]).
//!
//! Whether a failure is worth rotating for is decided once, here, by mapping
//! vendor HTTP responses onto [`TtsError`] categories — call sites only ever
//! check [`TtsError::is_credential`].

pub mod elevenlabs;
pub mod gemini;
pub mod rotation;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AppConfig, TtsProvider};

pub use elevenlabs::{ElevenLabsEngine, ModelInfo, VoiceInfo};
pub use gemini::GeminiEngine;
pub use rotation::{KeyRing, RotatingEngine};

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
///
/// The [`InvalidCredential`](Self::InvalidCredential) category is the only
/// one the rotation wrapper routes around; everything else surfaces to the
/// caller unchanged.
#[derive(Debug, Clone, Error)]
pub enum TtsError {
    /// The provider rejected this specific API key (invalid, unauthorized,
    /// or lacking permission).
    #[error("API key rejected: {0}")]
    InvalidCredential(String),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("TTS request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The provider rejected the request for non-credential reasons
    /// (invalid voice/model, malformed request, quota or billing).
    #[error("provider error: {0}")]
    Provider(String),

    /// No API keys are configured for the selected provider.
    #[error("no API keys configured")]
    NoCredentials,

    /// Every configured API key was tried once and rejected.
    #[error("all {tried} API keys were rejected; last error: {last}")]
    CredentialsExhausted { tried: usize, last: String },
}

impl TtsError {
    /// `true` for failures that indicate a bad credential rather than a bad
    /// request — the category the rotation wrapper is allowed to retry.
    pub fn is_credential(&self) -> bool {
        matches!(self, TtsError::InvalidCredential(_))
    }
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TtsEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for TTS providers.
///
/// # Contract
///
/// - Returns raw PCM — 24 kHz, 16-bit LE, mono.
/// - Text that is empty after trimming yields `Ok(vec![])`, not an error.
/// - Credential rejections map to [`TtsError::InvalidCredential`]; all
///   other vendor failures map to the remaining categories.
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Synthesize `text` using `api_key` and return the PCM bytes.
    async fn synthesize(&self, text: &str, api_key: &str) -> Result<Vec<u8>, TtsError>;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

// Compile-time assertion: Box<dyn TtsEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TtsEngine>) {}
};

// ---------------------------------------------------------------------------
// SpeechSource trait
// ---------------------------------------------------------------------------

/// The capability the assembly pipeline consumes: text in, PCM out, with
/// credential handling already taken care of.
#[async_trait]
pub trait SpeechSource: Send + Sync {
    async fn speak(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}

// ---------------------------------------------------------------------------
// Engine factory
// ---------------------------------------------------------------------------

/// Create the TTS engine selected by `config.provider`.
pub fn create_engine(config: &AppConfig) -> Box<dyn TtsEngine> {
    match config.provider {
        TtsProvider::Gemini => Box::new(GeminiEngine::from_config(&config.gemini)),
        TtsProvider::ElevenLabs => Box::new(ElevenLabsEngine::from_config(&config.elevenlabs)),
    }
}

// ---------------------------------------------------------------------------
// MockSpeech  (test-only)
// ---------------------------------------------------------------------------

/// A scripted [`SpeechSource`] double: returns pre-configured results in
/// order and records every text it was asked to speak.
#[cfg(test)]
pub struct MockSpeech {
    script: std::sync::Mutex<std::collections::VecDeque<Result<Vec<u8>, TtsError>>>,
    texts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockSpeech {
    /// Create a mock that plays back `results` one call at a time.
    /// Calls beyond the script return an empty buffer.
    pub fn script(results: Vec<Result<Vec<u8>, TtsError>>) -> Self {
        Self {
            script: std::sync::Mutex::new(results.into()),
            texts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Every text passed to [`speak`](SpeechSource::speak), in call order.
    pub fn seen_texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSource for MockSpeech {
    async fn speak(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        self.texts.lock().unwrap().push(text.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_credential_is_rotation_eligible() {
        assert!(TtsError::InvalidCredential("bad key".into()).is_credential());

        assert!(!TtsError::Request("refused".into()).is_credential());
        assert!(!TtsError::Timeout.is_credential());
        assert!(!TtsError::Parse("bad json".into()).is_credential());
        assert!(!TtsError::Provider("bad voice".into()).is_credential());
        assert!(!TtsError::NoCredentials.is_credential());
        assert!(!TtsError::CredentialsExhausted {
            tried: 3,
            last: "x".into()
        }
        .is_credential());
    }

    #[test]
    fn exhausted_error_mentions_count_and_last_error() {
        let e = TtsError::CredentialsExhausted {
            tried: 3,
            last: "API key rejected: expired".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains("expired"));
    }

    #[test]
    fn factory_selects_configured_provider() {
        let mut config = AppConfig::default();

        config.provider = TtsProvider::Gemini;
        assert_eq!(create_engine(&config).name(), "gemini");

        config.provider = TtsProvider::ElevenLabs;
        assert_eq!(create_engine(&config).name(), "elevenlabs");
    }

    #[tokio::test]
    async fn mock_speech_plays_script_in_order() {
        let mock = MockSpeech::script(vec![
            Ok(vec![1, 2]),
            Err(TtsError::Provider("boom".into())),
        ]);

        assert_eq!(mock.speak("a").await.unwrap(), vec![1, 2]);
        assert!(matches!(
            mock.speak("b").await.unwrap_err(),
            TtsError::Provider(_)
        ));
        assert_eq!(mock.seen_texts(), vec!["a", "b"]);
    }
}
