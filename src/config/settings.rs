//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! There is no schema versioning: a settings file that fails to parse is
//! logged, removed, and replaced by defaults on the next save.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// TtsProvider
// ---------------------------------------------------------------------------

/// Selects which TTS backend synthesizes speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    /// Google Gemini TTS (`models/{model}:generateContent`, audio modality).
    Gemini,
    /// ElevenLabs (`/v1/text-to-speech/{voice}`).
    ElevenLabs,
}

impl Default for TtsProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

// ---------------------------------------------------------------------------
// SpeechLanguage / VietnameseRegion
// ---------------------------------------------------------------------------

/// Target speech language for the Gemini voice-steering prefix.
///
/// Gemini voices take a spoken-language hint as a plain instruction in the
/// request text.  Vietnamese input additionally selects a regional accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechLanguage {
    /// Vietnamese — the accent is steered by [`VietnameseRegion`].
    Vietnam,
    /// Any other language; the voice auto-detects from the text.
    Other,
}

impl Default for SpeechLanguage {
    fn default() -> Self {
        Self::Other
    }
}

/// Regional Vietnamese accent steering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VietnameseRegion {
    /// Northern accent.
    Bac,
    /// Central accent.
    Trung,
    /// Southern accent.
    Nam,
}

impl Default for VietnameseRegion {
    fn default() -> Self {
        Self::Bac
    }
}

// ---------------------------------------------------------------------------
// GeminiConfig
// ---------------------------------------------------------------------------

/// Settings for the Gemini TTS backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model identifier sent to the API.
    pub model: String,
    /// Prebuilt voice name (e.g. `"kore"`, `"puck"`, `"charon"`).
    pub voice: String,
    /// Language selection driving the instruction prefix.
    pub language: SpeechLanguage,
    /// Vietnamese regional accent (ignored unless `language` is `Vietnam`).
    pub region: VietnameseRegion,
    /// Maximum seconds to wait for a synthesis response.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-preview-tts".into(),
            voice: "kore".into(),
            language: SpeechLanguage::default(),
            region: VietnameseRegion::default(),
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    /// The verbal steering prefix prepended to every request text.
    ///
    /// Gemini voices respond to plain-language instructions, so accent and
    /// reading style are requested in the text itself.
    pub fn instruction_prefix(&self) -> &'static str {
        match self.language {
            SpeechLanguage::Other => "Hãy đọc đoạn văn sau: ",
            SpeechLanguage::Vietnam => match self.region {
                VietnameseRegion::Bac => "Nói bằng giọng miền Bắc: ",
                VietnameseRegion::Trung => "Nói bằng giọng miền Trung: ",
                VietnameseRegion::Nam => "Nói bằng giọng miền Nam: ",
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ElevenLabsConfig
// ---------------------------------------------------------------------------

/// Settings for the ElevenLabs backend.
///
/// ElevenLabs voices do not benefit from a verbal steering prefix, so no
/// language/region instruction applies here; shaping happens through the
/// structured `voice_settings` fields instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    /// API base URL — override for proxies or regional endpoints.
    pub base_url: String,
    /// Voice identifier.
    pub voice_id: String,
    /// Model identifier (must support text-to-speech).
    pub model_id: String,
    /// Voice stability (0.0 – 1.0).
    pub stability: f32,
    /// Similarity boost (0.0 – 1.0).
    pub similarity_boost: f32,
    /// Optional ISO language hint — some newer models use it.
    pub language_code: Option<String>,
    /// Maximum seconds to wait for a synthesis response.
    pub timeout_secs: u64,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".into(),
            voice_id: "21m00Tcm4TlvDq8ikWAM".into(), // Rachel
            model_id: "eleven_multilingual_v2".into(),
            stability: 0.5,
            similarity_boost: 0.75,
            language_code: None,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// PacingConfig
// ---------------------------------------------------------------------------

/// Scheduling policy for successive provider calls.
///
/// Rate-limited providers need a pause between requests.  This lives with
/// the pipeline driver, not the synthesis logic, so it can be tuned (or set
/// to zero in tests) without touching the assembly algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum milliseconds between the start of consecutive provider calls.
    pub min_interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1_000,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use text_to_speech::config::AppConfig;
///
/// // Load (returns Default when the file is missing or corrupted)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Selected TTS provider.
    pub provider: TtsProvider,
    /// Gemini backend settings.
    pub gemini: GeminiConfig,
    /// ElevenLabs backend settings.
    pub elevenlabs: ElevenLabsConfig,
    /// Inter-request pacing.
    pub pacing: PacingConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    ///
    /// A file that exists but fails to parse is treated as corrupted: the
    /// file is removed, a warning is logged, and defaults are returned.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                log::warn!(
                    "settings file {} is corrupted ({e}); clearing it and using defaults",
                    path.display()
                );
                let _ = std::fs::remove_file(path);
                Ok(Self::default())
            }
        }
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.provider, loaded.provider);

        assert_eq!(original.gemini.model, loaded.gemini.model);
        assert_eq!(original.gemini.voice, loaded.gemini.voice);
        assert_eq!(original.gemini.language, loaded.gemini.language);
        assert_eq!(original.gemini.region, loaded.gemini.region);
        assert_eq!(original.gemini.timeout_secs, loaded.gemini.timeout_secs);

        assert_eq!(original.elevenlabs.base_url, loaded.elevenlabs.base_url);
        assert_eq!(original.elevenlabs.voice_id, loaded.elevenlabs.voice_id);
        assert_eq!(original.elevenlabs.model_id, loaded.elevenlabs.model_id);
        assert_eq!(original.elevenlabs.stability, loaded.elevenlabs.stability);
        assert_eq!(
            original.elevenlabs.similarity_boost,
            loaded.elevenlabs.similarity_boost
        );
        assert_eq!(
            original.elevenlabs.language_code,
            loaded.elevenlabs.language_code
        );

        assert_eq!(original.pacing.min_interval_ms, loaded.pacing.min_interval_ms);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.provider, default.provider);
        assert_eq!(config.gemini.model, default.gemini.model);
        assert_eq!(config.elevenlabs.voice_id, default.elevenlabs.voice_id);
    }

    /// A corrupted settings file is cleared and replaced by defaults.
    #[test]
    fn load_corrupted_clears_file_and_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "provider = [this is not toml").expect("write");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.provider, TtsProvider::default());
        assert!(!path.exists(), "corrupted file should have been removed");
    }

    /// Verify default values.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.provider, TtsProvider::Gemini);
        assert_eq!(cfg.gemini.model, "gemini-2.5-flash-preview-tts");
        assert_eq!(cfg.gemini.voice, "kore");
        assert_eq!(cfg.gemini.language, SpeechLanguage::Other);
        assert_eq!(cfg.elevenlabs.base_url, "https://api.elevenlabs.io");
        assert_eq!(cfg.elevenlabs.model_id, "eleven_multilingual_v2");
        assert_eq!(cfg.elevenlabs.stability, 0.5);
        assert_eq!(cfg.elevenlabs.similarity_boost, 0.75);
        assert!(cfg.elevenlabs.language_code.is_none());
        assert_eq!(cfg.pacing.min_interval_ms, 1_000);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.provider = TtsProvider::ElevenLabs;
        cfg.gemini.voice = "puck".into();
        cfg.gemini.language = SpeechLanguage::Vietnam;
        cfg.gemini.region = VietnameseRegion::Nam;
        cfg.elevenlabs.base_url = "https://proxy.example.com".into();
        cfg.elevenlabs.language_code = Some("vi".into());
        cfg.pacing.min_interval_ms = 250;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.provider, TtsProvider::ElevenLabs);
        assert_eq!(loaded.gemini.voice, "puck");
        assert_eq!(loaded.gemini.language, SpeechLanguage::Vietnam);
        assert_eq!(loaded.gemini.region, VietnameseRegion::Nam);
        assert_eq!(loaded.elevenlabs.base_url, "https://proxy.example.com");
        assert_eq!(loaded.elevenlabs.language_code.as_deref(), Some("vi"));
        assert_eq!(loaded.pacing.min_interval_ms, 250);
    }

    // --- instruction prefix ---

    #[test]
    fn non_vietnamese_prefix_is_generic_read_instruction() {
        let cfg = GeminiConfig::default();
        assert_eq!(cfg.instruction_prefix(), "Hãy đọc đoạn văn sau: ");
    }

    #[test]
    fn vietnamese_prefix_follows_region() {
        let mut cfg = GeminiConfig {
            language: SpeechLanguage::Vietnam,
            ..GeminiConfig::default()
        };

        cfg.region = VietnameseRegion::Bac;
        assert_eq!(cfg.instruction_prefix(), "Nói bằng giọng miền Bắc: ");
        cfg.region = VietnameseRegion::Trung;
        assert_eq!(cfg.instruction_prefix(), "Nói bằng giọng miền Trung: ");
        cfg.region = VietnameseRegion::Nam;
        assert_eq!(cfg.instruction_prefix(), "Nói bằng giọng miền Nam: ");
    }
}
