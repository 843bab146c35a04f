//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), per-provider sub-configs,
//! `KeyStore` (the persisted API-key lists), `AppPaths` for cross-platform
//! data directories, and TOML/JSON persistence via the respective
//! `load` / `save` methods.

pub mod keys;
pub mod paths;
pub mod settings;

pub use keys::{ApiKey, KeyStore, ProviderKeys};
pub use paths::AppPaths;
pub use settings::{
    AppConfig, ElevenLabsConfig, GeminiConfig, PacingConfig, SpeechLanguage, TtsProvider,
    VietnameseRegion,
};
