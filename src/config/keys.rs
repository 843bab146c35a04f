//! Provider credential store (`keys.json`).
//!
//! Each provider keeps an ordered list of API keys plus a designated active
//! entry.  The rotation wrapper starts from the active key and promotes
//! whichever key succeeds, so the list order doubles as the rotation order.
//! Keys are persisted as JSON next to `settings.toml` and are never written
//! into any emitted audio artifact.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{AppPaths, TtsProvider};

// ---------------------------------------------------------------------------
// ApiKey / ProviderKeys
// ---------------------------------------------------------------------------

/// One stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// Stable identifier used by the CLI `keys remove` / `keys use` commands.
    pub id: u64,
    /// The opaque secret itself.
    pub key: String,
}

/// The ordered credential list for a single provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderKeys {
    pub keys: Vec<ApiKey>,
    /// Identifier of the preferred key for new calls; `None` when empty.
    pub active_id: Option<u64>,
}

impl ProviderKeys {
    /// Append a key and return its assigned id.
    ///
    /// The first key ever added automatically becomes the active one.
    pub fn add(&mut self, key: impl Into<String>) -> u64 {
        let id = self.keys.iter().map(|k| k.id).max().unwrap_or(0) + 1;
        self.keys.push(ApiKey {
            id,
            key: key.into(),
        });
        if self.active_id.is_none() {
            self.active_id = Some(id);
        }
        id
    }

    /// Remove the key with `id`.  Returns `false` when no such key exists.
    ///
    /// Removing the active key promotes the first remaining key (or clears
    /// the active marker when the list becomes empty).
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k.id != id);
        if self.keys.len() == before {
            return false;
        }
        if self.active_id == Some(id) {
            self.active_id = self.keys.first().map(|k| k.id);
        }
        true
    }

    /// Mark the key with `id` as active.  Returns `false` when absent.
    pub fn set_active(&mut self, id: u64) -> bool {
        if self.keys.iter().any(|k| k.id == id) {
            self.active_id = Some(id);
            true
        } else {
            false
        }
    }

    /// Position of the active key in the list (0 when unset or missing).
    pub fn active_index(&self) -> usize {
        self.active_id
            .and_then(|id| self.keys.iter().position(|k| k.id == id))
            .unwrap_or(0)
    }

    /// The secrets in list order — the rotation wrapper's input.
    pub fn secrets(&self) -> Vec<String> {
        self.keys.iter().map(|k| k.key.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ---------------------------------------------------------------------------
// KeyStore  (top-level, persisted)
// ---------------------------------------------------------------------------

/// All stored credentials, keyed by provider.  Serialised as `keys.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStore {
    pub gemini: ProviderKeys,
    pub elevenlabs: ProviderKeys,
}

impl KeyStore {
    /// Load the store from the platform-appropriate `keys.json`.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().keys_file)
    }

    /// Load from an explicit path (useful for tests).
    ///
    /// A missing file yields an empty store; a corrupted file is cleared,
    /// logged, and likewise replaced by an empty store.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(store) => Ok(store),
            Err(e) => {
                log::warn!(
                    "key store {} is corrupted ({e}); clearing it",
                    path.display()
                );
                let _ = std::fs::remove_file(path);
                Ok(Self::default())
            }
        }
    }

    /// Save the store to the platform-appropriate `keys.json`.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().keys_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The credential list for `provider`.
    pub fn for_provider(&self, provider: TtsProvider) -> &ProviderKeys {
        match provider {
            TtsProvider::Gemini => &self.gemini,
            TtsProvider::ElevenLabs => &self.elevenlabs,
        }
    }

    /// Mutable variant of [`for_provider`](Self::for_provider).
    pub fn for_provider_mut(&mut self, provider: TtsProvider) -> &mut ProviderKeys {
        match provider {
            TtsProvider::Gemini => &mut self.gemini,
            TtsProvider::ElevenLabs => &mut self.elevenlabs,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
