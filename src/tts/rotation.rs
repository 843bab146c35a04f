//! Key rotation — route around rejected API keys.
//!
//! [`KeyRing`] holds the ordered credential list and the index of the
//! active (preferred) key.  [`KeyRing::call_with_rotation`] starts at the
//! active key and tries each key at most once, wrapping around the list.
//! A success promotes the winning key to active, so subsequent calls skip
//! keys that are already known to be bad.  Only credential-category errors
//! trigger rotation — any other failure surfaces immediately, because
//! rotation exists to route around bad keys, not to mask unrelated faults.
//!
//! [`RotatingEngine`] packages a [`TtsEngine`] with a ring and exposes the
//! credential-free [`SpeechSource`] interface the pipeline consumes.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{SpeechSource, TtsEngine, TtsError};

// ---------------------------------------------------------------------------
// KeyRing
// ---------------------------------------------------------------------------

/// Ordered API keys plus the sticky "active" pointer.
///
/// The pointer is atomic: the SRT path only ever has one call in flight,
/// but the paragraph path is allowed to run requests concurrently, and two
/// concurrent successes must not corrupt the index.
#[derive(Debug)]
pub struct KeyRing {
    keys: Vec<String>,
    active: AtomicUsize,
}

impl KeyRing {
    /// Build a ring from `keys`, starting rotation at `active_index`.
    ///
    /// Fails fast with [`TtsError::NoCredentials`] when `keys` is empty —
    /// a misconfiguration, not something rotation can recover from.
    /// An out-of-range `active_index` is clamped to the last key.
    pub fn new(keys: Vec<String>, active_index: usize) -> Result<Self, TtsError> {
        if keys.is_empty() {
            return Err(TtsError::NoCredentials);
        }
        let active = active_index.min(keys.len() - 1);
        Ok(Self {
            keys,
            active: AtomicUsize::new(active),
        })
    }

    /// Number of keys in the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Index of the currently active key.
    pub fn active_index(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Run `attempt` with each key in rotation order until one succeeds.
    ///
    /// - Starts at the active key, wraps around, tries each key once.
    /// - On success the winning key becomes active (sticky routing).
    /// - A non-credential error aborts rotation immediately.
    /// - If every key fails on credential grounds, returns
    ///   [`TtsError::CredentialsExhausted`] carrying the last error.
    pub async fn call_with_rotation<T, F, Fut>(&self, mut attempt: F) -> Result<T, TtsError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, TtsError>>,
    {
        let start = self.active.load(Ordering::SeqCst);
        let mut last_error: Option<TtsError> = None;

        for offset in 0..self.keys.len() {
            let index = (start + offset) % self.keys.len();

            match attempt(self.keys[index].clone()).await {
                Ok(value) => {
                    self.active.store(index, Ordering::SeqCst);
                    return Ok(value);
                }
                Err(e) if e.is_credential() => {
                    log::warn!(
                        "API key {}/{} rejected, rotating: {e}",
                        index + 1,
                        self.keys.len()
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(TtsError::CredentialsExhausted {
            tried: self.keys.len(),
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".into()),
        })
    }
}

// ---------------------------------------------------------------------------
// RotatingEngine
// ---------------------------------------------------------------------------

/// A [`TtsEngine`] paired with a [`KeyRing`], exposed as a [`SpeechSource`].
///
/// Every [`speak`](SpeechSource::speak) call runs the engine through key
/// rotation, so the pipeline never sees credentials at all.
pub struct RotatingEngine {
    engine: Box<dyn TtsEngine>,
    ring: KeyRing,
}

impl RotatingEngine {
    pub fn new(engine: Box<dyn TtsEngine>, ring: KeyRing) -> Self {
        Self { engine, ring }
    }

    /// The underlying key ring (the CLI persists the promoted active key
    /// after a run).
    pub fn ring(&self) -> &KeyRing {
        &self.ring
    }
}

#[async_trait]
impl SpeechSource for RotatingEngine {
    async fn speak(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let engine = self.engine.as_ref();
        self.ring
            .call_with_rotation(|key| async move { engine.synthesize(text, &key).await })
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
