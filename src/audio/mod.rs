//! PCM buffer utilities and WAV container framing.
//!
//! All audio in this crate is linear PCM — 24 kHz, 16-bit, mono — matching
//! what the TTS providers return.  [`pcm`] covers silence generation,
//! concatenation and duration math over raw byte buffers; [`wav`] wraps a
//! finished buffer in the canonical 44-byte RIFF header.
//!
//! ```rust
//! use text_to_speech::audio::{duration_secs, encode_wav, silence};
//!
//! let pause = silence(0.5);
//! assert_eq!(duration_secs(&pause), 0.5);
//! let wav = encode_wav(&pause).unwrap();
//! assert_eq!(&wav[0..4], b"RIFF");
//! ```

pub mod pcm;
pub mod wav;

pub use pcm::{concatenate, duration_secs, silence, BYTES_PER_SECOND, SAMPLE_RATE};
pub use wav::encode_wav;
