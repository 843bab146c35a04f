//! Text-to-speech generation from plain-text and SRT subtitle files.
//!
//! # Architecture
//!
//! ```text
//! input file ──▶ subtitle::parse_srt / split_paragraphs
//!                      │
//!                      ▼
//!            pipeline::runner::run
//!                      │ per cue/paragraph
//!                      ▼
//!            tts::RotatingEngine (key rotation)
//!                      │
//!                      ▼
//!            tts::GeminiEngine / ElevenLabsEngine ──▶ raw PCM
//!                      │
//!                      ▼
//!            audio::{silence, concatenate, encode_wav} ──▶ WAV file(s)
//! ```
//!
//! SRT input yields a single combined track whose cues start at their
//! subtitle timestamps (gaps are padded with silence); plain text yields
//! one independent clip per line.  Credentials live in
//! [`config::KeyStore`] and rotate automatically when a provider rejects
//! one — see [`tts::rotation`].

pub mod audio;
pub mod config;
pub mod pipeline;
pub mod subtitle;
pub mod tts;
