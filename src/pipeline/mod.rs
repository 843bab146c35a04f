//! Generation pipeline — from parsed input to playable WAV bytes.
//!
//! # Architecture
//!
//! ```text
//! input file content
//!        │
//!        ├─ SRT mode ──▶ parse_srt ──▶ assembler::assemble
//!        │                │  per cue: gap silence → speak → append → clock
//!        │                └─▶ one combined WAV
//!        │
//!        └─ text mode ─▶ split_paragraphs ──▶ clips::generate_clips
//!                         │  per line: speak → encode
//!                         └─▶ one WAV per line (individually retrievable)
//!
//! runner::run dispatches between the modes; runner::write_outputs and
//! runner::export_zip put the results on disk.
//! ```
//!
//! Both modes issue provider calls strictly one at a time, in item order,
//! separated by the configured pacing interval.  The SRT mode depends on
//! that ordering for its running clock; the text mode simply inherits it.

pub mod assembler;
pub mod clips;
pub mod runner;

use thiserror::Error;

use crate::tts::TtsError;

pub use assembler::{assemble, AssemblyOptions, AssemblyReport};
pub use clips::{generate_clips, Clip};
pub use runner::{detect_input_kind, export_zip, run, write_outputs, GenerationOutput, InputKind};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that abort a generation run (or its export step).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input parsed to zero cues / zero paragraphs — an invalid file
    /// from the user's point of view.
    #[error("no readable cues or paragraphs found in the input")]
    EmptyInput,

    /// A hard synthesis failure (non-credential provider error, or every
    /// API key exhausted).  Partial audio from the run is discarded.
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    /// WAV framing failed.
    #[error("failed to encode WAV output: {0}")]
    Encode(String),

    /// Building the clip archive failed.  Only the export step is lost —
    /// clips already written to disk remain usable.
    #[error("failed to package clips: {0}")]
    Packaging(String),

    /// Filesystem failure while writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for PipelineError {
    fn from(e: hound::Error) -> Self {
        PipelineError::Encode(e.to_string())
    }
}
