//! SRT-synchronized audio assembly — the core of the crate.
//!
//! Walks the cue sequence once, strictly in order, keeping a running clock
//! of how much timeline the emitted audio already covers:
//!
//! 1. If the next cue starts later than the clock, pad with silence so the
//!    cue's spoken audio begins at its subtitle timestamp.
//! 2. Synthesize the cue text (instruction prefix included).
//! 3. Append the speech and advance the clock by the *actual* rendered
//!    duration — TTS output length is unpredictable, so anchoring each
//!    cue's start to its timestamp while advancing by real duration keeps
//!    drift from accumulating without audio overlapping the next cue more
//!    than necessary.
//!
//! A cue that synthesizes to zero bytes is replaced by silence spanning the
//! cue's own subtitle duration, and the clock advances over it.  The
//! combined track therefore keeps the subtitle file's timeline instead of
//! silently shortening whenever one cue fails to render.
//!
//! Any hard synthesis error aborts the whole run; accumulated audio is
//! discarded.

use std::time::Duration;

use crate::audio::{concatenate, duration_secs, encode_wav, silence};
use crate::subtitle::SubtitleCue;
use crate::tts::SpeechSource;

use super::PipelineError;

// ---------------------------------------------------------------------------
// Options / report
// ---------------------------------------------------------------------------

/// Driver parameters for a generation run (both modes).
#[derive(Debug, Clone, Default)]
pub struct AssemblyOptions {
    /// Verbal steering prefix prepended to every request text.  Empty for
    /// providers whose voices take no verbal instructions.
    pub instruction_prefix: String,
    /// Minimum pause between consecutive provider calls (rate limiting).
    /// This is a scheduling concern of the driver loop — the assembly
    /// arithmetic never sees it.
    pub min_interval: Duration,
}

impl AssemblyOptions {
    /// Derive the run options from application config.
    ///
    /// Gemini voices are steered by a verbal prefix in the request text;
    /// ElevenLabs voices are shaped through structured settings instead, so
    /// their prefix stays empty.
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        let instruction_prefix = match config.provider {
            crate::config::TtsProvider::Gemini => {
                config.gemini.instruction_prefix().to_string()
            }
            crate::config::TtsProvider::ElevenLabs => String::new(),
        };
        Self {
            instruction_prefix,
            min_interval: Duration::from_millis(config.pacing.min_interval_ms),
        }
    }
}

/// Outcome of a completed SRT assembly run.
#[derive(Debug)]
pub struct AssemblyReport {
    /// The finished WAV file (header + combined PCM).
    pub wav: Vec<u8>,
    /// Number of cues processed.
    pub cue_count: usize,
    /// Cues that produced no audio and were padded with silence instead.
    pub skipped: usize,
    /// Final position of the running clock, in seconds.
    pub final_clock_secs: f64,
}

// ---------------------------------------------------------------------------
// assemble
// ---------------------------------------------------------------------------

/// Assemble one combined WAV from `cues`, preserving subtitle timing.
///
/// # Errors
///
/// - [`PipelineError::EmptyInput`] when `cues` is empty.
/// - [`PipelineError::Synthesis`] on any hard provider failure — the run
///   aborts and partial audio is dropped.
pub async fn assemble(
    cues: &[SubtitleCue],
    speech: &dyn SpeechSource,
    options: &AssemblyOptions,
) -> Result<AssemblyReport, PipelineError> {
    if cues.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut chunks: Vec<Vec<u8>> = Vec::with_capacity(cues.len() * 2);
    let mut clock = 0.0f64;
    let mut skipped = 0usize;

    for (i, cue) in cues.iter().enumerate() {
        if i > 0 && !options.min_interval.is_zero() {
            tokio::time::sleep(options.min_interval).await;
        }

        // Silence up to the cue's scheduled start.  A negative gap means the
        // previous speech overran; nothing is inserted and the cue simply
        // starts late.
        let gap = cue.start_secs - clock;
        if gap > 0.0 {
            chunks.push(silence(gap));
        }

        let text = format!("{}{}", options.instruction_prefix, cue.text);
        let pcm = speech.speak(&text).await?;

        if pcm.is_empty() {
            let span = cue.duration_secs();
            log::warn!(
                "cue {} ({:.3}s) produced no audio; padding {span:.3}s of silence",
                cue.index,
                cue.start_secs
            );
            chunks.push(silence(span));
            clock = cue.start_secs + span;
            skipped += 1;
            continue;
        }

        let rendered = duration_secs(&pcm);
        log::debug!(
            "cue {}/{}: start {:.3}s, rendered {rendered:.3}s",
            cue.index,
            cues.len(),
            cue.start_secs
        );
        chunks.push(pcm);
        clock = cue.start_secs + rendered;
    }

    let combined = concatenate(&chunks);
    let wav = encode_wav(&combined)?;

    log::info!(
        "assembled {} cues ({} padded) into {:.3}s of audio",
        cues.len(),
        skipped,
        duration_secs(&combined)
    );

    Ok(AssemblyReport {
        wav,
        cue_count: cues.len(),
        skipped,
        final_clock_secs: clock,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
