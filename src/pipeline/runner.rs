//! Pipeline driver — input detection, mode dispatch, output writing.
//!
//! The runner owns everything around the two generation modes: deciding
//! whether a file is SRT or plain text, invoking the matching pipeline,
//! writing the resulting WAV(s) to disk, and the optional zip export of
//! paragraph clips.

use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::subtitle::{parse_srt, split_paragraphs};
use crate::tts::SpeechSource;

use super::{assemble, generate_clips, AssemblyOptions, AssemblyReport, Clip, PipelineError};

// ---------------------------------------------------------------------------
// Input detection
// ---------------------------------------------------------------------------

/// The two input formats the tool accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// SRT subtitles — one combined, timing-aligned WAV.
    Srt,
    /// Plain text — one WAV per non-blank line.
    PlainText,
}

/// Decide how to treat an input file: the `.srt` extension wins, otherwise
/// any `-->` in the content marks it as subtitles.
pub fn detect_input_kind(path: &Path, content: &str) -> InputKind {
    let srt_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("srt"));

    if srt_extension || content.contains("-->") {
        InputKind::Srt
    } else {
        InputKind::PlainText
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// What a finished generation run produced.
#[derive(Debug)]
pub enum GenerationOutput {
    /// SRT mode: the single combined track.
    Combined(AssemblyReport),
    /// Plain-text mode: one clip per paragraph.
    Clips(Vec<Clip>),
}

/// Run the pipeline for `content` in the given mode.
///
/// An SRT file that parses to zero cues is reported as
/// [`PipelineError::EmptyInput`] — the parser itself never errors, so this
/// is where "the whole file was invalid" becomes a user-facing failure.
pub async fn run(
    content: &str,
    kind: InputKind,
    speech: &dyn SpeechSource,
    options: &AssemblyOptions,
) -> Result<GenerationOutput, PipelineError> {
    match kind {
        InputKind::Srt => {
            let cues = parse_srt(content);
            if cues.is_empty() {
                return Err(PipelineError::EmptyInput);
            }
            log::info!("SRT mode: {} cues", cues.len());
            let report = assemble(&cues, speech, options).await?;
            Ok(GenerationOutput::Combined(report))
        }
        InputKind::PlainText => {
            let paragraphs = split_paragraphs(content);
            log::info!("text mode: {} paragraphs", paragraphs.len());
            let clips = generate_clips(&paragraphs, speech, options).await?;
            Ok(GenerationOutput::Clips(clips))
        }
    }
}

// ---------------------------------------------------------------------------
// Output writing
// ---------------------------------------------------------------------------

/// Write the run's WAV file(s) into `out_dir`, returning the paths written.
///
/// SRT mode produces `combined_audio.wav`; text mode produces
/// `segment_{n}.wav` per successful clip (failed clips are skipped — their
/// absence is visible in the returned paths).
pub fn write_outputs(
    output: &GenerationOutput,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, PipelineError> {
    std::fs::create_dir_all(out_dir)?;

    match output {
        GenerationOutput::Combined(report) => {
            let path = out_dir.join("combined_audio.wav");
            std::fs::write(&path, &report.wav)?;
            Ok(vec![path])
        }
        GenerationOutput::Clips(clips) => {
            let mut paths = Vec::new();
            for clip in clips {
                let Some(wav) = &clip.wav else { continue };
                let path = out_dir.join(format!("segment_{}.wav", clip.index));
                std::fs::write(&path, wav)?;
                paths.push(path);
            }
            Ok(paths)
        }
    }
}

/// Bundle the successful clips into a zip archive at `zip_path`.
///
/// Failures here are [`PipelineError::Packaging`]: the export is lost but
/// clips already written by [`write_outputs`] are untouched.
pub fn export_zip(clips: &[Clip], zip_path: &Path) -> Result<(), PipelineError> {
    let file = std::fs::File::create(zip_path)
        .map_err(|e| PipelineError::Packaging(format!("create {}: {e}", zip_path.display())))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for clip in clips {
        let Some(wav) = &clip.wav else { continue };
        writer
            .start_file(format!("segment_{}.wav", clip.index), options)
            .map_err(|e| PipelineError::Packaging(e.to_string()))?;
        writer
            .write_all(wav)
            .map_err(|e| PipelineError::Packaging(e.to_string()))?;
    }

    writer
        .finish()
        .map_err(|e| PipelineError::Packaging(e.to_string()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
