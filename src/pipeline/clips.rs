//! Plain-text mode — one independent clip per paragraph.
//!
//! No timing alignment applies here: each non-blank input line becomes its
//! own WAV, individually retrievable, in input order.  A line that
//! synthesizes to zero bytes is marked failed while its siblings still
//! render; a hard provider error aborts the whole run, matching the SRT
//! path.

use crate::audio::encode_wav;
use crate::tts::SpeechSource;

use super::{AssemblyOptions, PipelineError};

/// One generated (or failed) paragraph clip.
#[derive(Debug, Clone)]
pub struct Clip {
    /// 1-based position in the input.
    pub index: usize,
    /// The paragraph text that was spoken.
    pub text: String,
    /// The finished WAV, or `None` when synthesis produced no audio.
    pub wav: Option<Vec<u8>>,
}

/// Generate one clip per paragraph, sequentially in input order.
///
/// # Errors
///
/// - [`PipelineError::EmptyInput`] when `paragraphs` is empty.
/// - [`PipelineError::Synthesis`] on a hard provider failure — clips
///   generated so far are discarded with the run.
pub async fn generate_clips(
    paragraphs: &[String],
    speech: &dyn SpeechSource,
    options: &AssemblyOptions,
) -> Result<Vec<Clip>, PipelineError> {
    if paragraphs.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut clips = Vec::with_capacity(paragraphs.len());

    for (i, paragraph) in paragraphs.iter().enumerate() {
        if i > 0 && !options.min_interval.is_zero() {
            tokio::time::sleep(options.min_interval).await;
        }

        let text = format!("{}{}", options.instruction_prefix, paragraph);
        let pcm = speech.speak(&text).await?;

        let wav = if pcm.is_empty() {
            log::warn!("paragraph {} produced no audio; marking it failed", i + 1);
            None
        } else {
            Some(encode_wav(&pcm)?)
        };

        clips.push(Clip {
            index: i + 1,
            text: paragraph.clone(),
            wav,
        });
    }

    log::info!(
        "generated {}/{} paragraph clips",
        clips.iter().filter(|c| c.wav.is_some()).count(),
        clips.len()
    );

    Ok(clips)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::{MockSpeech, TtsError};

    fn paragraphs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_paragraph_list_is_rejected() {
        let speech = MockSpeech::script(vec![]);
        let err = generate_clips(&[], &speech, &AssemblyOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[tokio::test]
    async fn each_paragraph_becomes_an_ordered_wav_clip() {
        let input = paragraphs(&["First line", "Second line"]);
        let speech = MockSpeech::script(vec![Ok(vec![1u8, 2]), Ok(vec![3u8, 4])]);

        let clips = generate_clips(&input, &speech, &AssemblyOptions::default())
            .await
            .unwrap();

        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0].index, 1);
        assert_eq!(clips[0].text, "First line");
        assert_eq!(clips[1].index, 2);
        assert_eq!(clips[1].text, "Second line");

        let first = clips[0].wav.as_ref().expect("clip should have audio");
        let second = clips[1].wav.as_ref().expect("clip should have audio");
        assert_eq!(&first[0..4], b"RIFF");
        assert_eq!(&second[0..4], b"RIFF");
        assert_eq!(&first[44..], &[1, 2][..]);
        assert_eq!(&second[44..], &[3, 4][..]);
    }

    #[tokio::test]
    async fn empty_result_marks_that_clip_failed_but_siblings_render() {
        let input = paragraphs(&["ok", "silent", "also ok"]);
        let speech = MockSpeech::script(vec![
            Ok(vec![1u8, 1]),
            Ok(Vec::new()),
            Ok(vec![2u8, 2]),
        ]);

        let clips = generate_clips(&input, &speech, &AssemblyOptions::default())
            .await
            .unwrap();

        assert_eq!(clips.len(), 3);
        assert!(clips[0].wav.is_some());
        assert!(clips[1].wav.is_none());
        assert!(clips[2].wav.is_some());
    }

    #[tokio::test]
    async fn hard_error_aborts_the_whole_run() {
        let input = paragraphs(&["ok", "boom"]);
        let speech = MockSpeech::script(vec![
            Ok(vec![1u8, 1]),
            Err(TtsError::Provider("quota exceeded".into())),
        ]);

        let err = generate_clips(&input, &speech, &AssemblyOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Synthesis(_)));
    }

    #[tokio::test]
    async fn instruction_prefix_applies_to_every_paragraph() {
        let input = paragraphs(&["a", "b"]);
        let speech = MockSpeech::script(vec![Ok(vec![1u8, 1]), Ok(vec![2u8, 2])]);
        let options = AssemblyOptions {
            instruction_prefix: "Say: ".into(),
            ..AssemblyOptions::default()
        };

        generate_clips(&input, &speech, &options).await.unwrap();
        assert_eq!(speech.seen_texts(), vec!["Say: a", "Say: b"]);
    }
}
