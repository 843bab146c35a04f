//! Raw PCM buffer helpers.
//!
//! Every TTS provider in this crate delivers (or is asked to deliver) linear
//! 16-bit signed little-endian mono samples at 24 kHz.  The assembly pipeline
//! manipulates that audio as plain byte buffers: silence generation, ordered
//! concatenation, and duration arithmetic all happen here, ahead of the final
//! WAV framing in [`crate::audio::wav`].

// ---------------------------------------------------------------------------
// Format constants (fixed provider contract)
// ---------------------------------------------------------------------------

/// Sample rate of provider audio in Hz.
pub const SAMPLE_RATE: u32 = 24_000;
/// Bits per sample.
pub const BITS_PER_SAMPLE: u16 = 16;
/// Channel count (mono).
pub const NUM_CHANNELS: u16 = 1;
/// Bytes per sample (16-bit).
pub const BYTES_PER_SAMPLE: u32 = (BITS_PER_SAMPLE / 8) as u32;
/// Bytes of PCM per second of audio.
pub const BYTES_PER_SECOND: u32 = SAMPLE_RATE * NUM_CHANNELS as u32 * BYTES_PER_SAMPLE;

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Generate a zero-filled (silent) PCM buffer covering `duration_secs`.
///
/// The length is `round(duration_secs * 24000)` samples, so the result is
/// exact up to sample-rate quantization.  Non-positive durations yield an
/// empty buffer rather than an error — callers pass raw timing gaps here
/// and a negative gap simply means "no padding needed".
pub fn silence(duration_secs: f64) -> Vec<u8> {
    if duration_secs <= 0.0 {
        return Vec::new();
    }
    let samples = (duration_secs * SAMPLE_RATE as f64).round() as usize;
    vec![0u8; samples * BYTES_PER_SAMPLE as usize]
}

/// Concatenate PCM buffers byte-for-byte in input order.
pub fn concatenate(buffers: &[Vec<u8>]) -> Vec<u8> {
    let total: usize = buffers.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    for buf in buffers {
        out.extend_from_slice(buf);
    }
    out
}

/// Duration of a PCM buffer in seconds (`len / 48000.0` at the fixed format).
pub fn duration_secs(pcm: &[u8]) -> f64 {
    pcm.len() as f64 / BYTES_PER_SECOND as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
