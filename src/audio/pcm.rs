//! Normalized PCM buffers.
//!
//! Everything downstream of the decoder works on one fixed format: mono,
//! 16-bit signed little-endian samples at 16kHz. This module owns the
//! downmix and resample steps that get arbitrary decoded audio into that
//! shape.

use crate::audio::decode::DecodedAudio;
use crate::defaults::SAMPLE_RATE;

/// A buffer of mono 16-bit samples at [`SAMPLE_RATE`].
///
/// Invariant: `byte_len() == len() * 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    samples: Vec<i16>,
}

impl PcmBuffer {
    /// Wrap samples that are already mono 16kHz.
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Normalize decoded audio: downmix to mono, then resample to 16kHz.
    pub fn from_decoded(audio: DecodedAudio) -> Self {
        let mono = if audio.channels > 1 {
            downmix(&audio.samples, audio.channels)
        } else {
            audio.samples
        };

        let samples = if audio.sample_rate != SAMPLE_RATE {
            resample(&mono, audio.sample_rate, SAMPLE_RATE)
        } else {
            mono
        };

        Self { samples }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of the buffer viewed as 16-bit little-endian bytes.
    pub fn byte_len(&self) -> usize {
        self.samples.len() * 2
    }

    /// Playback duration in seconds, derived from the true sample count.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }
}

/// Average interleaved channels down to mono.
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
