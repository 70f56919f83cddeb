//! PCM to Opus frame encoding.
//!
//! Chops a normalized [`PcmBuffer`] into consecutive 60ms windows, zero-pads
//! the trailing window, and runs each through a stateful Opus encoder. The
//! reported duration always comes from the true decoded sample count, never
//! from the padded frame count.

use crate::audio::pcm::PcmBuffer;
use crate::defaults::{FRAME_SIZE, MAX_OPUS_PACKET};
use crate::error::{Result, VocastError};
use audiopus::coder::Encoder;
use audiopus::{Application, Channels, SampleRate};

/// One encoded Opus frame, representing exactly 60ms of audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpusFrame(Vec<u8>);

impl OpusFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Stateful Opus encoder fixed to the pipeline's 16kHz mono contract.
///
/// One codec instance serves one request; the resolver constructs a fresh
/// one per literal-audio materialization.
pub struct FrameCodec {
    encoder: Encoder,
}

impl FrameCodec {
    pub fn new() -> Result<Self> {
        let encoder = Encoder::new(SampleRate::Hz16000, Channels::Mono, Application::Audio)
            .map_err(|e| VocastError::Encode {
                message: format!("Failed to create Opus encoder: {}", e),
            })?;

        Ok(Self { encoder })
    }

    /// Encode a whole buffer into 60ms frames.
    ///
    /// Returns `ceil(samples / 960)` frames in input order, plus the
    /// duration in seconds computed from the unpadded sample count.
    pub fn encode(&self, pcm: &PcmBuffer) -> Result<(Vec<OpusFrame>, f64)> {
        let duration = pcm.duration_secs();

        let mut frames = Vec::with_capacity(pcm.len().div_ceil(FRAME_SIZE));
        for window in pcm.samples().chunks(FRAME_SIZE) {
            if window.len() == FRAME_SIZE {
                frames.push(self.encode_window(window)?);
            } else {
                frames.push(self.encode_window(&pad_window(window))?);
            }
        }

        Ok((frames, duration))
    }

    /// Encode one full 960-sample window.
    fn encode_window(&self, window: &[i16]) -> Result<OpusFrame> {
        let mut output = vec![0u8; MAX_OPUS_PACKET];
        let encoded_len =
            self.encoder
                .encode(window, &mut output)
                .map_err(|e| VocastError::Encode {
                    message: format!("Opus encode error: {}", e),
                })?;

        output.truncate(encoded_len);
        Ok(OpusFrame(output))
    }
}

/// Zero-pad a short trailing window up to the full frame size.
fn pad_window(window: &[i16]) -> Vec<i16> {
    let mut padded = vec![0i16; FRAME_SIZE];
    padded[..window.len()].copy_from_slice(window);
    padded
}
