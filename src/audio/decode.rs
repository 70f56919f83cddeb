//! Literal audio container decoding.
//!
//! Pre-recorded material arrives as whatever container the operator dropped
//! in (wav, mp3, ogg, m4a, ...). WAV is read directly with `hound`; every
//! other container goes through symphonia's probe-and-decode path. Both
//! backends produce the same interleaved output, which [`crate::audio::pcm`]
//! then normalizes.

use crate::error::{Result, VocastError};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Interleaved 16-bit samples straight out of a container, before any
/// downmix or resample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Decode an on-disk audio container to interleaved 16-bit PCM.
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("wav") => decode_wav(path),
        _ => decode_compressed(path, extension.as_deref()),
    }
}

/// Read a WAV container with hound.
fn decode_wav(path: &Path) -> Result<DecodedAudio> {
    let mut reader = hound::WavReader::open(path).map_err(|e| VocastError::Decode {
        message: format!("Failed to parse WAV file: {}", e),
    })?;

    let spec = reader.spec();
    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| VocastError::Decode {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Probe and decode a compressed container with symphonia.
fn decode_compressed(path: &Path, extension: Option<&str>) -> Result<DecodedAudio> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| VocastError::Decode {
            message: format!("Unrecognized audio container: {}", e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| VocastError::Decode {
            message: "No decodable audio track".to_string(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| VocastError::Decode {
            message: "Track does not declare a sample rate".to_string(),
        })?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| VocastError::Decode {
            message: format!("Unsupported codec: {}", e),
        })?;

    let mut samples: Vec<i16> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => {
                return Err(VocastError::Decode {
                    message: format!("Failed reading packet: {}", e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if sample_buf.is_none() {
                    let spec = *decoded.spec();
                    sample_buf = Some(SampleBuffer::<i16>::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            // Recoverable per-packet errors: skip the packet, keep decoding.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => {
                return Err(VocastError::Decode {
                    message: format!("Decode failed: {}", e),
                });
            }
        }
    }

    if samples.is_empty() {
        return Err(VocastError::Decode {
            message: "Container produced no audio samples".to_string(),
        });
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}
