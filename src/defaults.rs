//! Default constants for vocast.
//!
//! Shared constants used across the delivery pipeline so the codec, sniffer,
//! and provider stay in agreement about the audio contract.

/// Audio sample rate in Hz.
///
/// 16kHz mono is the format voice-assistant edge devices expect; every
/// decoded container is normalized to this rate before Opus encoding.
pub const SAMPLE_RATE: u32 = 16000;

/// Duration of one Opus frame in milliseconds.
///
/// 60ms is the atomic playback unit on the device side. Frames are always
/// exactly this long; the trailing frame of a clip is zero-padded up to it.
pub const FRAME_DURATION_MS: u32 = 60;

/// Samples per Opus frame at [`SAMPLE_RATE`].
///
/// 16000 Hz * 60 ms / 1000 = 960 samples (1920 bytes of 16-bit PCM).
pub const FRAME_SIZE: usize = (SAMPLE_RATE as usize * FRAME_DURATION_MS as usize) / 1000;

/// Upper bound on a single encoded Opus packet in bytes.
pub const MAX_OPUS_PACKET: usize = 4000;

/// Marker token identifying a deferred job descriptor file.
///
/// Written as the first line of the descriptor. The marker line, including
/// its newline, is exactly [`MARKER_LINE_LEN`] bytes so the sniffer can
/// classify a file from a fixed-size prefix read. Literal audio containers
/// never start with these bytes.
pub const DESCRIPTOR_MARKER: &str = "http_post";

/// Byte length of the marker line (marker plus newline).
pub const MARKER_LINE_LEN: usize = DESCRIPTOR_MARKER.len() + 1;

/// Connect/read timeout for streaming fetches, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Nominal duration reported for deferred-stream material, in seconds.
///
/// The true duration of a network stream is unknown until it has been fully
/// consumed, so the resolver reports this estimate instead of a measurement.
pub const NOMINAL_STREAM_DURATION_SECS: f64 = 100.0;
