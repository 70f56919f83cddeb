//! vocast - Streaming text-to-speech delivery
//!
//! Turns synthesis requests into fixed-duration Opus frames for real-time
//! playback on voice-assistant edge devices, with a deferred-fetch path for
//! streamed synthesis and a local encode path for pre-recorded material.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod config;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod material;
pub mod net;
pub mod provider;
pub mod resolve;

// Audio pipeline
pub use audio::{DecodedAudio, FrameCodec, OpusFrame, PcmBuffer, decode_file};

// Deferred fetch plumbing
pub use descriptor::JobDescriptor;
pub use material::{Material, classify};
pub use net::{ChunkStream, DualStreamChannel, FetchError, StreamFetcher, bytes_only};

// Resolution and provider surface
pub use provider::{StreamingTtsProvider, SynthesisRequest, TtsProvider};
pub use resolve::{AudioSource, Resolved, Resolver};

// Error handling
pub use error::{Result, VocastError};

// Config
pub use config::{Config, StreamMode, SynthesisConfig};
