//! Audio source resolution.
//!
//! The playback step hands over a material path; the resolver sniffs it and
//! produces whichever source it holds. A deferred job descriptor becomes a
//! lazy network stream of already-encoded chunks; a literal audio container
//! is decoded, normalized, and encoded into a finite frame sequence up
//! front. Dispatch follows the sniffer's verdict exactly; there is no
//! fallback or retry across modes.

use crate::audio::{FrameCodec, OpusFrame, PcmBuffer, decode_file};
use crate::config::Config;
use crate::descriptor::JobDescriptor;
use crate::error::Result;
use crate::material::{Material, classify};
use crate::net::fetcher::{ChunkStream, StreamFetcher};
use std::path::Path;
use std::time::Duration;

/// Playable audio produced by resolution.
pub enum AudioSource {
    /// Lazy chunk sequence fetched from the network; chunks are opaque
    /// transport units, not frame-aligned.
    Stream(ChunkStream),
    /// Locally encoded frames, complete before playback starts.
    Frames(Vec<OpusFrame>),
}

/// A resolved source plus its duration in seconds.
///
/// For [`AudioSource::Frames`] the duration is measured from the decoded
/// sample count. For [`AudioSource::Stream`] it is only the configured
/// nominal estimate: the true duration is unknown until the stream has
/// been fully consumed.
pub struct Resolved {
    pub source: AudioSource,
    pub duration_secs: f64,
}

/// Turns material paths into playable audio sources.
pub struct Resolver {
    fetch_endpoint: String,
    timeout: Duration,
    nominal_stream_duration: f64,
}

impl Resolver {
    pub fn new(config: &Config) -> Self {
        Self {
            fetch_endpoint: config.synthesis.api_url.clone(),
            timeout: Duration::from_secs(config.http.timeout_secs),
            nominal_stream_duration: config.synthesis.nominal_stream_duration_secs,
        }
    }

    /// Resolve the material at `path`.
    ///
    /// Returns `Ok(None)` when the path does not exist; playback treats
    /// that as nothing to play. Decode and descriptor-parse failures are
    /// fatal to the request and surface as errors.
    pub fn resolve(&self, path: &Path) -> Result<Option<Resolved>> {
        match classify(path)? {
            Material::NotFound => Ok(None),
            Material::DeferredJob => {
                let descriptor = JobDescriptor::read(path)?;
                let fetcher = StreamFetcher::new(self.timeout)?;
                let stream =
                    fetcher.fetch(&self.fetch_endpoint, &descriptor.params, &descriptor.headers);

                Ok(Some(Resolved {
                    source: AudioSource::Stream(stream),
                    duration_secs: self.nominal_stream_duration,
                }))
            }
            Material::LiteralAudio => {
                let decoded = decode_file(path)?;
                let pcm = PcmBuffer::from_decoded(decoded);
                let codec = FrameCodec::new()?;
                let (frames, duration_secs) = codec.encode(&pcm)?;

                Ok(Some(Resolved {
                    source: AudioSource::Frames(frames),
                    duration_secs,
                }))
            }
        }
    }
}
