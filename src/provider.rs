//! Provider surface consumed by the playback subsystem.
//!
//! `synthesize` is cheap: it persists a deferred job descriptor and returns
//! immediately, without touching the network. `materialize` later turns the
//! material path into playable audio through the resolver. Interactive
//! turns bypass the descriptor entirely via [`StreamingTtsProvider::double_stream`].
//!
//! Inputs are assumed to be already authorized; the provider only attaches
//! the configured bearer token to outgoing requests.

use crate::config::{Config, StreamMode};
use crate::descriptor::JobDescriptor;
use crate::error::Result;
use crate::net::bearer_headers;
use crate::net::dual::DualStreamChannel;
use crate::net::fetcher::ChunkStream;
use crate::resolve::{Resolved, Resolver};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One immutable synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub sample_rate: u32,
    pub audio_format: String,
    pub instruct_text: Option<String>,
    pub mode: StreamMode,
}

impl SynthesisRequest {
    /// Wire parameters for the single-stream synthesis endpoint.
    pub fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("tts_text".to_string(), json!(self.text));
        params.insert("spk_id".to_string(), json!(self.voice));
        // The endpoint expects this misspelled key.
        params.insert(
            "frame_durition".to_string(),
            json!(crate::defaults::FRAME_DURATION_MS),
        );
        params.insert("stream".to_string(), json!("true"));
        params.insert("target_sr".to_string(), json!(self.sample_rate));
        params.insert("audio_format".to_string(), json!(self.audio_format));
        if let Some(instruct) = &self.instruct_text {
            params.insert("instruct_text".to_string(), json!(instruct));
        }
        params
    }
}

/// The contract the playback subsystem consumes.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    /// Describe the synthesis of `text` at `out_path`.
    ///
    /// Writes a deferred job descriptor; no network call happens here.
    async fn synthesize(&self, text: &str, out_path: &Path) -> Result<()>;

    /// Turn previously written material into a playable source.
    async fn materialize(&self, path: &Path) -> Result<Option<Resolved>>;
}

/// Provider backed by a streaming HTTP synthesis service.
pub struct StreamingTtsProvider {
    config: Config,
    resolver: Resolver,
}

impl StreamingTtsProvider {
    pub fn new(config: Config) -> Self {
        let resolver = Resolver::new(&config);
        Self { config, resolver }
    }

    /// Build the immutable request for one piece of text.
    pub fn request_for(&self, text: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice: self.config.synthesis.voice.clone(),
            sample_rate: self.config.synthesis.sample_rate,
            audio_format: "opus".to_string(),
            instruct_text: self.config.synthesis.instruct_text.clone(),
            mode: self.config.synthesis.stream_mode,
        }
    }

    /// A fresh material path under the configured output directory.
    pub fn generate_filename(&self) -> PathBuf {
        let date = chrono::Utc::now().format("%Y-%m-%d");
        let id = uuid::Uuid::new_v4().simple();
        self.config
            .synthesis
            .output_dir
            .join(format!("tts-{}@{}.wav", date, id))
    }

    /// Open the interactive double-stream channel for one turn.
    pub fn double_stream(&self, question: &str, device_id: &str) -> Result<ChunkStream> {
        let channel = DualStreamChannel::new(
            &self.config.synthesis,
            Duration::from_secs(self.config.http.timeout_secs),
        )?;
        Ok(channel.open(question, device_id))
    }

    /// Drop material once playback is done with it, when configured to.
    ///
    /// Missing files are fine: playback may race cleanup with retries.
    pub fn discard(&self, path: &Path) -> Result<()> {
        if !self.config.synthesis.delete_after_use {
            return Ok(());
        }
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TtsProvider for StreamingTtsProvider {
    async fn synthesize(&self, text: &str, out_path: &Path) -> Result<()> {
        let request = self.request_for(text);
        let descriptor = JobDescriptor::new(
            request.params(),
            bearer_headers(&self.config.synthesis.access_token),
        );
        descriptor.write(out_path)
    }

    async fn materialize(&self, path: &Path) -> Result<Option<Resolved>> {
        self.resolver.resolve(path)
    }
}
