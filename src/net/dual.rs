//! Interactive double-stream channel.
//!
//! The low-latency alternative to descriptor persistence: one streaming
//! request carries the question text directly to the interactive endpoint
//! and the encoded answer comes straight back. Used for conversational
//! turns where deferred-fetch decoupling is not worth the extra hop.

use crate::config::SynthesisConfig;
use crate::error::Result;
use crate::net::fetcher::{ChunkStream, StreamFetcher};
use crate::net::bearer_headers;
use serde_json::{Map, Value, json};
use std::time::Duration;

pub struct DualStreamChannel {
    fetcher: StreamFetcher,
    endpoint: String,
    access_token: String,
    voice: String,
    instruct_text: Option<String>,
}

impl DualStreamChannel {
    pub fn new(config: &SynthesisConfig, timeout: Duration) -> Result<Self> {
        Ok(Self {
            fetcher: StreamFetcher::new(timeout)?,
            endpoint: config.double_stream_url.clone(),
            access_token: config.access_token.clone(),
            voice: config.voice.clone(),
            instruct_text: config.instruct_text.clone(),
        })
    }

    /// Open a streaming exchange for one conversational turn.
    ///
    /// Same stream semantics as the fetcher: lazy, finite, not restartable,
    /// faults carried in-band.
    pub fn open(&self, question: &str, device_id: &str) -> ChunkStream {
        let params = self.interactive_params(question, device_id);
        self.fetcher
            .fetch(&self.endpoint, &params, &bearer_headers(&self.access_token))
    }

    fn interactive_params(&self, question: &str, device_id: &str) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("question".to_string(), json!(question));
        params.insert("device_id".to_string(), json!(device_id));
        if let Some(instruct) = &self.instruct_text {
            params.insert("instruct_text".to_string(), json!(instruct));
        }
        params.insert("audio_format".to_string(), json!("opus"));
        params.insert("spk_id".to_string(), json!(self.voice));
        params
    }
}
