//! Network side of the delivery pipeline.
//!
//! `fetcher` performs the lazy chunked GET that both playback paths share;
//! `dual` is the descriptor-free low-latency channel for interactive turns.

pub mod dual;
pub mod fetcher;

pub use dual::DualStreamChannel;
pub use fetcher::{ChunkStream, FetchError, StreamFetcher, bytes_only};

use std::collections::BTreeMap;

/// Standard headers for synthesis endpoints: bearer auth plus JSON content.
pub fn bearer_headers(access_token: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        "Authorization".to_string(),
        format!("Bearer {}", access_token),
    );
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}
