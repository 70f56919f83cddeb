//! Streaming HTTP fetcher.
//!
//! One chunked GET per playback, yielded lazily as the response body
//! arrives. Nothing here ever raises across the stream boundary: connection
//! failure, timeout, and non-success status each surface as a single
//! in-band [`FetchError`] item, after which the stream ends. Callers that
//! only want audio bytes collapse the stream with [`bytes_only`], which
//! turns any fault into a clean early end; playback then sees "nothing to
//! play", never a crash.
//!
//! The connection is opened on first poll and dropped with the stream, so
//! abandoning playback mid-clip releases the socket on every exit path.

use crate::error::{Result, VocastError};
use bytes::Bytes;
use futures_util::future::ready;
use futures_util::{Stream, StreamExt, stream};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// A lazily fetched sequence of response-body chunks.
///
/// Chunk boundaries are transport-determined and carry no frame alignment.
pub type ChunkStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, FetchError>> + Send>>;

/// Why a fetch produced no further data.
///
/// Carried in-band as the final stream item rather than thrown, so a clean
/// end of audio and a fault stay distinguishable to callers that care.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("server returned status {0}")]
    Status(StatusCode),

    #[error("transport error: {0}")]
    Transport(reqwest::Error),
}

/// Performs chunked GET requests against synthesis endpoints.
pub struct StreamFetcher {
    client: Client,
}

impl StreamFetcher {
    /// Build a fetcher with a bounded connect/read timeout covering the
    /// whole exchange.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VocastError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Open a streaming GET against `url`.
    ///
    /// The request is not sent until the returned stream is first polled.
    /// The stream is finite and not restartable; dropping it closes the
    /// underlying connection.
    pub fn fetch(
        &self,
        url: &str,
        params: &Map<String, Value>,
        headers: &BTreeMap<String, String>,
    ) -> ChunkStream {
        let mut request = self.client.get(url).query(params);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        Box::pin(stream::once(async move { open_stream(request).await }).flatten())
    }
}

/// Send the request and hand back the body stream, or a one-item error
/// stream if the exchange never produced a successful response.
async fn open_stream(request: reqwest::RequestBuilder) -> ChunkStream {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return error_stream(classify_error(e)),
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, "synthesis endpoint rejected fetch");
        return error_stream(FetchError::Status(status));
    }

    Box::pin(
        response
            .bytes_stream()
            .map(|item| item.map_err(classify_error)),
    )
}

fn error_stream(error: FetchError) -> ChunkStream {
    Box::pin(stream::once(ready(Err(error))))
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(e)
    }
}

/// Collapse a result-bearing chunk stream to plain audio bytes.
///
/// The first in-band error is logged and terminates the stream, degrading a
/// failed fetch to "no audio produced".
pub fn bytes_only(chunks: ChunkStream) -> impl Stream<Item = Bytes> + Send {
    chunks
        .inspect(|item| {
            if let Err(e) = item {
                tracing::warn!(error = %e, "audio stream ended early");
            }
        })
        .take_while(|item| ready(item.is_ok()))
        .filter_map(|item| ready(item.ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::bearer_headers;
    use serde_json::json;

    fn fetcher() -> StreamFetcher {
        StreamFetcher::new(Duration::from_secs(5)).unwrap()
    }

    fn params_with(entries: &[(&str, Value)]) -> Map<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn successful_fetch_yields_body_chunks_in_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tts")
            .with_status(200)
            .with_body("opus-frame-bytes")
            .create_async()
            .await;

        let url = format!("{}/tts", server.url());
        let stream = fetcher().fetch(&url, &Map::new(), &BTreeMap::new());
        let chunks: Vec<_> = stream.collect().await;

        let body: Vec<u8> = chunks
            .into_iter()
            .map(|c| c.unwrap())
            .flat_map(|b| b.to_vec())
            .collect();
        assert_eq!(body, b"opus-frame-bytes");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_yields_single_status_error_item() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tts")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let url = format!("{}/tts", server.url());
        let items: Vec<_> = fetcher()
            .fetch(&url, &Map::new(), &BTreeMap::new())
            .collect()
            .await;

        assert_eq!(items.len(), 1);
        match &items[0] {
            Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 500),
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_error_collapses_to_zero_bytes() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tts")
            .with_status(500)
            .create_async()
            .await;

        let url = format!("{}/tts", server.url());
        let stream = fetcher().fetch(&url, &Map::new(), &BTreeMap::new());
        let chunks: Vec<Bytes> = bytes_only(stream).collect().await;

        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_single_transport_error() {
        // Port 1 is never listening.
        let items: Vec<_> = fetcher()
            .fetch("http://127.0.0.1:1/tts", &Map::new(), &BTreeMap::new())
            .collect()
            .await;

        assert_eq!(items.len(), 1);
        assert!(matches!(
            items[0],
            Err(FetchError::Transport(_)) | Err(FetchError::Timeout)
        ));
    }

    #[tokio::test]
    async fn params_and_headers_reach_the_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tts")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("spk_id".into(), "alloy".into()),
                mockito::Matcher::UrlEncoded("target_sr".into(), "16000".into()),
            ]))
            .match_header("authorization", "Bearer secret123")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let params = params_with(&[("spk_id", json!("alloy")), ("target_sr", json!(16000))]);
        let url = format!("{}/tts", server.url());
        let chunks: Vec<_> = fetcher()
            .fetch(&url, &params, &bearer_headers("secret123"))
            .collect()
            .await;

        assert!(chunks.iter().all(|c| c.is_ok()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn request_is_not_sent_until_first_poll() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tts")
            .with_status(200)
            .with_body("ok")
            .expect(0)
            .create_async()
            .await;

        let url = format!("{}/tts", server.url());
        let stream = fetcher().fetch(&url, &Map::new(), &BTreeMap::new());
        drop(stream);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bytes_only_passes_through_successful_chunks() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tts")
            .with_status(200)
            .with_body("audio")
            .create_async()
            .await;

        let url = format!("{}/tts", server.url());
        let stream = fetcher().fetch(&url, &Map::new(), &BTreeMap::new());
        let bytes: Vec<u8> = bytes_only(stream)
            .collect::<Vec<Bytes>>()
            .await
            .into_iter()
            .flat_map(|b| b.to_vec())
            .collect();

        assert_eq!(bytes, b"audio");
    }
}
