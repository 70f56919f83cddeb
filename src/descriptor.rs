//! Deferred job descriptors.
//!
//! A synthesis request does no network work up front. Instead it persists a
//! small fetch plan to the material path: a marker line, then the request
//! parameters, then the HTTP headers, each JSON-encoded on its own line.
//! Playback replays the plan later through the streaming fetcher, so the
//! synthesis step returns instantly and no connection is held open while
//! material queues up.

use crate::defaults::DESCRIPTOR_MARKER;
use crate::error::{Result, VocastError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A persisted plan for a future streaming fetch.
///
/// The target URL is not part of the on-disk form; the resolver supplies the
/// configured synthesis endpoint when the plan is replayed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobDescriptor {
    pub params: Map<String, Value>,
    pub headers: BTreeMap<String, String>,
}

impl JobDescriptor {
    pub fn new(params: Map<String, Value>, headers: BTreeMap<String, String>) -> Self {
        Self { params, headers }
    }

    /// Persist the descriptor: marker line, params line, headers line.
    ///
    /// serde_json leaves non-ASCII characters unescaped, so synthesis text
    /// in any language round-trips byte-for-byte.
    pub fn write(&self, path: &Path) -> Result<()> {
        let params = serde_json::to_string(&self.params).map_err(|e| {
            VocastError::DescriptorParse {
                message: format!("Failed to encode parameters: {}", e),
            }
        })?;
        let headers = serde_json::to_string(&self.headers).map_err(|e| {
            VocastError::DescriptorParse {
                message: format!("Failed to encode headers: {}", e),
            }
        })?;

        let mut contents = String::with_capacity(
            DESCRIPTOR_MARKER.len() + 1 + params.len() + 1 + headers.len(),
        );
        contents.push_str(DESCRIPTOR_MARKER);
        contents.push('\n');
        contents.push_str(&params);
        contents.push('\n');
        contents.push_str(&headers);

        fs::write(path, contents)?;
        Ok(())
    }

    /// Read a descriptor back: skip the marker, parse each line as JSON.
    ///
    /// Any malformed line is fatal; there is no partial recovery.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;

        let body = contents
            .strip_prefix(DESCRIPTOR_MARKER)
            .and_then(|rest| rest.strip_prefix('\n'))
            .ok_or_else(|| VocastError::DescriptorParse {
                message: "Missing descriptor marker line".to_string(),
            })?;

        let mut lines = body.lines();

        let params_line = lines.next().ok_or_else(|| VocastError::DescriptorParse {
            message: "Missing parameter line".to_string(),
        })?;
        let params: Map<String, Value> =
            serde_json::from_str(params_line.trim()).map_err(|e| VocastError::DescriptorParse {
                message: format!("Invalid parameter JSON: {}", e),
            })?;

        let headers_line = lines.next().ok_or_else(|| VocastError::DescriptorParse {
            message: "Missing header line".to_string(),
        })?;
        let headers: BTreeMap<String, String> =
            serde_json::from_str(headers_line.trim()).map_err(|e| {
                VocastError::DescriptorParse {
                    message: format!("Invalid header JSON: {}", e),
                }
            })?;

        Ok(Self { params, headers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::MARKER_LINE_LEN;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_descriptor() -> JobDescriptor {
        let mut params = Map::new();
        params.insert("tts_text".to_string(), json!("hello there"));
        params.insert("target_sr".to_string(), json!(16000));
        params.insert("stream".to_string(), json!("true"));

        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), "Bearer token123".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        JobDescriptor::new(params, headers)
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");

        let descriptor = sample_descriptor();
        descriptor.write(&path).unwrap();

        let restored = JobDescriptor::read(&path).unwrap();
        assert_eq!(restored, descriptor);
    }

    #[test]
    fn written_file_starts_with_ten_byte_marker_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");
        sample_descriptor().write(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..MARKER_LINE_LEN], b"http_post\n");
    }

    #[test]
    fn written_file_has_three_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");
        sample_descriptor().write(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "http_post");
        assert!(serde_json::from_str::<Value>(lines[1]).is_ok());
        assert!(serde_json::from_str::<Value>(lines[2]).is_ok());
    }

    #[test]
    fn read_fixed_example() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");
        std::fs::write(&path, "http_post\n{\"a\":1}\n{\"b\":\"x\"}").unwrap();

        let descriptor = JobDescriptor::read(&path).unwrap();
        assert_eq!(descriptor.params.get("a"), Some(&json!(1)));
        assert_eq!(descriptor.headers.get("b"), Some(&"x".to_string()));
    }

    #[test]
    fn non_ascii_text_survives_unescaped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");

        let mut params = Map::new();
        params.insert("tts_text".to_string(), json!("你好呀，你是谁"));
        let descriptor = JobDescriptor::new(params, BTreeMap::new());
        descriptor.write(&path).unwrap();

        // The raw bytes carry the characters, not \u escapes.
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("你好呀"));

        let restored = JobDescriptor::read(&path).unwrap();
        assert_eq!(restored.params.get("tts_text"), Some(&json!("你好呀，你是谁")));
    }

    #[test]
    fn missing_marker_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");
        std::fs::write(&path, "{\"a\":1}\n{\"b\":\"x\"}").unwrap();

        assert!(matches!(
            JobDescriptor::read(&path),
            Err(VocastError::DescriptorParse { .. })
        ));
    }

    #[test]
    fn malformed_parameter_line_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");
        std::fs::write(&path, "http_post\nnot json\n{\"b\":\"x\"}").unwrap();

        match JobDescriptor::read(&path) {
            Err(VocastError::DescriptorParse { message }) => {
                assert!(message.contains("parameter"));
            }
            other => panic!("Expected DescriptorParse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn malformed_header_line_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");
        std::fs::write(&path, "http_post\n{\"a\":1}\n[1,2,3]").unwrap();

        assert!(matches!(
            JobDescriptor::read(&path),
            Err(VocastError::DescriptorParse { .. })
        ));
    }

    #[test]
    fn truncated_descriptor_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.wav");
        std::fs::write(&path, "http_post\n{\"a\":1}").unwrap();

        assert!(matches!(
            JobDescriptor::read(&path),
            Err(VocastError::DescriptorParse { .. })
        ));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.wav");

        assert!(matches!(
            JobDescriptor::read(&path),
            Err(VocastError::Io(_))
        ));
    }
}
