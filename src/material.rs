//! Material classification by byte sniffing.
//!
//! A material path holds either a deferred job descriptor or a literal audio
//! container; one playback code path serves both. The sniffer settles which
//! kind it is exactly once, from a fixed-size prefix read, and the resolver
//! consumes the answer by exhaustive matching.

use crate::defaults::{DESCRIPTOR_MARKER, MARKER_LINE_LEN};
use crate::error::Result;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// What a material path contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    /// A persisted fetch plan to replay through the streaming fetcher.
    DeferredJob,
    /// A literal audio container to decode and encode locally.
    LiteralAudio,
    /// The path does not exist. Not an error: playback treats it as
    /// "nothing to play".
    NotFound,
}

/// Classify the material at `path` from its first [`MARKER_LINE_LEN`] bytes.
///
/// Only an exact match of the full marker line (marker plus newline) counts
/// as a descriptor; any other existing file is literal audio.
pub fn classify(path: &Path) -> Result<Material> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Material::NotFound),
        Err(e) => return Err(e.into()),
    };

    let mut prefix = [0u8; MARKER_LINE_LEN];
    let mut filled = 0;
    while filled < prefix.len() {
        match file.read(&mut prefix[filled..])? {
            0 => break,
            n => filled += n,
        }
    }

    if filled == prefix.len() && &prefix[..DESCRIPTOR_MARKER.len()] == DESCRIPTOR_MARKER.as_bytes()
        && prefix[DESCRIPTOR_MARKER.len()] == b'\n'
    {
        Ok(Material::DeferredJob)
    } else {
        Ok(Material::LiteralAudio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn marker_prefix_classifies_as_deferred_job() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "job.wav", b"http_post\n{\"a\":1}\n{\"b\":\"x\"}");

        assert_eq!(classify(&path).unwrap(), Material::DeferredJob);
    }

    #[test]
    fn wav_header_classifies_as_literal_audio() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "clip.wav", b"RIFF\x24\x00\x00\x00WAVEfmt ");

        assert_eq!(classify(&path).unwrap(), Material::LiteralAudio);
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.wav");

        assert_eq!(classify(&path).unwrap(), Material::NotFound);
    }

    #[test]
    fn marker_without_newline_is_literal_audio() {
        let dir = TempDir::new().unwrap();
        // First nine bytes match the marker but the tenth is not a newline.
        let path = write_file(&dir, "odd.bin", b"http_postX trailing data");

        assert_eq!(classify(&path).unwrap(), Material::LiteralAudio);
    }

    #[test]
    fn file_shorter_than_marker_is_literal_audio() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "tiny.bin", b"http");

        assert_eq!(classify(&path).unwrap(), Material::LiteralAudio);
    }

    #[test]
    fn empty_file_is_literal_audio() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.bin", b"");

        assert_eq!(classify(&path).unwrap(), Material::LiteralAudio);
    }

    #[test]
    fn classification_matches_descriptor_output() {
        use crate::descriptor::JobDescriptor;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("written.wav");
        JobDescriptor::default().write(&path).unwrap();

        assert_eq!(classify(&path).unwrap(), Material::DeferredJob);
    }
}
