//! Audio decode and encode stages of the delivery pipeline.
//!
//! `decode` turns an on-disk container into interleaved PCM, `pcm` normalizes
//! it to the 16kHz mono contract, and `opus` chops the result into
//! fixed-duration encoded frames.

pub mod decode;
pub mod opus;
pub mod pcm;

pub use decode::{DecodedAudio, decode_file};
pub use opus::{FrameCodec, OpusFrame};
pub use pcm::PcmBuffer;
