//! Error types for vocast.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocastError {
    // Literal audio material errors
    #[error("Failed to decode audio container: {message}")]
    Decode { message: String },

    // Deferred job descriptor errors
    #[error("Malformed job descriptor: {message}")]
    DescriptorParse { message: String },

    // Opus encoding errors
    #[error("Opus encoder failure: {message}")]
    Encode { message: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VocastError>;
