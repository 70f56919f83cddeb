use crate::defaults::{FETCH_TIMEOUT_SECS, NOMINAL_STREAM_DURATION_SECS, SAMPLE_RATE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub synthesis: SynthesisConfig,
    pub http: HttpConfig,
}

/// Synthesis endpoint and voice configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Bearer token attached to every synthesis request.
    pub access_token: String,
    /// Speaker/voice identifier understood by the endpoint.
    pub voice: String,
    /// Sample rate requested from the endpoint.
    pub sample_rate: u32,
    /// Optional style instruction passed alongside the text.
    pub instruct_text: Option<String>,
    /// Deferred single-stream vs. interactive double-stream synthesis.
    pub stream_mode: StreamMode,
    /// Single-stream synthesis endpoint.
    pub api_url: String,
    /// Interactive double-stream endpoint.
    pub double_stream_url: String,
    /// Directory where material files are written.
    pub output_dir: PathBuf,
    /// Remove material files once playback is done with them.
    pub delete_after_use: bool,
    /// Duration estimate reported for deferred-stream material, in seconds.
    pub nominal_stream_duration_secs: f64,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

/// Synthesis delivery mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// Write a deferred job descriptor; fetch happens at playback time.
    #[default]
    #[serde(rename = "stream")]
    Deferred,
    /// Open the low-latency interactive channel directly.
    #[serde(rename = "double_stream")]
    Double,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            voice: String::new(),
            sample_rate: SAMPLE_RATE,
            instruct_text: None,
            stream_mode: StreamMode::Deferred,
            api_url: String::new(),
            double_stream_url: String::new(),
            output_dir: PathBuf::from("."),
            delete_after_use: false,
            nominal_stream_duration_secs: NOMINAL_STREAM_DURATION_SECS,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: FETCH_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOCAST_ACCESS_TOKEN → synthesis.access_token
    /// - VOCAST_VOICE → synthesis.voice
    /// - VOCAST_API_URL → synthesis.api_url
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var("VOCAST_ACCESS_TOKEN")
            && !token.is_empty()
        {
            self.synthesis.access_token = token;
        }

        if let Ok(voice) = std::env::var("VOCAST_VOICE")
            && !voice.is_empty()
        {
            self.synthesis.voice = voice;
        }

        if let Ok(url) = std::env::var("VOCAST_API_URL")
            && !url.is_empty()
        {
            self.synthesis.api_url = url;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/vocast/config.toml on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vocast").join("config.toml"))
    }
}
