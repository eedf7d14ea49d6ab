use narrator_speech::TTSError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to read {what} at {path:?}: {source}")]
    ReadConfig {
        what: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed language configuration {path:?}: {source}")]
    LanguageConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Language configuration has no entry for fallback language '{0}'")]
    MissingFallbackLanguage(String),

    #[error("Invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error("Input directory does not exist: {0:?}")]
    MissingInput(PathBuf),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Synthesis failed for {path:?}: {source}")]
    Synthesis { path: PathBuf, source: TTSError },

    #[error("Engine '{provider}' produces {sample_rate} Hz audio; tracks are {expected_rate} Hz")]
    EngineSampleRate {
        provider: String,
        sample_rate: u32,
        expected_rate: u32,
    },

    #[error(
        "Segment {index} is {sample_rate} Hz / {channels} channel(s); expected {expected_rate} Hz mono"
    )]
    SegmentFormat {
        index: usize,
        sample_rate: u32,
        channels: usize,
        expected_rate: u32,
    },

    #[error("Segment arrived out of order: expected index {expected}, got {index}")]
    SegmentOrder { expected: usize, index: usize },

    #[error("WAV encoding failed for {path:?}: {source}")]
    Wav { path: PathBuf, source: hound::Error },

    #[error("MP3 encoding failed: {0}")]
    Mp3(String),
}

impl BatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn wav(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        Self::Wav {
            path: path.into(),
            source,
        }
    }
}

pub type BatchResult<T> = Result<T, BatchError>;
