use thiserror::Error;

/// Speech synthesis errors
#[derive(Error, Debug)]
pub enum TTSError {
    /// Engine failed outside of a specific chunk (model load, setup)
    #[error("Engine '{1}' failed: {0}")]
    ProviderError(String, String),

    /// The voice named by the language profile cannot be used
    #[error("Voice rejected by {1}: {0}")]
    InvalidVoiceData(String, String),

    /// Generating one chunk failed: message, chunk length in characters, voice or engine
    #[error("Synthesis failed for a {1}-character chunk with voice '{2}': {0}")]
    GenerationFailed(String, usize, String),

    #[error("Invalid synthesis request: {0}")]
    InvalidRequest(String),

    /// Engine output was not audio we can read
    #[error("Engine '{1}' produced undecodable audio: {0}")]
    DecodeError(String, String),

    /// IO failure: source, operation, subject (program or path)
    #[error("Failed to {1} ({2}): {0}")]
    IoError(#[source] std::io::Error, String, String),

    /// Model weights or voice embeddings could not be fetched
    #[error("Model resource '{0}' unavailable from {1}")]
    ModelNotFound(String, String),
}

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;
