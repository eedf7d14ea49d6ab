use crate::TTSError;
use thiserror::Error;

const PROVIDER: &str = "pocket-tts";

#[derive(Error, Debug)]
pub enum PocketTTSError {
    #[error("Voice '{voice}' unavailable: {reason}")]
    Voice { voice: String, reason: String },

    #[error("Generation failed during {stage}: {reason}")]
    Generation {
        stage: &'static str,
        chunk_chars: usize,
        reason: String,
    },

    #[error("Pocket-TTS error: {0}")]
    Library(String),

    #[error("Voice cache lock poisoned")]
    CachePoisoned,

    #[error("Failed to download {resource} from {url}: {reason}")]
    Download {
        resource: String,
        url: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, PocketTTSError>;

impl PocketTTSError {
    pub(crate) fn voice(voice: impl Into<String>, reason: impl ToString) -> Self {
        Self::Voice {
            voice: voice.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn generation(
        stage: &'static str,
        chunk_chars: usize,
        reason: impl ToString,
    ) -> Self {
        Self::Generation {
            stage,
            chunk_chars,
            reason: reason.to_string(),
        }
    }
}

impl From<PocketTTSError> for TTSError {
    fn from(err: PocketTTSError) -> Self {
        match err {
            PocketTTSError::Voice { voice, reason } => {
                TTSError::InvalidVoiceData(format!("{voice}: {reason}"), PROVIDER.to_string())
            }
            PocketTTSError::Generation {
                stage,
                chunk_chars,
                reason,
            } => TTSError::GenerationFailed(
                format!("{stage}: {reason}"),
                chunk_chars,
                PROVIDER.to_string(),
            ),
            PocketTTSError::Download {
                resource,
                url,
                reason,
            } => {
                TTSError::ModelNotFound(format!("{resource} ({reason})"), url)
            }
            other => TTSError::ProviderError(other.to_string(), PROVIDER.to_string()),
        }
    }
}

impl From<anyhow::Error> for PocketTTSError {
    fn from(err: anyhow::Error) -> Self {
        PocketTTSError::Library(format!("{err:#}"))
    }
}
