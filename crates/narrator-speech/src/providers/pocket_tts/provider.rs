//! Pocket-TTS provider implementation

use super::config::PocketTTSConfig;
use super::error::Result;
use super::library::LibraryBackend;
use crate::text::{compile_split_pattern, split_text};
use crate::{
    ModelInfo, SegmentStream, SpeechSegment, SpeechSynthesizer, SynthesisRequest, TTSError,
    TTSResult,
};

/// Pocket-TTS provider
pub struct PocketTTSProvider {
    backend: LibraryBackend,
}

impl PocketTTSProvider {
    /// Load the model described by `config`
    pub fn new(config: PocketTTSConfig) -> Result<Self> {
        let backend = LibraryBackend::new(&config)?;
        Ok(Self { backend })
    }
}

impl SpeechSynthesizer for PocketTTSProvider {
    fn synthesize(&self, request: SynthesisRequest) -> TTSResult<SegmentStream<'_>> {
        let pattern = compile_split_pattern(&request.split_pattern)?;
        if (request.speed - 1.0).abs() > f32::EPSILON {
            log::warn!(
                "Pocket-TTS does not support speed control; ignoring speed {}",
                request.speed
            );
        }
        if !self
            .backend
            .variant()
            .languages()
            .contains(&request.language.as_str())
        {
            log::warn!(
                "Pocket-TTS model {} is English-only; language '{}' will be read as English",
                self.backend.variant(),
                request.language
            );
        }

        let voice = self.backend.resolve_voice(request.voice.name())?;
        let voice_state = self.backend.voice_state(voice)?;
        let chunks = split_text(&request.text, &pattern);

        Ok(Box::new(chunks.into_iter().enumerate().map(
            move |(index, chunk)| {
                let audio = self
                    .backend
                    .generate(&chunk, &voice_state)
                    .map_err(TTSError::from)?;
                Ok(SpeechSegment {
                    index,
                    text: chunk,
                    phonemes: None,
                    audio,
                })
            },
        )))
    }

    fn provider_name(&self) -> &str {
        "pocket-tts"
    }

    fn model_info(&self) -> ModelInfo {
        let variant = self.backend.variant();
        ModelInfo {
            id: variant.to_string(),
            name: variant.to_string(),
            description: Some(variant.description().to_string()),
            languages: variant.languages().iter().map(|l| l.to_string()).collect(),
        }
    }

    fn default_sample_rate(&self) -> u32 {
        self.backend.sample_rate()
    }
}
