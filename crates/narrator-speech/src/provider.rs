use crate::{ModelInfo, SpeechSegment, SynthesisRequest, TTSResult, DEFAULT_SAMPLE_RATE};

/// Lazy, finite, single-pass sequence of segments for one request.
///
/// Items arrive in index order. There is no rewind: once a segment has been
/// pulled it is gone.
pub type SegmentStream<'a> = Box<dyn Iterator<Item = TTSResult<SpeechSegment>> + 'a>;

/// Trait for speech synthesis backends
pub trait SpeechSynthesizer {
    /// Start synthesis for a whole text file
    ///
    /// # Arguments
    /// * `request` - Text, voice, language, speed and split rule
    ///
    /// # Returns
    /// Stream yielding one segment per non-blank text chunk. Request-level
    /// problems (bad split pattern, unknown voice) are reported here; per-chunk
    /// generation failures surface as `Err` items in the stream.
    fn synthesize(&self, request: SynthesisRequest) -> TTSResult<SegmentStream<'_>>;

    /// Short provider name used in logs
    fn provider_name(&self) -> &str;

    /// Get current model information
    fn model_info(&self) -> ModelInfo;

    /// Sample rate of produced segments
    fn default_sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Box<T> {
    fn synthesize(&self, request: SynthesisRequest) -> TTSResult<SegmentStream<'_>> {
        (**self).synthesize(request)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_info(&self) -> ModelInfo {
        (**self).model_info()
    }

    fn default_sample_rate(&self) -> u32 {
        (**self).default_sample_rate()
    }
}
