//! # Narrator Speech
//!
//! Speech synthesis provider abstractions for the narrator batch pipeline.
//!
//! The crate defines the seam between the pipeline and whatever engine turns
//! text into waveforms. An engine receives one [`SynthesisRequest`] per text
//! file and hands back a lazy, forward-only stream of [`SpeechSegment`]s, one
//! per chunk of the split input text.
//!
//! ## Architecture
//!
//! - `SpeechSynthesizer`: the single trait every backend implements
//! - `text`: splitting input text into synthesis chunks
//! - `conversion`: channel and sample-rate normalisation helpers
//!
//! ## Providers
//!
//! - `command`: runs an external program (espeak-ng by default) per chunk
//! - `pocket-tts` (feature): local Pocket-TTS neural model
//!
//! ## Example
//!
//! ```rust
//! use narrator_speech::{SpeechSynthesizer, SynthesisRequest, VoiceIdentifier};
//!
//! fn count_segments(engine: &dyn SpeechSynthesizer, text: &str) -> usize {
//!     let request = SynthesisRequest::new(text, "en", VoiceIdentifier::new("af_heart"));
//!     engine
//!         .synthesize(request)
//!         .map(|segments| segments.filter(Result::is_ok).count())
//!         .unwrap_or(0)
//! }
//! ```

pub mod conversion;
pub mod error;
mod provider;
pub mod text;
pub mod types;

// Provider implementations
pub mod providers;

pub use error::{TTSError, TTSResult};
pub use provider::{SegmentStream, SpeechSynthesizer};
pub use types::{
    AudioData, ModelInfo, SpeechSegment, SynthesisRequest, VoiceIdentifier, DEFAULT_SAMPLE_RATE,
    DEFAULT_SPLIT_PATTERN,
};
