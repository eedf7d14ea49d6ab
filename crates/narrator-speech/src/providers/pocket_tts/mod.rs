//! Pocket-TTS provider for the narrator speech seam
//!
//! Runs the Pocket-TTS model locally and produces one segment per text chunk.
//!
//! # Examples
//!
//! ```no_run
//! use narrator_speech::providers::pocket_tts::{PocketTTS, PocketTTSConfig};
//! use narrator_speech::{SpeechSynthesizer, SynthesisRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = PocketTTS::new(PocketTTSConfig::default())?;
//!
//!     let request = SynthesisRequest::new("Hello, world!\nSecond line.", "en", "alba");
//!     for segment in provider.synthesize(request)? {
//!         let segment = segment?;
//!         println!("segment {}: {:.2}s", segment.index, segment.audio.duration_seconds());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod voices;

mod library;
mod provider;

// Re-exports
pub use config::PocketTTSConfig;
pub use error::{PocketTTSError, Result};
pub use models::ModelVariant;
pub use provider::PocketTTSProvider as PocketTTS;
pub use voices::PredefinedVoice;
