//! # Narrator Batch
//!
//! Turns folders of text files into narrated audio tracks.
//!
//! A run loads the language table, discovers batches (one per language
//! subfolder, or the input root as a single batch), asks a
//! [`narrator_speech::SpeechSynthesizer`] for the segments of each file,
//! stitches them with fixed silence gaps, exports one WAV or MP3 per file and
//! finally writes a manifest listing every track with its duration.
//!
//! ```no_run
//! use narrator_batch::{BatchRunner, LanguageTable, RunConfig};
//! use narrator_speech::providers::command::{CommandConfig, CommandSynthesizer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::default();
//!     let languages = LanguageTable::load(&config.languages_file, &config.fallback_language)?;
//!     let engine = CommandSynthesizer::new(CommandConfig::default())?;
//!
//!     let summary = BatchRunner::new(&config, &languages, &engine).run()?;
//!     println!("{} tracks listed in {}", summary.manifest.len(), summary.manifest_path.display());
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod export;
pub mod languages;
pub mod manifest;
pub mod pipeline;
pub mod walker;

pub use config::{ExecutionMode, OutputFormat, RunConfig};
pub use error::{BatchError, BatchResult};
pub use languages::{LanguageLookup, LanguageProfile, LanguageTable};
pub use manifest::{Manifest, ManifestEntry};
pub use pipeline::{BatchRunner, RunSummary};
