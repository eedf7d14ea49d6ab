//! Speech provider implementations
//!
//! This module contains concrete implementations of [`crate::SpeechSynthesizer`].
//! The command backend is always available; model backends are feature-gated.

pub mod command;

#[cfg(feature = "pocket-tts")]
pub mod pocket_tts;
