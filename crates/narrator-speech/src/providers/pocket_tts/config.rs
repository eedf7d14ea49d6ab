use super::error::{PocketTTSError, Result};
use super::models::ModelVariant;
use super::voices::PredefinedVoice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings for the local Pocket-TTS engine.
///
/// Language tables name voices in whatever scheme the narrator setup uses
/// (`af_heart`, `en-us`, ...). `voice_map` translates those ids into the
/// model's predefined voices; ids that are already predefined voice names pass
/// through unchanged. Anything else lands on `fallback_voice` when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketTTSConfig {
    pub model_variant: ModelVariant,

    /// Sampling temperature in (0.0, 2.0]
    pub temperature: f32,

    pub lsd_decode_steps: usize,

    /// Log-probability below which generation stops
    pub eos_threshold: f32,

    pub noise_clamp: Option<f32>,

    /// Language-table voice id -> predefined voice
    pub voice_map: BTreeMap<String, PredefinedVoice>,

    pub fallback_voice: Option<PredefinedVoice>,
}

impl Default for PocketTTSConfig {
    fn default() -> Self {
        Self {
            model_variant: ModelVariant::default(),
            temperature: 0.7,
            lsd_decode_steps: 1,
            eos_threshold: -4.0,
            noise_clamp: None,
            voice_map: BTreeMap::new(),
            fallback_voice: None,
        }
    }
}

impl PocketTTSConfig {
    pub fn with_voice(mut self, id: impl Into<String>, voice: PredefinedVoice) -> Self {
        self.voice_map.insert(id.into(), voice);
        self
    }

    pub fn with_fallback_voice(mut self, voice: PredefinedVoice) -> Self {
        self.fallback_voice = Some(voice);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.temperature > 0.0 && self.temperature <= 2.0) {
            return Err(PocketTTSError::Library(format!(
                "temperature must be in (0, 2], got {}",
                self.temperature
            )));
        }
        if self.lsd_decode_steps == 0 {
            return Err(PocketTTSError::Library(
                "lsd_decode_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
