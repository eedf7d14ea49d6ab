//! In-process Pocket-TTS model

use super::PocketTTSConfig;
use super::error::{PocketTTSError, Result};
use super::models::ModelVariant;
use super::voices::PredefinedVoice;
use crate::AudioData;
use pocket_tts::{ModelState, TTSModel};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

pub struct LibraryBackend {
    model: TTSModel,
    variant: ModelVariant,
    voice_map: BTreeMap<String, PredefinedVoice>,
    fallback_voice: Option<PredefinedVoice>,
    /// Embedding states, loaded once per voice per run
    voice_states: RwLock<HashMap<PredefinedVoice, ModelState>>,
}

impl LibraryBackend {
    pub fn new(config: &PocketTTSConfig) -> Result<Self> {
        config.validate()?;

        log::info!(
            "Loading Pocket-TTS model {} ({})",
            config.model_variant,
            config.model_variant.hf_id()
        );
        let model = TTSModel::load_with_params_device(
            config.model_variant.hf_id(),
            config.temperature,
            config.lsd_decode_steps,
            config.eos_threshold,
            config.noise_clamp,
            &candle_core::Device::Cpu,
        )?;

        Ok(Self {
            model,
            variant: config.model_variant,
            voice_map: config.voice_map.clone(),
            fallback_voice: config.fallback_voice,
            voice_states: RwLock::new(HashMap::new()),
        })
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn sample_rate(&self) -> u32 {
        self.model.sample_rate as u32
    }

    /// Synthesize one chunk into mono float samples at the model rate
    pub fn generate(&self, chunk: &str, voice_state: &ModelState) -> Result<AudioData> {
        let chars = chunk.chars().count();
        let output = self
            .model
            .generate(chunk, voice_state)
            .map_err(|e| PocketTTSError::generation("model generation", chars, e))?;

        // [samples] or [1, samples]
        let output = if output.dims().len() > 1 {
            output
                .squeeze(0)
                .map_err(|e| PocketTTSError::generation("squeezing output", chars, e))?
        } else {
            output
        };
        let samples = output
            .to_vec1::<f32>()
            .map_err(|e| PocketTTSError::generation("reading samples", chars, e))?;

        Ok(AudioData::mono(samples, self.sample_rate()))
    }

    /// Voice for a language-profile voice id.
    ///
    /// Lookup order: `voice_map`, predefined voice name, fallback voice.
    pub fn resolve_voice(&self, id: &str) -> Result<PredefinedVoice> {
        if let Some(voice) = self.voice_map.get(id) {
            return Ok(*voice);
        }
        match id.parse::<PredefinedVoice>() {
            Ok(voice) => Ok(voice),
            Err(reason) => match self.fallback_voice {
                Some(fallback) => {
                    log::warn!("{reason}; using Pocket-TTS voice '{fallback}' instead");
                    Ok(fallback)
                }
                None => Err(PocketTTSError::voice(
                    id,
                    format!(
                        "not mapped and not a predefined voice (available: {})",
                        PredefinedVoice::available()
                    ),
                )),
            },
        }
    }

    pub fn voice_state(&self, voice: PredefinedVoice) -> Result<ModelState> {
        if let Some(state) = self
            .voice_states
            .read()
            .map_err(|_| PocketTTSError::CachePoisoned)?
            .get(&voice)
        {
            return Ok(state.clone());
        }

        let url = voice.hf_path();
        log::info!("Loading voice embeddings for '{voice}'");
        let local = pocket_tts::weights::download_if_necessary(&url).map_err(|e| {
            PocketTTSError::Download {
                resource: format!("voice '{voice}'"),
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;
        let state = self
            .model
            .get_voice_state_from_prompt_file(&local)
            .map_err(|e| PocketTTSError::voice(voice.identifier(), e))?;

        self.voice_states
            .write()
            .map_err(|_| PocketTTSError::CachePoisoned)?
            .insert(voice, state.clone());
        Ok(state)
    }
}
