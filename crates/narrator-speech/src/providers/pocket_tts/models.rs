//! Pocket-TTS model variants

use serde::{Deserialize, Serialize};

/// Available Pocket-TTS model variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ModelVariant {
    /// English model, 24kHz output (b6369a24)
    #[default]
    #[serde(rename = "b6369a24", alias = "default")]
    B6369a24,
}

impl ModelVariant {
    /// HuggingFace identifier passed to the loader
    pub fn hf_id(&self) -> &'static str {
        match self {
            ModelVariant::B6369a24 => "b6369a24",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ModelVariant::B6369a24 => "Pocket-TTS English model (24kHz, 6 layers)",
        }
    }

    /// Language codes the variant can speak
    pub fn languages(&self) -> &'static [&'static str] {
        match self {
            ModelVariant::B6369a24 => &["en", "a", "b"],
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hf_id())
    }
}
