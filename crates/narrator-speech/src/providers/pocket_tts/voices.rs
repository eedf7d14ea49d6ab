//! Predefined Pocket-TTS voices
//!
//! Embeddings live in the kyutai/pocket-tts-without-voice-cloning repository
//! as pre-computed .safetensors files.

use serde::{Deserialize, Serialize};

const EMBEDDINGS_REPO: &str = "hf://kyutai/pocket-tts-without-voice-cloning/embeddings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PredefinedVoice {
    #[default]
    Alba,
    Marius,
    Javert,
    Jean,
    Fantine,
    Cosette,
    Eponine,
    Azelma,
}

impl PredefinedVoice {
    pub const ALL: [PredefinedVoice; 8] = [
        PredefinedVoice::Alba,
        PredefinedVoice::Marius,
        PredefinedVoice::Javert,
        PredefinedVoice::Jean,
        PredefinedVoice::Fantine,
        PredefinedVoice::Cosette,
        PredefinedVoice::Eponine,
        PredefinedVoice::Azelma,
    ];

    pub fn hf_path(&self) -> String {
        format!("{EMBEDDINGS_REPO}/{}.safetensors", self.identifier())
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            PredefinedVoice::Alba => "alba",
            PredefinedVoice::Marius => "marius",
            PredefinedVoice::Javert => "javert",
            PredefinedVoice::Jean => "jean",
            PredefinedVoice::Fantine => "fantine",
            PredefinedVoice::Cosette => "cosette",
            PredefinedVoice::Eponine => "eponine",
            PredefinedVoice::Azelma => "azelma",
        }
    }

    /// Comma-separated voice names for error messages
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(PredefinedVoice::identifier)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for PredefinedVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

impl std::str::FromStr for PredefinedVoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|voice| voice.identifier() == wanted)
            .ok_or_else(|| format!("Unknown predefined voice: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(
            "MARIUS".parse::<PredefinedVoice>().unwrap(),
            PredefinedVoice::Marius
        );
        assert_eq!(
            " cosette ".parse::<PredefinedVoice>().unwrap(),
            PredefinedVoice::Cosette
        );
        assert!("af_heart".parse::<PredefinedVoice>().is_err());
    }

    #[test]
    fn test_hf_path() {
        assert_eq!(
            PredefinedVoice::Jean.hf_path(),
            "hf://kyutai/pocket-tts-without-voice-cloning/embeddings/jean.safetensors"
        );
    }

    #[test]
    fn test_available_lists_every_voice() {
        let listed = PredefinedVoice::available();
        for voice in PredefinedVoice::ALL {
            assert!(listed.contains(voice.identifier()));
        }
    }
}
