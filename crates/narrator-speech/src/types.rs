use serde::{Deserialize, Serialize};

/// Sample rate every segment is expected to arrive at
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Split rule breaking input text on runs of newlines
pub const DEFAULT_SPLIT_PATTERN: &str = r"\n+";

/// Model information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: String,
    /// Model name
    pub name: String,
    /// Model description
    pub description: Option<String>,
    /// Supported languages
    pub languages: Vec<String>,
}

/// Audio data with normalized samples
#[derive(Clone, Debug, PartialEq)]
pub struct AudioData {
    /// Audio samples nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Number of audio channels (typically 1 for mono)
    pub channels: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioData {
    /// Mono audio at the given rate
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: 1,
            sample_rate,
        }
    }

    /// Playback length in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = self.samples.len() / self.channels;
        frames as f64 / self.sample_rate as f64
    }
}

/// Voice identifier for TTS generation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceIdentifier {
    /// Voice name as the engine knows it (e.g., "af_heart", "alba")
    pub name: String,
}

impl VoiceIdentifier {
    /// Create a voice identifier from a voice name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Get the voice name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<String> for VoiceIdentifier {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for VoiceIdentifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One synthesis call covering a whole text file
#[derive(Clone, Debug)]
pub struct SynthesisRequest {
    /// Full file contents, unsplit
    pub text: String,
    /// Engine language code (e.g. "a" for American English in Kokoro terms)
    pub language: String,
    pub voice: VoiceIdentifier,
    /// Speed multiplier, 1.0 is normal
    pub speed: f32,
    /// Regex the engine splits `text` on; each non-blank chunk becomes a segment
    pub split_pattern: String,
}

impl SynthesisRequest {
    pub fn new(
        text: impl Into<String>,
        language: impl Into<String>,
        voice: impl Into<VoiceIdentifier>,
    ) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            voice: voice.into(),
            speed: 1.0,
            split_pattern: DEFAULT_SPLIT_PATTERN.to_string(),
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_split_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.split_pattern = pattern.into();
        self
    }
}

/// A synthesized chunk of speech
#[derive(Clone, Debug)]
pub struct SpeechSegment {
    /// Position in generation order, starting at 0
    pub index: usize,
    /// Text chunk this segment speaks
    pub text: String,
    /// Phonetic rendering, when the engine exposes one
    pub phonemes: Option<String>,
    pub audio: AudioData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_duration() {
        let audio = AudioData::mono(vec![0.0; 36_000], 24_000);
        assert!((audio.duration_seconds() - 1.5).abs() < 1e-9);

        let stereo = AudioData {
            samples: vec![0.0; 48_000],
            channels: 2,
            sample_rate: 24_000,
        };
        assert!((stereo.duration_seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_audio_duration_degenerate() {
        let audio = AudioData::mono(vec![0.0; 10], 0);
        assert_eq!(audio.duration_seconds(), 0.0);
    }

    #[test]
    fn test_request_defaults() {
        let request = SynthesisRequest::new("Hello.", "a", "af_heart");
        assert_eq!(request.speed, 1.0);
        assert_eq!(request.split_pattern, DEFAULT_SPLIT_PATTERN);
        assert_eq!(request.voice.name(), "af_heart");

        let request = request.with_speed(1.25).with_split_pattern("[.]");
        assert_eq!(request.speed, 1.25);
        assert_eq!(request.split_pattern, "[.]");
    }

    #[test]
    fn test_voice_ids_pass_through_untouched() {
        let from_table: VoiceIdentifier = String::from("pf_dora").into();
        assert_eq!(from_table, VoiceIdentifier::new("pf_dora"));
        assert_eq!(
            serde_json::to_string(&from_table).unwrap(),
            r#"{"name":"pf_dora"}"#
        );
    }
}
