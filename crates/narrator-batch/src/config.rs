//! Run configuration
//!
//! One immutable [`RunConfig`] describes a whole run and is passed by
//! reference to every stage of the pipeline.

use crate::error::{BatchError, BatchResult};
use narrator_speech::DEFAULT_SPLIT_PATTERN;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Bitrates the MP3 encoder accepts, in kbit/s
pub const SUPPORTED_MP3_BITRATES: [u32; 8] = [64, 96, 128, 160, 192, 224, 256, 320];

const BY_FOLDER: &str = "by_folder";

/// How the input directory is interpreted
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExecutionMode {
    /// Every immediate subdirectory of the input root is a language batch
    #[default]
    ByFolder,
    /// The input root is a single flat batch in this language
    Single(String),
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("execution mode cannot be empty".to_string()),
            BY_FOLDER => Ok(ExecutionMode::ByFolder),
            key => Ok(ExecutionMode::Single(key.to_string())),
        }
    }
}

impl TryFrom<String> for ExecutionMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExecutionMode> for String {
    fn from(mode: ExecutionMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::ByFolder => f.write_str(BY_FOLDER),
            ExecutionMode::Single(key) => f.write_str(key),
        }
    }
}

/// Container format of compiled tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Wav,
    #[default]
    Mp3,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wav" => Ok(OutputFormat::Wav),
            "mp3" => Ok(OutputFormat::Mp3),
            _ => Err(format!("Unknown output format: {s} (expected wav or mp3)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Root holding text files or per-language subfolders
    pub input_dir: PathBuf,

    /// Root receiving compiled tracks and the manifest
    pub output_dir: PathBuf,

    /// JSON language table
    pub languages_file: PathBuf,

    pub mode: ExecutionMode,

    /// Language key used when a requested key is not in the table
    pub fallback_language: String,

    /// Silence appended after every segment, in seconds
    pub gap_seconds: f32,

    pub output_format: OutputFormat,

    /// MP3 bitrate in kbit/s, ignored for WAV
    pub mp3_bitrate_kbps: u32,

    /// Speech speed multiplier handed to the synthesizer
    pub speed: f32,

    /// Regex the synthesizer splits text on
    pub split_pattern: String,

    /// Extension of input text files, without the dot
    pub text_extension: String,

    /// Manifest file name, without the `.txt` suffix
    pub manifest_name: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            languages_file: PathBuf::from("default_configs.json"),
            mode: ExecutionMode::default(),
            fallback_language: "en".to_string(),
            gap_seconds: 0.30,
            output_format: OutputFormat::default(),
            mp3_bitrate_kbps: 192,
            speed: 1.0,
            split_pattern: DEFAULT_SPLIT_PATTERN.to_string(),
            text_extension: "txt".to_string(),
            manifest_name: "audio_files_info".to_string(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> BatchResult<()> {
        if !self.gap_seconds.is_finite() || self.gap_seconds < 0.0 {
            return Err(BatchError::InvalidConfig(format!(
                "gap_seconds must be a non-negative number, got {}",
                self.gap_seconds
            )));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(BatchError::InvalidConfig(format!(
                "speed must be positive, got {}",
                self.speed
            )));
        }
        if let Err(e) = regex::Regex::new(&self.split_pattern) {
            return Err(BatchError::InvalidConfig(format!(
                "split_pattern '{}' is not a valid regex: {e}",
                self.split_pattern
            )));
        }
        if self.output_format == OutputFormat::Mp3
            && !SUPPORTED_MP3_BITRATES.contains(&self.mp3_bitrate_kbps)
        {
            return Err(BatchError::InvalidConfig(format!(
                "unsupported MP3 bitrate {} kbit/s (supported: {:?})",
                self.mp3_bitrate_kbps, SUPPORTED_MP3_BITRATES
            )));
        }
        if self.text_extension.trim_start_matches('.').is_empty() {
            return Err(BatchError::InvalidConfig(
                "text_extension cannot be empty".to_string(),
            ));
        }
        if self.manifest_name.trim().is_empty() {
            return Err(BatchError::InvalidConfig(
                "manifest_name cannot be empty".to_string(),
            ));
        }
        if self.fallback_language.trim().is_empty() {
            return Err(BatchError::InvalidConfig(
                "fallback_language cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Extension without a leading dot
    pub fn text_extension(&self) -> &str {
        self.text_extension.trim_start_matches('.')
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.txt", self.manifest_name))
    }
}
