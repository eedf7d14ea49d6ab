//! Settings file and command-line overrides

use anyhow::{Context, Result};
use narrator_batch::{ExecutionMode, OutputFormat, RunConfig};
use narrator_speech::SpeechSynthesizer;
use narrator_speech::providers::command::{CommandConfig, CommandSynthesizer};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of a `narrator.toml` file.
///
/// Run options live at the top level; the synthesis engine is chosen in an
/// `[engine]` table:
///
/// ```toml
/// input_dir = "books"
/// output_format = "wav"
///
/// [engine]
/// kind = "command"
/// program = "espeak-ng"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(flatten, default)]
    pub run: RunConfig,

    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EngineSettings {
    Command(CommandConfig),
    #[cfg(feature = "pocket-tts")]
    PocketTts(narrator_speech::providers::pocket_tts::PocketTTSConfig),
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings::Command(CommandConfig::default())
    }
}

impl EngineSettings {
    pub fn build(&self) -> Result<Box<dyn SpeechSynthesizer>> {
        match self {
            EngineSettings::Command(config) => {
                log::info!("Using command engine: {}", config.program);
                let engine = CommandSynthesizer::new(config.clone())
                    .context("Failed to set up command engine")?;
                Ok(Box::new(engine))
            }
            #[cfg(feature = "pocket-tts")]
            EngineSettings::PocketTts(config) => {
                use narrator_speech::providers::pocket_tts::PocketTTS;

                log::info!("Loading Pocket-TTS model {}", config.model_variant);
                let engine =
                    PocketTTS::new(config.clone()).context("Failed to load Pocket-TTS model")?;
                Ok(Box::new(engine))
            }
        }
    }
}

impl Settings {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("Malformed settings file {}", path.display()))
    }

    /// Apply command-line values on top of the file
    pub fn apply(&mut self, overrides: Overrides) {
        let Overrides {
            input,
            output,
            languages,
            mode,
            format,
        } = overrides;

        if let Some(input) = input {
            self.run.input_dir = input;
        }
        if let Some(output) = output {
            self.run.output_dir = output;
        }
        if let Some(languages) = languages {
            self.run.languages_file = languages;
        }
        if let Some(mode) = mode {
            self.run.mode = mode;
        }
        if let Some(format) = format {
            self.run.output_format = format;
        }
    }
}

/// Values given on the command line, all optional
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub languages: Option<PathBuf>,
    pub mode: Option<ExecutionMode>,
    pub format: Option<OutputFormat>,
}
