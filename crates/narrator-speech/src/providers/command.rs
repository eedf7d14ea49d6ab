//! External-program synthesis backend
//!
//! Each text chunk is piped to a synthesis program on stdin and the WAV it
//! produces becomes one segment. Arguments may contain the placeholders
//! `{voice}`, `{lang}`, `{speed}`, `{wpm}` and `{out}`. When `{out}` is
//! present it is replaced by a temporary `.wav` path and the audio is read
//! from that file; otherwise the WAV is read from stdout.

use crate::conversion::{decode_wav_bytes, normalize_audio};
use crate::text::{compile_split_pattern, split_text};
use crate::{
    DEFAULT_SAMPLE_RATE, ModelInfo, SegmentStream, SpeechSegment, SpeechSynthesizer,
    SynthesisRequest, TTSError, TTSResult,
};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::process::{Command, Output, Stdio};

const PROVIDER_NAME: &str = "command";

const OUT_PLACEHOLDER: &str = "{out}";

/// Words per minute at speed 1.0, matching espeak's default rate
const BASE_WPM: f32 = 175.0;

/// Configuration for the command backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Program to execute
    #[serde(default = "default_program")]
    pub program: String,

    /// Argument templates
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_program() -> String {
    "espeak-ng".to_string()
}

fn default_args() -> Vec<String> {
    ["-v", "{voice}", "-s", "{wpm}", "-w", OUT_PLACEHOLDER, "--stdin"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

/// Synthesizer that shells out once per chunk
pub struct CommandSynthesizer {
    config: CommandConfig,
    sample_rate: u32,
}

impl CommandSynthesizer {
    pub fn new(config: CommandConfig) -> TTSResult<Self> {
        if config.program.trim().is_empty() {
            return Err(TTSError::InvalidRequest(
                "command backend requires a program".to_string(),
            ));
        }
        Ok(Self {
            config,
            sample_rate: DEFAULT_SAMPLE_RATE,
        })
    }

    fn render_args(&self, request: &SynthesisRequest) -> Vec<String> {
        let wpm = (request.speed * BASE_WPM).round() as u32;
        self.config
            .args
            .iter()
            .map(|arg| {
                arg.replace("{voice}", request.voice.name())
                    .replace("{lang}", &request.language)
                    .replace("{speed}", &request.speed.to_string())
                    .replace("{wpm}", &wpm.to_string())
            })
            .collect()
    }

    fn writes_to_file(args: &[String]) -> bool {
        args.iter().any(|arg| arg.contains(OUT_PLACEHOLDER))
    }

    fn io_error(&self, err: std::io::Error, operation: &str) -> TTSError {
        TTSError::IoError(err, operation.to_string(), self.config.program.clone())
    }

    /// Run the program once, feeding `chunk` on stdin while stdout and stderr
    /// drain, so neither side can block the other on a full pipe.
    fn run_program(&self, args: &[String], chunk: &str, voice: &str) -> TTSResult<Output> {
        let mut child = Command::new(&self.config.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.io_error(e, "spawn synthesis program"))?;

        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(chunk.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output.map_err(|e| self.io_error(e, "wait for synthesis program"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TTSError::GenerationFailed(
                format!(
                    "{} exited with {}: {}",
                    self.config.program,
                    output.status,
                    stderr.trim()
                ),
                chunk.len(),
                voice.to_string(),
            ));
        }

        match written {
            // Programs may stop reading once they have what they need
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                log::debug!("{} closed stdin early", self.config.program);
            }
            Err(e) => return Err(self.io_error(e, "write chunk to stdin")),
            Ok(()) => {}
        }

        Ok(output)
    }

    /// WAV bytes for one chunk, from `{out}` or stdout
    fn run_chunk(&self, args: &[String], chunk: &str, voice: &str) -> TTSResult<Vec<u8>> {
        if !Self::writes_to_file(args) {
            return Ok(self.run_program(args, chunk, voice)?.stdout);
        }

        let out = tempfile::Builder::new()
            .prefix("narrator-chunk-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| self.io_error(e, "create output file"))?;
        let out_path = out.path().to_string_lossy().into_owned();
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.replace(OUT_PLACEHOLDER, &out_path))
            .collect();

        self.run_program(&args, chunk, voice)?;
        std::fs::read(out.path()).map_err(|e| self.io_error(e, "read output file"))
    }

    fn generate_chunk(
        &self,
        index: usize,
        chunk: String,
        args: &[String],
        voice: &str,
    ) -> TTSResult<SpeechSegment> {
        log::debug!(
            "Synthesizing chunk {index} ({} chars) via {}",
            chunk.len(),
            self.config.program
        );
        let wav = self.run_chunk(args, &chunk, voice)?;
        let audio = decode_wav_bytes(wav, PROVIDER_NAME)?;
        Ok(SpeechSegment {
            index,
            text: chunk,
            phonemes: None,
            audio: normalize_audio(audio, self.sample_rate),
        })
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn synthesize(&self, request: SynthesisRequest) -> TTSResult<SegmentStream<'_>> {
        let pattern = compile_split_pattern(&request.split_pattern)?;
        let chunks = split_text(&request.text, &pattern);
        let args = self.render_args(&request);
        let voice = request.voice.name;

        Ok(Box::new(chunks.into_iter().enumerate().map(
            move |(index, chunk)| self.generate_chunk(index, chunk, &args, &voice),
        )))
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            id: self.config.program.clone(),
            name: format!("external program '{}'", self.config.program),
            description: Some(format!("args: {}", self.config.args.join(" "))),
            languages: vec![],
        }
    }

    fn default_sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
