//! Sequential batch runner
//!
//! Batches run one after another, files within a batch in name order, and
//! segments within a file in generation order. The first error aborts the run.

use crate::compiler::{SegmentCompiler, TRACK_SAMPLE_RATE};
use crate::config::RunConfig;
use crate::error::{BatchError, BatchResult};
use crate::export::{export_track, remove_segment_files};
use crate::languages::{LanguageLookup, LanguageProfile, LanguageTable};
use crate::manifest::{Manifest, ManifestEntry};
use crate::walker::{self, Batch};
use narrator_speech::{SpeechSynthesizer, SynthesisRequest, TTSError};
use std::path::{Path, PathBuf};

/// What a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub batches: usize,
    /// Text files that produced no audio
    pub skipped_files: usize,
}

pub struct BatchRunner<'a> {
    config: &'a RunConfig,
    languages: &'a LanguageTable,
    synthesizer: &'a dyn SpeechSynthesizer,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        config: &'a RunConfig,
        languages: &'a LanguageTable,
        synthesizer: &'a dyn SpeechSynthesizer,
    ) -> Self {
        Self {
            config,
            languages,
            synthesizer,
        }
    }

    pub fn run(&self) -> BatchResult<RunSummary> {
        self.config.validate()?;
        self.check_engine()?;
        std::fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BatchError::io(&self.config.output_dir, e))?;

        let batches = walker::discover_batches(self.config)?;
        let mut manifest = Manifest::new();
        let mut skipped_files = 0;

        for batch in &batches {
            skipped_files += self.run_batch(batch, &mut manifest)?;
        }

        let manifest_path = self.config.manifest_path();
        manifest.write_to(&manifest_path)?;
        log::info!(
            "Processing complete: {} tracks, {} files without audio",
            manifest.len(),
            skipped_files
        );

        Ok(RunSummary {
            manifest_path,
            manifest,
            batches: batches.len(),
            skipped_files,
        })
    }

    /// Reject engines whose segments could never be compiled into a track
    fn check_engine(&self) -> BatchResult<()> {
        let sample_rate = self.synthesizer.default_sample_rate();
        if sample_rate != TRACK_SAMPLE_RATE {
            return Err(BatchError::EngineSampleRate {
                provider: self.synthesizer.provider_name().to_string(),
                sample_rate,
                expected_rate: TRACK_SAMPLE_RATE,
            });
        }
        Ok(())
    }

    /// Returns the number of files skipped for lack of audio
    fn run_batch(&self, batch: &Batch, manifest: &mut Manifest) -> BatchResult<usize> {
        log::info!("Processing folder for language key: {}", batch.language_key);

        let lookup = self.languages.resolve(&batch.language_key);
        if let LanguageLookup::Defaulted { requested, profile } = lookup {
            log::warn!(
                "No language configuration for '{}'; falling back to '{}'",
                requested,
                profile.language_key
            );
        }
        let profile = lookup.profile();
        log::info!(
            "Using language code '{}' and voice '{}'",
            profile.model_language_code,
            profile.voice_id
        );

        walker::ensure_dir(&batch.output_dir)?;
        let files = walker::list_text_files(&batch.input_dir, self.config.text_extension())?;
        log::info!(
            "Found {} text files in {}",
            files.len(),
            batch.input_dir.display()
        );

        let mut skipped = 0;
        for file in &files {
            match self.process_file(batch, profile, file)? {
                Some(entry) => manifest.push(entry),
                None => skipped += 1,
            }
        }
        Ok(skipped)
    }

    fn process_file(
        &self,
        batch: &Batch,
        profile: &LanguageProfile,
        path: &Path,
    ) -> BatchResult<Option<ManifestEntry>> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!("Processing file: {} (prefix: {})", path.display(), stem);

        let text = std::fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
        log::info!("Text content loaded ({} characters)", text.chars().count());

        let request = SynthesisRequest::new(
            text,
            profile.model_language_code.as_str(),
            profile.voice_id.as_str(),
        )
        .with_speed(self.config.speed)
        .with_split_pattern(self.config.split_pattern.as_str());

        let synthesis_error = |source: TTSError| BatchError::Synthesis {
            path: path.to_path_buf(),
            source,
        };
        let segments = self
            .synthesizer
            .synthesize(request)
            .map_err(synthesis_error)?;

        let mut compiler = SegmentCompiler::new(&batch.output_dir, &stem, self.config.gap_seconds);
        for segment in segments {
            let segment = segment.map_err(synthesis_error)?;
            compiler.push(&segment)?;
        }
        log::info!("Total segments processed: {}", compiler.segment_count());

        let (track, checkpoints) = compiler.finish();
        if track.is_empty() {
            log::info!("No audio segments generated for file {}", path.display());
            remove_segment_files(&checkpoints)?;
            return Ok(None);
        }

        let file_name = format!("{}.{}", stem, self.config.output_format.extension());
        let output_path = batch.output_dir.join(&file_name);
        export_track(
            &track,
            &output_path,
            self.config.output_format,
            self.config.mp3_bitrate_kbps,
        )?;
        log::info!("Compiled audio generated: {}", output_path.display());

        remove_segment_files(&checkpoints)?;

        Ok(Some(ManifestEntry {
            relative_output_path: batch.relative_output_path(&file_name),
            duration_seconds: track.duration_seconds(),
        }))
    }
}
