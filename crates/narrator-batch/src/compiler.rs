//! Segment compiler: float segments in, one 16-bit track out

use crate::error::{BatchError, BatchResult};
use crate::export::write_wav;
use narrator_speech::{SpeechSegment, DEFAULT_SAMPLE_RATE};
use std::path::{Path, PathBuf};

/// Sample rate of every compiled track
pub const TRACK_SAMPLE_RATE: u32 = DEFAULT_SAMPLE_RATE;

/// Convert float samples to 16-bit PCM.
///
/// Samples are clamped to [-1.0, 1.0] before scaling by 32767 and truncated
/// toward zero, so out-of-range input saturates instead of wrapping. NaN maps
/// to silence.
pub fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| {
            if s.is_nan() {
                0
            } else {
                (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
            }
        })
        .collect()
}

/// Number of samples covering `seconds` of audio
pub fn gap_samples(seconds: f32, sample_rate: u32) -> usize {
    (seconds as f64 * sample_rate as f64).round() as usize
}

/// Concatenated clips and silence for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTrack {
    samples: Vec<i16>,
    sample_rate: u32,
    segment_count: usize,
}

impl CompiledTrack {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            segment_count: 0,
        }
    }

    /// Append one clip followed by `gap` samples of silence
    pub fn append(&mut self, clip: &[i16], gap: usize) {
        self.samples.reserve(clip.len() + gap);
        self.samples.extend_from_slice(clip);
        self.samples.resize(self.samples.len() + gap, 0);
        self.segment_count += 1;
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// True when the track has no audio at all
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Accumulates the segments of a single text file.
///
/// Each segment is checkpointed to `<dir>/<stem>_<index>.wav` before it is
/// appended; the checkpoint paths are handed back by [`SegmentCompiler::finish`]
/// so the exporter can delete them.
pub struct SegmentCompiler {
    scratch_dir: PathBuf,
    stem: String,
    gap: usize,
    track: CompiledTrack,
    checkpoints: Vec<PathBuf>,
}

impl SegmentCompiler {
    pub fn new(scratch_dir: &Path, stem: &str, gap_seconds: f32) -> Self {
        Self {
            scratch_dir: scratch_dir.to_path_buf(),
            stem: stem.to_string(),
            gap: gap_samples(gap_seconds, TRACK_SAMPLE_RATE),
            track: CompiledTrack::new(TRACK_SAMPLE_RATE),
            checkpoints: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: &SpeechSegment) -> BatchResult<()> {
        let expected = self.track.segment_count();
        if segment.index != expected {
            return Err(BatchError::SegmentOrder {
                expected,
                index: segment.index,
            });
        }

        let audio = &segment.audio;
        if audio.sample_rate != TRACK_SAMPLE_RATE || audio.channels != 1 {
            return Err(BatchError::SegmentFormat {
                index: segment.index,
                sample_rate: audio.sample_rate,
                channels: audio.channels,
                expected_rate: TRACK_SAMPLE_RATE,
            });
        }

        log::debug!("Processing audio segment {}", segment.index);
        let clip = to_pcm16(&audio.samples);

        let checkpoint = self
            .scratch_dir
            .join(format!("{}_{}.wav", self.stem, segment.index));
        write_wav(&checkpoint, &clip, TRACK_SAMPLE_RATE)?;
        log::debug!("Exported WAV: {}", checkpoint.display());
        self.checkpoints.push(checkpoint);

        self.track.append(&clip, self.gap);
        Ok(())
    }

    pub fn segment_count(&self) -> usize {
        self.track.segment_count()
    }

    pub fn finish(self) -> (CompiledTrack, Vec<PathBuf>) {
        (self.track, self.checkpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrator_speech::AudioData;

    fn segment(index: usize, samples: Vec<f32>) -> SpeechSegment {
        SpeechSegment {
            index,
            text: format!("chunk {index}"),
            phonemes: None,
            audio: AudioData::mono(samples, TRACK_SAMPLE_RATE),
        }
    }

    #[test]
    fn test_to_pcm16_scaling() {
        assert_eq!(to_pcm16(&[0.0, 1.0, -1.0, 0.5]), vec![0, 32767, -32767, 16383]);
    }

    #[test]
    fn test_to_pcm16_clamps_out_of_range() {
        assert_eq!(to_pcm16(&[1.5, -2.0, 100.0]), vec![32767, -32767, 32767]);
    }

    #[test]
    fn test_to_pcm16_nan_is_silence() {
        assert_eq!(to_pcm16(&[f32::NAN]), vec![0]);
    }

    #[test]
    fn test_gap_samples() {
        assert_eq!(gap_samples(0.30, 24_000), 7_200);
        assert_eq!(gap_samples(0.0, 24_000), 0);
    }

    #[test]
    fn test_track_append_adds_silence() {
        let mut track = CompiledTrack::new(24_000);
        assert!(track.is_empty());
        track.append(&[5, 6], 3);
        track.append(&[7], 0);
        assert_eq!(track.samples(), &[5, 6, 0, 0, 0, 7]);
        assert_eq!(track.segment_count(), 2);
        assert!(!track.is_empty());
    }

    #[test]
    fn test_track_duration() {
        let mut track = CompiledTrack::new(24_000);
        track.append(&vec![0; 24_000], 7_200);
        track.append(&vec![0; 19_200], 7_200);
        assert!((track.duration_seconds() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_compiler_checkpoints_and_track() {
        let dir = tempfile::tempdir().unwrap();
        let mut compiler = SegmentCompiler::new(dir.path(), "greeting", 0.30);

        compiler.push(&segment(0, vec![0.25; 2_400])).unwrap();
        compiler.push(&segment(1, vec![-0.25; 1_200])).unwrap();
        assert_eq!(compiler.segment_count(), 2);

        let (track, checkpoints) = compiler.finish();
        assert_eq!(track.samples().len(), 2_400 + 7_200 + 1_200 + 7_200);
        assert_eq!(
            checkpoints,
            vec![
                dir.path().join("greeting_0.wav"),
                dir.path().join("greeting_1.wav")
            ]
        );

        let reader = hound::WavReader::open(&checkpoints[1]).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 1_200);
    }

    #[test]
    fn test_compiler_rejects_out_of_order_segments() {
        let dir = tempfile::tempdir().unwrap();
        let mut compiler = SegmentCompiler::new(dir.path(), "x", 0.30);
        compiler.push(&segment(0, vec![0.0; 10])).unwrap();

        assert!(matches!(
            compiler.push(&segment(2, vec![0.0; 10])),
            Err(BatchError::SegmentOrder {
                expected: 1,
                index: 2
            })
        ));
    }

    #[test]
    fn test_compiler_rejects_wrong_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut compiler = SegmentCompiler::new(dir.path(), "x", 0.30);
        let mut wrong = segment(0, vec![0.0; 10]);
        wrong.audio.sample_rate = 22_050;

        match compiler.push(&wrong) {
            Err(BatchError::SegmentFormat {
                sample_rate,
                expected_rate,
                ..
            }) => {
                assert_eq!(sample_rate, 22_050);
                assert_eq!(expected_rate, 24_000);
            }
            other => panic!("Unexpected result: {other:?}"),
        }
        assert!(!dir.path().join("x_0.wav").exists());
    }
}
