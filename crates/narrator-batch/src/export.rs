//! Track export: WAV via hound, MP3 via LAME

use crate::compiler::CompiledTrack;
use crate::config::OutputFormat;
use crate::error::{BatchError, BatchResult};
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, MonoPcm};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Room LAME needs for flushing its internal buffers
const MP3_FLUSH_RESERVE: usize = 7200;

/// Highest bitrate an MPEG-2 Layer III frame can carry
const MPEG2_MAX_KBPS: u32 = 160;

/// Write 16-bit mono PCM to a WAV file
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> BatchResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| BatchError::wav(path, e))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| BatchError::wav(path, e))?;
    }
    writer.finalize().map_err(|e| BatchError::wav(path, e))?;
    Ok(())
}

fn lame_bitrate(kbps: u32) -> BatchResult<Bitrate> {
    let bitrate = match kbps {
        64 => Bitrate::Kbps64,
        96 => Bitrate::Kbps96,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => {
            return Err(BatchError::Mp3(format!(
                "unsupported bitrate {other} kbit/s"
            )));
        }
    };
    Ok(bitrate)
}

/// Output rate for the MP3 stream.
///
/// Below 32 kHz LAME writes MPEG-2/2.5 frames, which top out at 160 kbit/s
/// and would silently lower a higher requested bitrate. Those requests are
/// encoded as MPEG-1 at the nearest rate of the same family instead.
fn mp3_output_rate(sample_rate: u32, bitrate_kbps: u32) -> Option<NonZeroU32> {
    if bitrate_kbps <= MPEG2_MAX_KBPS || sample_rate >= 32_000 {
        return None;
    }
    let rate = if sample_rate % 11_025 == 0 { 44_100 } else { 48_000 };
    NonZeroU32::new(rate)
}

/// Encode 16-bit mono PCM into an MP3 byte stream
pub fn encode_mp3(samples: &[i16], sample_rate: u32, bitrate_kbps: u32) -> BatchResult<Vec<u8>> {
    let mut builder =
        Builder::new().ok_or_else(|| BatchError::Mp3("failed to create LAME builder".into()))?;
    builder
        .set_num_channels(1)
        .map_err(|e| BatchError::Mp3(format!("set channels: {e:?}")))?;
    builder
        .set_sample_rate(sample_rate)
        .map_err(|e| BatchError::Mp3(format!("set sample rate: {e:?}")))?;
    if let Some(rate) = mp3_output_rate(sample_rate, bitrate_kbps) {
        log::debug!("Resampling {sample_rate} Hz to {rate} Hz for {bitrate_kbps} kbit/s MP3");
        builder
            .set_output_sample_rate(Some(rate))
            .map_err(|e| BatchError::Mp3(format!("set output sample rate: {e:?}")))?;
    }
    builder
        .set_brate(lame_bitrate(bitrate_kbps)?)
        .map_err(|e| BatchError::Mp3(format!("set bitrate: {e:?}")))?;
    let mut encoder = builder
        .build()
        .map_err(|e| BatchError::Mp3(format!("initialize encoder: {e:?}")))?;

    let mut out = Vec::new();
    out.reserve(mp3lame_encoder::max_required_buffer_size(samples.len()));
    encoder
        .encode_to_vec(MonoPcm(samples), &mut out)
        .map_err(|e| BatchError::Mp3(format!("encode: {e:?}")))?;

    out.reserve(MP3_FLUSH_RESERVE);
    encoder
        .flush_to_vec::<FlushNoGap>(&mut out)
        .map_err(|e| BatchError::Mp3(format!("flush: {e:?}")))?;

    Ok(out)
}

/// Write a compiled track in the requested container
pub fn export_track(
    track: &CompiledTrack,
    path: &Path,
    format: OutputFormat,
    mp3_bitrate_kbps: u32,
) -> BatchResult<()> {
    match format {
        OutputFormat::Wav => write_wav(path, track.samples(), track.sample_rate()),
        OutputFormat::Mp3 => {
            let bytes = encode_mp3(track.samples(), track.sample_rate(), mp3_bitrate_kbps)?;
            std::fs::write(path, bytes).map_err(|e| BatchError::io(path, e))
        }
    }
}

/// Delete per-segment checkpoint files. Any failure aborts.
pub fn remove_segment_files(paths: &[PathBuf]) -> BatchResult<()> {
    for path in paths {
        std::fs::remove_file(path).map_err(|e| BatchError::io(path, e))?;
        log::debug!("Removed temporary WAV file: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_wav_roundtrip_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        write_wav(&path, &[0, 1000, -1000, i16::MAX], 24_000).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 1000, -1000, i16::MAX]);
    }

    #[test]
    fn test_encode_mp3_produces_frames() {
        let samples: Vec<i16> = (0..24_000)
            .map(|i| ((i as f32 * 0.05).sin() * 8000.0) as i16)
            .collect();
        let bytes = encode_mp3(&samples, 24_000, 192).unwrap();
        assert!(!bytes.is_empty());
        // Every MPEG audio frame starts with an 11-bit sync word
        let has_sync = bytes.windows(2).any(|w| w[0] == 0xFF && (w[1] & 0xE0) == 0xE0);
        assert!(has_sync);
    }

    /// Bitrate in kbit/s and sample rate of the first MPEG-1 Layer III frame
    fn first_frame_header(bytes: &[u8]) -> (u32, u32) {
        const MPEG1_L3_KBPS: [u32; 15] = [
            0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
        ];
        const MPEG1_RATES: [u32; 3] = [44_100, 48_000, 32_000];

        let at = bytes
            .windows(2)
            .position(|w| w[0] == 0xFF && (w[1] & 0xE0) == 0xE0)
            .expect("no frame sync");
        let header = &bytes[at..at + 4];
        let version = (header[1] >> 3) & 0b11;
        let layer = (header[1] >> 1) & 0b11;
        assert_eq!(layer, 0b01, "not Layer III");
        assert_eq!(version, 0b11, "not an MPEG-1 frame");
        let kbps = MPEG1_L3_KBPS[(header[2] >> 4) as usize];
        let rate = MPEG1_RATES[((header[2] >> 2) & 0b11) as usize];
        (kbps, rate)
    }

    #[test]
    fn test_mp3_keeps_requested_bitrate_for_24khz_tracks() {
        let samples: Vec<i16> = (0..48_000)
            .map(|i| ((i as f32 * 0.05).sin() * 8000.0) as i16)
            .collect();
        let bytes = encode_mp3(&samples, 24_000, 192).unwrap();
        let (kbps, rate) = first_frame_header(&bytes);
        assert_eq!(kbps, 192);
        assert_eq!(rate, 48_000);
    }

    #[test]
    fn test_mp3_output_rate() {
        assert_eq!(mp3_output_rate(24_000, 128), None);
        assert_eq!(mp3_output_rate(24_000, 160), None);
        assert_eq!(mp3_output_rate(48_000, 320), None);
        assert_eq!(mp3_output_rate(24_000, 192), NonZeroU32::new(48_000));
        assert_eq!(mp3_output_rate(22_050, 256), NonZeroU32::new(44_100));
    }

    #[test]
    fn test_unsupported_bitrate() {
        assert!(matches!(
            encode_mp3(&[0; 100], 24_000, 200),
            Err(BatchError::Mp3(_))
        ));
    }

    #[test]
    fn test_export_track_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut track = CompiledTrack::new(24_000);
        track.append(&[100; 2_400], 7_200);

        let wav = dir.path().join("t.wav");
        export_track(&track, &wav, OutputFormat::Wav, 192).unwrap();
        assert_eq!(hound::WavReader::open(&wav).unwrap().len(), 9_600);

        let mp3 = dir.path().join("t.mp3");
        export_track(&track, &mp3, OutputFormat::Mp3, 192).unwrap();
        assert!(std::fs::metadata(&mp3).unwrap().len() > 0);
    }

    #[test]
    fn test_remove_segment_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = (0..2).map(|i| dir.path().join(format!("s_{i}.wav"))).collect();
        for path in &paths {
            std::fs::write(path, b"x").unwrap();
        }
        remove_segment_files(&paths).unwrap();
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn test_remove_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = remove_segment_files(&[dir.path().join("gone.wav")]);
        assert!(matches!(result, Err(BatchError::Io { .. })));
    }
}
