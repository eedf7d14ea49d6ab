//! Conversion utilities between engine output and pipeline audio

use crate::{AudioData, TTSError, TTSResult};
use std::io::Read;

/// Convert a 16-bit PCM sample to f32 in [-1.0, 1.0)
pub fn pcm16_to_f32(sample: i16) -> f32 {
    sample as f32 / 32768.0
}

/// Average interleaved channels down to mono
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Resample mono audio with linear interpolation
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let target_len = (samples.len() as f64 / ratio).round() as usize;
    let mut resampled = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos as usize;

        if src_idx + 1 < samples.len() {
            let frac = (src_pos - src_idx as f64) as f32;
            resampled.push(samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac);
        } else if let Some(&last) = samples.last() {
            resampled.push(last);
        }
    }

    resampled
}

/// Normalise arbitrary audio to mono at `target_rate`
pub fn normalize_audio(audio: AudioData, target_rate: u32) -> AudioData {
    let mono = downmix_to_mono(&audio.samples, audio.channels);
    let samples = resample_linear(&mono, audio.sample_rate, target_rate);
    AudioData::mono(samples, target_rate)
}

/// Decode a WAV stream into float samples
pub fn decode_wav<R: Read>(reader: R, provider: &str) -> TTSResult<AudioData> {
    let reader = hound::WavReader::new(reader)
        .map_err(|e| TTSError::DecodeError(e.to_string(), provider.to_string()))?;
    let spec = reader.spec();
    let decode_err = |e: hound::Error| TTSError::DecodeError(e.to_string(), provider.to_string());

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .into_samples::<i16>()
                .map(|s| s.map(pcm16_to_f32).map_err(decode_err))
                .collect::<TTSResult<_>>()?,
            32 => reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0).map_err(decode_err))
                .collect::<TTSResult<_>>()?,
            bits => {
                return Err(TTSError::DecodeError(
                    format!("unsupported bit depth: {bits}"),
                    provider.to_string(),
                ));
            }
        },
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map_err(decode_err))
            .collect::<TTSResult<_>>()?,
    };

    Ok(AudioData {
        samples,
        channels: spec.channels as usize,
        sample_rate: spec.sample_rate,
    })
}

/// Patch the size fields of a WAV file that was written to a pipe.
///
/// Programs streaming WAV to stdout (espeak-ng among them) cannot seek back
/// to fill in the RIFF and `data` sizes, so they leave a large placeholder.
/// Sizes that claim more bytes than are present are clamped to what actually
/// arrived, rounded down to whole sample frames. Well-formed files are left
/// untouched.
pub fn repair_streamed_wav(bytes: &mut [u8]) {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return;
    }

    let riff_len = (bytes.len() - 8) as u32;
    if read_u32_le(bytes, 4) > riff_len {
        bytes[4..8].copy_from_slice(&riff_len.to_le_bytes());
    }

    let mut block_align = 1usize;
    let mut pos = 12usize;
    while pos + 8 <= bytes.len() {
        let id = [bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]];
        let size = read_u32_le(bytes, pos + 4) as usize;
        let body = pos + 8;

        if &id == b"fmt " && body + 14 <= bytes.len() {
            let align = u16::from_le_bytes([bytes[body + 12], bytes[body + 13]]);
            block_align = (align as usize).max(1);
        }
        if &id == b"data" {
            let available = bytes.len() - body;
            if size > available {
                let clamped = (available - available % block_align) as u32;
                bytes[pos + 4..pos + 8].copy_from_slice(&clamped.to_le_bytes());
            }
            return;
        }

        pos = body.saturating_add(size).saturating_add(size & 1);
    }
}

fn read_u32_le(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Decode WAV bytes captured from a program, tolerating streamed headers
pub fn decode_wav_bytes(mut bytes: Vec<u8>, provider: &str) -> TTSResult<AudioData> {
    repair_streamed_wav(&mut bytes);
    decode_wav(std::io::Cursor::new(bytes), provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_pcm16_to_f32() {
        assert_eq!(pcm16_to_f32(0), 0.0);
        assert_eq!(pcm16_to_f32(i16::MIN), -1.0);
        assert!(pcm16_to_f32(i16::MAX) < 1.0);
    }

    #[test]
    fn test_downmix_stereo() {
        let mono = downmix_to_mono(&[1.0, 0.0, -0.5, -0.5], 2);
        assert_eq!(mono, vec![0.5, -0.5]);
    }

    #[test]
    fn test_downmix_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn test_resample_lengths() {
        let samples = vec![0.0; 22_050];
        assert_eq!(resample_linear(&samples, 22_050, 24_000).len(), 24_000);

        let samples = vec![0.0; 48_000];
        assert_eq!(resample_linear(&samples, 48_000, 24_000).len(), 24_000);
    }

    #[test]
    fn test_resample_identity() {
        let samples = vec![0.25, -0.25, 0.5];
        assert_eq!(resample_linear(&samples, 24_000, 24_000), samples);
    }

    #[test]
    fn test_resample_interpolates() {
        let out = resample_linear(&[0.0, 1.0], 1, 2);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn test_normalize_audio() {
        let audio = AudioData {
            samples: vec![0.5; 2 * 12_000],
            channels: 2,
            sample_rate: 12_000,
        };
        let normalized = normalize_audio(audio, 24_000);
        assert_eq!(normalized.channels, 1);
        assert_eq!(normalized.sample_rate, 24_000);
        assert_eq!(normalized.samples.len(), 24_000);
    }

    #[test]
    fn test_decode_wav_pcm16() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for sample in [0i16, 16_384, -16_384] {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }

        let audio = decode_wav(Cursor::new(cursor.into_inner()), "test").unwrap();
        assert_eq!(audio.sample_rate, 22_050);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.samples, vec![0.0, 0.5, -0.5]);
    }

    /// 16-bit mono header as written to a pipe, sizes left at the placeholder
    fn streamed_header(sample_rate: u32) -> Vec<u8> {
        let mut header = Vec::new();
        header.extend_from_slice(b"RIFF");
        header.extend_from_slice(&0x7fff_f000u32.to_le_bytes());
        header.extend_from_slice(b"WAVEfmt ");
        header.extend_from_slice(&16u32.to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes());
        header.extend_from_slice(&sample_rate.to_le_bytes());
        header.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        header.extend_from_slice(&2u16.to_le_bytes());
        header.extend_from_slice(&16u16.to_le_bytes());
        header.extend_from_slice(b"data");
        header.extend_from_slice(&0x7fff_f000u32.to_le_bytes());
        header
    }

    #[test]
    fn test_decode_streamed_header() {
        let mut bytes = streamed_header(22_050);
        bytes.extend(std::iter::repeat_n(0u8, 4_410));

        let audio = decode_wav_bytes(bytes, "test").unwrap();
        assert_eq!(audio.sample_rate, 22_050);
        assert_eq!(audio.samples.len(), 2_205);
    }

    #[test]
    fn test_repair_drops_partial_frame() {
        let mut bytes = streamed_header(24_000);
        bytes.extend_from_slice(&[1, 0, 2, 0, 3]);
        repair_streamed_wav(&mut bytes);

        assert_eq!(read_u32_le(&bytes, 4), (bytes.len() - 8) as u32);
        assert_eq!(read_u32_le(&bytes, 40), 4);
    }

    #[test]
    fn test_repair_leaves_valid_wav_alone() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 24_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            writer.write_sample(7i16).unwrap();
            writer.finalize().unwrap();
        }
        let original = cursor.into_inner();
        let mut repaired = original.clone();
        repair_streamed_wav(&mut repaired);
        assert_eq!(repaired, original);
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_wav(Cursor::new(b"not a wav".to_vec()), "test");
        assert!(matches!(result, Err(TTSError::DecodeError(_, provider)) if provider == "test"));
    }
}
