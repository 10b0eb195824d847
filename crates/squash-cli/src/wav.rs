//! Stereo WAV reading and writing.

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Deinterleaved stereo audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Number of frames (samples per channel).
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Largest absolute sample across both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .fold(0.0_f32, |m, s| m.max(s.abs()))
    }
}

/// Format of a WAV file.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of channels in the file.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is float).
    pub bits_per_sample: u16,
}

/// Read a WAV file as stereo.
///
/// Mono files are duplicated to both channels; files with more than two
/// channels keep the first two.
pub fn read_wav_stereo(path: &Path) -> anyhow::Result<(StereoSamples, WavSpec)> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let hound_spec = reader.spec();
    let spec = WavSpec {
        channels: hound_spec.channels,
        sample_rate: hound_spec.sample_rate,
        bits_per_sample: hound_spec.bits_per_sample,
    };
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let mut samples = StereoSamples::default();
    for frame in interleaved.chunks_exact(channels) {
        samples.left.push(frame[0]);
        samples.right.push(frame.get(1).copied().unwrap_or(frame[0]));
    }
    Ok((samples, spec))
}

/// Write stereo samples. A bit depth of 32 writes float, otherwise PCM.
pub fn write_wav_stereo(
    path: &Path,
    samples: &StereoSamples,
    sample_rate: u32,
    bits_per_sample: u16,
) -> anyhow::Result<()> {
    let hound_spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample,
        sample_format: if bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, hound_spec)
        .with_context(|| format!("failed to create {}", path.display()))?;

    if bits_per_sample == 32 {
        for (l, r) in samples.left.iter().zip(&samples.right) {
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
    } else {
        let max_val = (1i64 << (bits_per_sample - 1)) as f32;
        for (l, r) in samples.left.iter().zip(&samples.right) {
            writer.write_sample((*l * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
            writer.write_sample((*r * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.wav");
        let samples = StereoSamples {
            left: vec![0.0, 0.5, -0.25],
            right: vec![0.1, -0.9, 1.0],
        };
        write_wav_stereo(&path, &samples, 44100, 32).unwrap();

        let (read, spec) = read_wav_stereo(&path).unwrap();
        assert_eq!(read, samples);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.channels, 2);
        assert_eq!(read.peak(), 1.0);
    }

    #[test]
    fn mono_pcm_is_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(16384_i16).unwrap();
        writer.write_sample(-8192_i16).unwrap();
        writer.finalize().unwrap();

        let (read, _) = read_wav_stereo(&path).unwrap();
        assert_eq!(read.left, vec![0.5, -0.25]);
        assert_eq!(read.right, read.left);
    }
}
