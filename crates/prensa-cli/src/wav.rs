//! WAV file reading and writing.
//!
//! Samples are kept planar (one `Vec<f32>` per channel) because that is what
//! the kernel's `process` wants; interleaving only happens at the file
//! boundary.

use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Error type for WAV I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file has no audio channels.
    #[error("WAV file has no channels")]
    NoChannels,
}

/// Convenience result type for WAV I/O.
pub type Result<T> = std::result::Result<T, Error>;

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file into planar f32 channels plus the spec.
///
/// Integer formats are normalized to -1.0..=1.0.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(Error::NoChannels);
    }

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            // Widen before shifting: 1i32 << 31 would overflow to i32::MIN
            // for 32-bit PCM and flip the signal's polarity.
            let bits = spec.bits_per_sample;
            let max_val = (1u64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (ch, &sample) in frame.iter().enumerate() {
            planar[ch].push(sample);
        }
    }

    Ok((planar, spec))
}

/// Write planar f32 channels to a WAV file.
///
/// All channels must have equal length; the spec's channel count is taken
/// from the data.
pub fn write_wav<P: AsRef<Path>>(path: P, channels: &[Vec<f32>], spec: WavSpec) -> Result<()> {
    if channels.is_empty() {
        return Err(Error::NoChannels);
    }
    let mut out_spec = spec;
    out_spec.channels = channels.len() as u16;

    let hound_spec = hound::WavSpec::from(out_spec);
    let mut writer = WavWriter::create(path, hound_spec)?;
    let frames = channels[0].len();

    if out_spec.bits_per_sample == 32 {
        for i in 0..frames {
            for channel in channels {
                writer.write_sample(channel[i])?;
            }
        }
    } else {
        let max_val = (1i32 << (out_spec.bits_per_sample - 1)) as f32;
        for i in 0..frames {
            for channel in channels {
                let int_sample = (channel[i] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn roundtrip_f32_mono() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        };

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[samples.clone()], spec).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec.sample_rate, 48000);
        assert_eq!(loaded.len(), 1);
        for (a, b) in samples.iter().zip(&loaded[0]) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn roundtrip_i16_stereo() {
        let left: Vec<f32> = (0..500).map(|i| (i as f32 / 500.0).sin() * 0.9).collect();
        let right: Vec<f32> = (0..500).map(|i| (i as f32 / 500.0).cos() * 0.9).collect();
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
        };

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[left.clone(), right.clone()], spec).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec.channels, 2);
        assert_eq!(loaded.len(), 2);
        // 16-bit has less precision
        for (a, b) in left.iter().zip(&loaded[0]) {
            assert!((a - b).abs() < 0.001);
        }
        for (a, b) in right.iter().zip(&loaded[1]) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn int32_pcm_keeps_polarity() {
        // 32-bit integer PCM normalizes by 2^31; a positive sample must
        // stay positive after decoding.
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Int,
        };

        let file = NamedTempFile::new().unwrap();
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        writer.write_sample(i32::MAX / 2).unwrap();
        writer.write_sample(i32::MIN / 2).unwrap();
        writer.finalize().unwrap();

        let (loaded, _) = read_wav(file.path()).unwrap();
        assert!((loaded[0][0] - 0.5).abs() < 1e-6, "got {}", loaded[0][0]);
        assert!((loaded[0][1] + 0.5).abs() < 1e-6, "got {}", loaded[0][1]);
    }

    #[test]
    fn empty_channel_list_is_an_error() {
        let file = NamedTempFile::new().unwrap();
        assert!(write_wav(file.path(), &[], WavSpec::default()).is_err());
    }
}
