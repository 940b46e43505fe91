//! WAV encoding for captured samples.

use std::path::Path;

use tracing::{debug, instrument};
use voice_memo_core::{BackendError, CaptureConfig};

/// Layout of the interleaved samples coming off the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    /// Device sample rate in Hz.
    pub sample_rate: u32,
    /// Device channel count.
    pub channels: u16,
}

impl SampleLayout {
    /// Milliseconds of audio held in `sample_count` interleaved samples.
    pub fn duration_ms(&self, sample_count: usize) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        let frames = (sample_count / self.channels as usize) as u64;
        frames * 1000 / u64::from(self.sample_rate)
    }
}

/// Write `samples` to `path` with the channel count and bit depth of
/// `target`, at the device sample rate.
///
/// Downmixing averages each frame; upmixing repeats source channels.
///
/// # Errors
///
/// Fails on empty input, an unsupported bit depth, or any I/O error.
#[instrument(skip(samples), fields(sample_count = samples.len()))]
pub fn encode_wav(
    path: &Path,
    samples: &[f32],
    source: SampleLayout,
    target: &CaptureConfig,
) -> Result<(), BackendError> {
    if samples.is_empty() {
        return Err(BackendError::new("Cannot encode empty samples"));
    }
    if source.channels == 0 || target.channels == 0 {
        return Err(BackendError::new("Channel count must be non-zero"));
    }

    let sample_format = match target.bits_per_sample {
        16 => hound::SampleFormat::Int,
        32 => hound::SampleFormat::Float,
        other => {
            return Err(BackendError::new(format!(
                "Unsupported bit depth: {}",
                other
            )));
        }
    };

    let spec = hound::WavSpec {
        channels: target.channels,
        sample_rate: source.sample_rate,
        bits_per_sample: target.bits_per_sample,
        sample_format,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(hound_error)?;

    for frame in samples.chunks_exact(source.channels as usize) {
        for channel in 0..target.channels as usize {
            let value = if target.channels == source.channels {
                frame[channel]
            } else if target.channels == 1 {
                frame.iter().sum::<f32>() / frame.len() as f32
            } else {
                frame[channel % frame.len()]
            };
            let value = if value.is_finite() {
                value.clamp(-1.0, 1.0)
            } else {
                0.0
            };

            match sample_format {
                hound::SampleFormat::Int => writer
                    .write_sample((value * f32::from(i16::MAX)) as i16)
                    .map_err(hound_error)?,
                hound::SampleFormat::Float => writer.write_sample(value).map_err(hound_error)?,
            }
        }
    }

    writer.finalize().map_err(hound_error)?;

    debug!(path = ?path, "WAV written");

    Ok(())
}

fn hound_error(e: hound::Error) -> BackendError {
    BackendError::new(format!("WAV encoding failed: {}", e))
}
