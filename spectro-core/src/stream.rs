use crate::dsp::normalize::PcmSample;
use crate::{Result, SpectroError};

/// A fully decoded, channel-interleaved PCM stream.
///
/// This is the hand-off point from a decoder: the pipeline only reads it.
#[derive(Debug, Clone)]
pub struct PcmStream<S: PcmSample = i32> {
    samples: Vec<S>,
    channels: u16,
    frames: usize,
    sample_rate: u32,
}

impl<S: PcmSample> PcmStream<S> {
    /// Wraps `samples`, which must hold exactly `frames * channels` values.
    pub fn new(samples: Vec<S>, channels: u16, frames: usize, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(SpectroError::InvalidInput("channel count must be at least 1".into()));
        }
        if frames == 0 {
            return Err(SpectroError::InvalidInput("stream contains no frames".into()));
        }
        let expected = frames.checked_mul(channels as usize).ok_or_else(|| {
            SpectroError::InvalidInput(format!("{} frames × {} channels overflows", frames, channels))
        })?;
        if samples.len() != expected {
            return Err(SpectroError::InvalidInput(format!(
                "expected {} samples ({} frames × {} channels), got {}",
                expected,
                frames,
                channels,
                samples.len()
            )));
        }
        Ok(Self {
            samples,
            channels,
            frames,
            sample_rate,
        })
    }

    /// Builds a stream from interleaved samples, deriving the frame count.
    pub fn from_interleaved(samples: Vec<S>, channels: u16, sample_rate: u32) -> Result<Self> {
        let frames = samples.len() / (channels.max(1) as usize);
        Self::new(samples, channels, frames, sample_rate)
    }

    #[inline]
    pub fn samples(&self) -> &[S] {
        &self.samples
    }

    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }
}
