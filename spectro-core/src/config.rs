use crate::dsp::binning::{self, EdgePolicy};
use crate::dsp::fft;
use crate::dsp::normalize::PcmSample;
use crate::stream::PcmStream;
use crate::{Result, SpectroError};

/// Default time resolution (number of windows / image columns).
pub const DEFAULT_NUM_CHUNKS: usize = 1400;
/// Default frequency resolution (number of bands / image rows).
pub const DEFAULT_NUM_LEVELS: usize = 800;

/// Tunable parameters of a spectrogram run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectrogramConfig {
    pub num_chunks: usize,
    pub num_levels: usize,
    pub edge_policy: EdgePolicy,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            num_chunks: DEFAULT_NUM_CHUNKS,
            num_levels: DEFAULT_NUM_LEVELS,
            edge_policy: EdgePolicy::default(),
        }
    }
}

/// Window geometry derived from a config and a concrete stream.
///
/// Grid row `r` spans `channels` consecutive windows of the interleaved
/// buffer. Every window in the span is read, but only the last one is
/// binned; earlier windows would be overwritten by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLayout {
    pub num_chunks: usize,
    pub num_levels: usize,
    pub channels: usize,
    /// Raw samples per window: `frames / num_chunks`.
    pub chunk_size: usize,
    /// `chunk_size` rounded up to a power of two; the window is zero-padded to this.
    pub transform_len: usize,
    /// Bins summed on each side of a band center.
    pub level_size: usize,
    /// Samples at the end of the buffer that no row covers.
    pub dropped_samples: usize,
}

impl WindowLayout {
    /// Offset range in the interleaved buffer covered by grid row `row`.
    #[inline]
    pub fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        let span = self.chunk_size * self.channels;
        let start = row * span;
        start..start + span
    }

    /// Offset range of the window that is transformed into grid row `row`.
    #[inline]
    pub fn window_range(&self, row: usize) -> std::ops::Range<usize> {
        let end = self.row_range(row).end;
        end - self.chunk_size..end
    }
}

impl SpectrogramConfig {
    pub fn new(num_chunks: usize, num_levels: usize) -> Self {
        Self {
            num_chunks,
            num_levels,
            ..Default::default()
        }
    }

    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    /// Checks the parts of the config that do not depend on the input.
    pub fn validate(&self) -> Result<()> {
        if self.num_chunks == 0 {
            return Err(SpectroError::InvalidConfig("number of chunks must be positive".into()));
        }
        if self.num_levels == 0 {
            return Err(SpectroError::InvalidConfig("number of levels must be positive".into()));
        }
        if self.num_chunks.checked_mul(self.num_levels).is_none() {
            return Err(SpectroError::InvalidConfig(format!(
                "{} chunks × {} levels overflows the grid size",
                self.num_chunks, self.num_levels
            )));
        }
        Ok(())
    }

    /// Resolves the window geometry for `frames` frames of `channels`
    /// interleaved channels.
    pub fn layout(&self, frames: usize, channels: usize) -> Result<WindowLayout> {
        self.validate()?;
        if channels == 0 {
            return Err(SpectroError::InvalidInput("channel count must be at least 1".into()));
        }
        let buffer_len = frames.checked_mul(channels).ok_or_else(|| {
            SpectroError::InvalidInput(format!("{} frames × {} channels overflows", frames, channels))
        })?;

        let chunk_size = frames / self.num_chunks;
        if chunk_size == 0 {
            return Err(SpectroError::InvalidConfig(format!(
                "{} chunks requested but the stream only has {} frames",
                self.num_chunks, frames
            )));
        }

        let transform_len = fft::transform_len(chunk_size);
        Ok(WindowLayout {
            num_chunks: self.num_chunks,
            num_levels: self.num_levels,
            channels,
            chunk_size,
            transform_len,
            level_size: binning::level_size(transform_len, self.num_levels),
            dropped_samples: buffer_len - self.num_chunks * chunk_size * channels,
        })
    }

    pub fn layout_for<S: PcmSample>(&self, stream: &PcmStream<S>) -> Result<WindowLayout> {
        self.layout(stream.frames(), stream.channels() as usize)
    }
}
