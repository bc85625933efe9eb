//! PCM-to-spectrogram pipeline.
//!
//! A decoded, interleaved integer PCM buffer is cut into contiguous windows.
//! Each window is normalized, transformed with a radix-2 FFT, and its
//! positive-frequency half binned into a fixed number of bands. The resulting
//! magnitude grid can then be mapped to colors for an image writer.

pub mod color;
pub mod config;
pub mod dsp;
pub mod error;
pub mod grid;
pub mod listener;
pub mod pipeline;
pub mod stream;

pub use color::{ColorGrid, ColorMap, HeatPalette, Rgb};
pub use config::{SpectrogramConfig, WindowLayout, DEFAULT_NUM_CHUNKS, DEFAULT_NUM_LEVELS};
pub use dsp::binning::EdgePolicy;
pub use dsp::normalize::{PcmSample, SampleStats};
pub use error::{Result, SpectroError};
pub use grid::MagnitudeGrid;
pub use pipeline::{compute_spectrogram, Diagnostics, Spectrogram};
pub use stream::PcmStream;
