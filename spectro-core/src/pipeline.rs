use num_complex::Complex64;

use crate::color::{ColorGrid, ColorMap};
use crate::config::{SpectrogramConfig, WindowLayout};
use crate::dsp::binning::{self, EdgePolicy};
use crate::dsp::fft;
use crate::dsp::normalize::{PcmSample, SampleStats};
use crate::grid::MagnitudeGrid;
use crate::listener::{PipelineEvent, PipelineListener};
use crate::stream::PcmStream;
use crate::Result;

/// Result of a spectrogram run.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// `num_chunks × num_levels` band magnitudes.
    pub grid: MagnitudeGrid,
    pub diagnostics: Diagnostics,
}

impl Spectrogram {
    pub fn render(&self, map: &impl ColorMap) -> ColorGrid {
        ColorGrid::render(&self.grid, map)
    }
}

/// Side information about a run. None of it feeds back into the grid.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    pub layout: WindowLayout,
    /// Extremes over every sample that went into a window.
    pub samples: SampleStats,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Diagnostics {
    /// Width of one transform bin in Hz.
    ///
    /// Windows walk the interleaved buffer, which carries
    /// `sample_rate * channels` values per second.
    pub fn bin_hz(&self) -> f64 {
        let rate = self.sample_rate as f64 * self.channels.max(1) as f64;
        rate / self.layout.transform_len as f64
    }

    /// Spacing between adjacent band centers in Hz.
    pub fn band_hz(&self) -> f64 {
        self.bin_hz() * self.layout.level_size as f64
    }
}

/// Turns a decoded PCM stream into a band-magnitude grid.
///
/// 1. Resolve the window layout; bad configs fail here before any work.
/// 2. Row `i` spans `channels` windows of `chunk_size` interleaved samples
///    starting at `i * chunk_size * channels`, so the grid covers the whole
///    track whatever the channel count.
/// 3. The last window of the span is normalized, zero-padded to a power of
///    two, transformed and binned into row `i`. The other windows only feed
///    the sample stats.
///
/// With the `parallel` feature windows run on rayon in batches of disjoint
/// rows; events still arrive in window order and the grid is identical to a
/// sequential run.
pub fn compute_spectrogram<S: PcmSample>(
    stream: &PcmStream<S>,
    config: &SpectrogramConfig,
    listener: &mut impl PipelineListener,
) -> Result<Spectrogram> {
    let layout = config.layout_for(stream)?;
    log::debug!(
        "{} frames × {} ch -> {} rows of {} windows × {} samples",
        stream.frames(),
        stream.channels(),
        layout.num_chunks,
        layout.channels,
        layout.chunk_size
    );
    listener.on_event(PipelineEvent::LayoutResolved(layout));

    let mut grid = MagnitudeGrid::zeros(layout.num_chunks, layout.num_levels);
    let samples = stream.samples();
    let batch_windows = windows_per_batch(layout.num_chunks);
    let mut stats = SampleStats::default();

    for (batch_index, batch) in grid
        .as_mut_slice()
        .chunks_mut(batch_windows * layout.num_levels)
        .enumerate()
    {
        let first = batch_index * batch_windows;
        let batch_stats = analyze_batch(samples, &layout, config.edge_policy, first, batch)?;
        stats = stats.merge(batch_stats);

        let rows = batch.len() / layout.num_levels;
        for index in first..first + rows {
            log::trace!("window {}/{} binned", index + 1, layout.num_chunks);
            listener.on_event(PipelineEvent::WindowDone {
                index,
                total: layout.num_chunks,
            });
        }
    }

    listener.on_event(PipelineEvent::Finished);

    Ok(Spectrogram {
        grid,
        diagnostics: Diagnostics {
            layout,
            samples: stats,
            sample_rate: stream.sample_rate(),
            channels: stream.channels(),
        },
    })
}

#[cfg(feature = "parallel")]
fn windows_per_batch(num_chunks: usize) -> usize {
    (rayon::current_num_threads() * 4).clamp(1, num_chunks)
}

#[cfg(not(feature = "parallel"))]
fn windows_per_batch(_num_chunks: usize) -> usize {
    1
}

#[cfg(feature = "parallel")]
fn analyze_batch<S: PcmSample>(
    samples: &[S],
    layout: &WindowLayout,
    policy: EdgePolicy,
    first: usize,
    batch: &mut [u64],
) -> Result<SampleStats> {
    use rayon::prelude::*;

    batch
        .par_chunks_mut(layout.num_levels)
        .enumerate()
        .map(|(offset, row)| {
            let span = &samples[layout.row_range(first + offset)];
            analyze_row(span, layout, policy, row)
        })
        .try_reduce(SampleStats::default, |a, b| Ok(a.merge(b)))
}

#[cfg(not(feature = "parallel"))]
fn analyze_batch<S: PcmSample>(
    samples: &[S],
    layout: &WindowLayout,
    policy: EdgePolicy,
    first: usize,
    batch: &mut [u64],
) -> Result<SampleStats> {
    batch
        .chunks_mut(layout.num_levels)
        .enumerate()
        .try_fold(SampleStats::default(), |acc, (offset, row)| {
            let span = &samples[layout.row_range(first + offset)];
            Ok(acc.merge(analyze_row(span, layout, policy, row)?))
        })
}

/// Normalize, pad, transform and bin the last window of `span` into `row`.
fn analyze_row<S: PcmSample>(
    span: &[S],
    layout: &WindowLayout,
    policy: EdgePolicy,
    row: &mut [u64],
) -> Result<SampleStats> {
    let mut stats = SampleStats::default();

    let (earlier, window) = span.split_at(span.len() - layout.chunk_size);
    for &sample in earlier {
        stats.observe(sample);
    }

    let mut buffer: Vec<Complex64> = Vec::with_capacity(layout.transform_len);
    buffer.extend(
        window
            .iter()
            .map(|&sample| Complex64::new(stats.observe(sample), 0.0)),
    );
    buffer.resize(layout.transform_len, Complex64::new(0.0, 0.0));

    fft::forward(&mut buffer)?;
    binning::bin_into(&buffer, layout.level_size, policy, row);

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{NoOpListener, RecordingListener};
    use crate::SpectroError;

    #[test]
    fn silence_gives_zero_grid() {
        let stream = PcmStream::new(vec![0i32; 1000], 1, 1000, 44100).unwrap();
        let config = SpectrogramConfig::new(7, 5);
        let result = compute_spectrogram(&stream, &config, &mut NoOpListener).unwrap();

        assert_eq!(result.grid.num_chunks(), 7);
        assert_eq!(result.grid.num_levels(), 5);
        assert!(result.grid.as_slice().iter().all(|&m| m == 0));
        assert_eq!(result.diagnostics.samples.max_raw, 0);
        assert_eq!(result.diagnostics.samples.min_raw, 0);
    }

    #[test]
    fn one_sample_windows_do_not_crash() {
        // chunk_size == 1: every transform is the identity.
        let samples = vec![i32::MAX, 0, i32::MAX / 2, -i32::MAX];
        let stream = PcmStream::new(samples, 1, 4, 8000).unwrap();
        let config = SpectrogramConfig::new(4, 3);
        let result = compute_spectrogram(&stream, &config, &mut NoOpListener).unwrap();

        assert_eq!(result.diagnostics.layout.chunk_size, 1);
        // One bin per window, counted twice by every band under Wrap.
        assert_eq!(result.grid.row(0), &[2, 2, 2]);
        assert_eq!(result.grid.row(1), &[0, 0, 0]);
        assert_eq!(result.grid.row(2), &[1, 1, 1]);
        assert_eq!(result.grid.row(3), &[2, 2, 2]);
    }

    #[test]
    fn too_many_chunks_is_rejected_before_work() {
        let stream = PcmStream::new(vec![1i16; 10], 1, 10, 8000).unwrap();
        let config = SpectrogramConfig::new(11, 4);
        let mut listener = RecordingListener::default();
        let err = compute_spectrogram(&stream, &config, &mut listener).unwrap_err();

        assert!(matches!(err, SpectroError::InvalidConfig(_)), "{err}");
        assert!(listener.events.is_empty(), "no events expected on rejection");
    }

    #[test]
    fn events_arrive_in_window_order() {
        let stream = PcmStream::new(vec![3i32; 4096], 1, 4096, 44100).unwrap();
        let config = SpectrogramConfig::new(64, 8);
        let mut listener = RecordingListener::default();
        compute_spectrogram(&stream, &config, &mut listener).unwrap();

        assert!(matches!(listener.events.first(), Some(PipelineEvent::LayoutResolved(_))));
        assert!(matches!(listener.events.last(), Some(PipelineEvent::Finished)));

        let done: Vec<usize> = listener
            .events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::WindowDone { index, total } => {
                    assert_eq!(*total, 64);
                    Some(*index)
                }
                _ => None,
            })
            .collect();
        assert_eq!(done, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn remainder_is_not_read() {
        // 10 frames, 3 chunks -> 3 samples per window; the loud last sample is dropped.
        let mut samples = vec![0i32; 10];
        samples[9] = i32::MAX;
        let stream = PcmStream::new(samples, 1, 10, 8000).unwrap();
        let result =
            compute_spectrogram(&stream, &SpectrogramConfig::new(3, 2), &mut NoOpListener).unwrap();

        assert_eq!(result.diagnostics.layout.dropped_samples, 1);
        assert_eq!(result.diagnostics.samples.max_raw, 0);
        assert_eq!(result.diagnostics.samples.count, 9);
        assert!(result.grid.as_slice().iter().all(|&m| m == 0));
    }

    #[test]
    fn stereo_rows_cover_the_whole_track() {
        // First half silent, second half a loud constant on both channels.
        let frames = 8192;
        let mut samples = vec![0i32; frames * 2];
        samples[frames..].fill(i32::MAX / 2);
        let stream = PcmStream::new(samples, 2, frames, 44100).unwrap();
        let result =
            compute_spectrogram(&stream, &SpectrogramConfig::new(4, 4), &mut NoOpListener)
                .unwrap();

        assert_eq!(result.diagnostics.layout.dropped_samples, 0);
        assert_eq!(result.diagnostics.samples.count, frames * 2);
        assert_eq!(result.grid.row(0), &[0, 0, 0, 0]);
        assert_eq!(result.grid.row(1), &[0, 0, 0, 0]);
        // DC of 2048 samples at 0.5, counted twice by band 0
        assert_eq!(result.grid.row(2), &[2048, 0, 0, 0]);
        assert_eq!(result.grid.row(3), &[2048, 0, 0, 0]);
    }

    #[test]
    fn rows_bin_the_last_window_of_their_span() {
        // 2 ch × 4 frames, 2 rows: each row spans two 2-sample windows.
        let samples = vec![i32::MAX, i32::MAX, 0, 0, 0, 0, i32::MAX, i32::MAX];
        let stream = PcmStream::new(samples, 2, 4, 8000).unwrap();
        let result =
            compute_spectrogram(&stream, &SpectrogramConfig::new(2, 2), &mut NoOpListener)
                .unwrap();

        assert_eq!(result.grid.row(0), &[0, 0]);
        assert_eq!(result.grid.row(1), &[4, 0]);
        // The overwritten window still shows up in the stats.
        assert_eq!(result.diagnostics.samples.max_raw, i32::MAX as i64);
        assert_eq!(result.diagnostics.samples.count, 8);
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let stream = PcmStream::new(vec![1i32; 64], 1, 64, 8000).unwrap();
        let config = SpectrogramConfig::new(4, usize::MAX / 2 + 1);
        let mut listener = RecordingListener::default();
        let err = compute_spectrogram(&stream, &config, &mut listener).unwrap_err();
        assert!(matches!(err, SpectroError::InvalidConfig(_)), "{err}");
        assert!(listener.events.is_empty());
    }

    #[test]
    fn diagnostics_report_frequency_resolution() {
        let stream = PcmStream::new(vec![0i32; 8192], 1, 8192, 44100).unwrap();
        let result =
            compute_spectrogram(&stream, &SpectrogramConfig::new(4, 16), &mut NoOpListener)
                .unwrap();
        let d = result.diagnostics;
        assert!((d.bin_hz() - 44100.0 / 2048.0).abs() < 1e-9);
        assert!((d.band_hz() - 32.0 * 44100.0 / 2048.0).abs() < 1e-9);
    }
}
