//! Listener for observing a spectrogram run.
//!
//! Emits lightweight events as windows complete: enough for progress bars
//! and debugging, without copying buffers.

use crate::config::WindowLayout;

/// Events emitted during [`compute_spectrogram`](crate::compute_spectrogram).
#[derive(Debug)]
pub enum PipelineEvent {
    /// Input validated and window geometry resolved; no window processed yet.
    LayoutResolved(WindowLayout),

    /// Grid row `index` is final. Always emitted in increasing `index` order.
    WindowDone { index: usize, total: usize },

    /// Every row of the grid is populated.
    Finished,
}

/// Trait for observing a run. Implement this for UI, debugging, etc.
pub trait PipelineListener {
    /// Called at each checkpoint. The event describes what just happened.
    fn on_event(&mut self, event: PipelineEvent);
}

/// No-op listener, compiles to nothing when monomorphized.
pub struct NoOpListener;

impl PipelineListener for NoOpListener {
    #[inline(always)]
    fn on_event(&mut self, _event: PipelineEvent) {}
}

/// Debug listener: reports every checkpoint through `log::debug!`.
pub struct DebugListener;

impl PipelineListener for DebugListener {
    fn on_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::LayoutResolved(layout) => {
                log::debug!(
                    "layout: {} rows × {} windows × {} samples (padded to {}), {} levels of {} bins, {} samples dropped",
                    layout.num_chunks,
                    layout.channels,
                    layout.chunk_size,
                    layout.transform_len,
                    layout.num_levels,
                    layout.level_size,
                    layout.dropped_samples,
                );
            }
            PipelineEvent::WindowDone { index, total } => {
                log::debug!("fft iteration: {}/{}", index + 1, total);
            }
            PipelineEvent::Finished => {
                log::debug!("spectrogram complete");
            }
        }
    }
}

/// Collects events in memory for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingListener {
    pub events: Vec<PipelineEvent>,
}

#[cfg(test)]
impl PipelineListener for RecordingListener {
    fn on_event(&mut self, event: PipelineEvent) {
        self.events.push(event);
    }
}
