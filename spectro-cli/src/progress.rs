use indicatif::{ProgressBar, ProgressStyle};
use spectro_core::listener::{PipelineEvent, PipelineListener};

/// CLI progress bar with one step per analysis window.
///
/// The bar starts empty; its length is set once the pipeline has resolved
/// the window layout.
pub struct CliListener {
    pb: ProgressBar,
}

impl CliListener {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} Analyzing [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Self { pb }
    }
}

impl Default for CliListener {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineListener for CliListener {
    fn on_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::LayoutResolved(layout) => {
                self.pb.set_length(layout.num_chunks as u64);
            }
            PipelineEvent::WindowDone { .. } => {
                self.pb.inc(1);
            }
            PipelineEvent::Finished => {
                self.pb.finish_and_clear();
            }
        }
    }
}
