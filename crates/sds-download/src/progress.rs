//! Terminal progress bar for downloads.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use sds_core::ProgressCallback;

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})";

/// A progress bar on stdout driven through a [`ProgressCallback`].
#[derive(Clone)]
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("█▓░"));
        }
        Self { bar }
    }

    /// A callback that moves this bar.
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Box::new(move |downloaded, total| {
            if let Some(total) = total {
                if bar.length() != Some(total) {
                    bar.set_length(total);
                }
            }
            bar.set_position(downloaded);
        })
    }

    pub fn finish(&self, message: &'static str) {
        self.bar.finish_with_message(message);
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}
