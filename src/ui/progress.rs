//! Download progress bar

use std::io::Read;

use indicatif::{ProgressBar, ProgressBarIter, ProgressStyle};

pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// A bar for a download of `total` bytes, or a spinner when the size is
    /// unknown
    pub fn new(total: Option<u64>) -> Self {
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(
                        "[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{spinner} {bytes} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_message("downloading");
        Self { bar }
    }

    /// Wrap `reader` so progress advances as bytes are read
    pub fn wrap<R: Read>(&self, reader: R) -> ProgressBarIter<R> {
        self.bar.wrap_read(reader)
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.bar.abandon_with_message("failed");
    }
}
