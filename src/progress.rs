//! Progress reporting: a byte-based bar over the input file.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;

const BYTES_TEMPLATE: &str = "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
                              {bytes_per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}";

/// Thin wrapper around an `indicatif` byte bar.
pub struct ProgressScope {
    pb: ProgressBar,
}

impl ProgressScope {
    pub fn bytes<T: Into<String>>(label: T, total_bytes: u64) -> Self {
        let pb = ProgressBar::new(total_bytes);
        if let Ok(style) = ProgressStyle::with_template(BYTES_TEMPLATE) {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        let label = label.into();
        if !label.is_empty() {
            pb.set_message(label);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    /// Bar sized to the file at `path` (0 if it cannot be stat'ed).
    pub fn for_file<T: Into<String>>(label: T, path: &Path) -> Self {
        let total = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        Self::bytes(label, total)
    }

    #[inline]
    pub fn inc_bytes(&self, delta: u64) {
        self.pb.inc(delta);
    }

    pub fn finish<T: Into<String>>(&self, msg: T) {
        self.pb.finish_with_message(msg.into());
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }
}
