//! Terminal progress reporting.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Count-style progress bar (items processed out of total), with a label.
///
/// Returns a hidden bar when `visible` is false.
#[must_use]
pub fn make_count_progress(total: u64, label: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    match ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] elapsed: {elapsed_precise}",
    ) {
        Ok(style) => pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  ")),
        Err(e) => tracing::debug!("Invalid progress template: {}", e),
    }
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
