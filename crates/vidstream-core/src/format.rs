//! Time label formatting

use crate::ProgressSample;

/// Format a millisecond duration as `H:MM:SS`.
///
/// Sub-second remainders are truncated; hours are not capped.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// Format a sample as `elapsed / total`
pub fn format_progress(sample: &ProgressSample) -> String {
    format!(
        "{} / {}",
        format_duration(sample.elapsed_ms),
        format_duration(sample.total_ms)
    )
}
