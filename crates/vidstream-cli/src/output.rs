//! Terminal rendering of the seek bar and status lines

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use vidstream_core::{
    fit_to_display, format_progress, Error, ProgressSample, Resolution, UiSurface,
};

const BAR_TEMPLATE: &str = "{prefix:.bold} [{bar:40.magenta/blue}] {msg}";

/// Seek bar plus time labels, drawn with indicatif
pub struct TerminalSurface {
    bar: ProgressBar,
    display: Resolution,
    duration_ms: u64,
}

impl TerminalSurface {
    pub fn new(display: Resolution) -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        bar.set_prefix("vidstream");

        Self {
            bar,
            display,
            duration_ms: 0,
        }
    }

    /// Print a line above the bar
    pub fn status(&self, line: &str) {
        self.bar.println(format!("{} {}", style("::").cyan(), line));
    }

    pub fn warn(&self, line: &str) {
        self.bar.println(format!("{} {}", style("!!").yellow(), line));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl UiSurface for TerminalSurface {
    fn on_duration_known(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.bar.set_length(duration_ms);
        self.bar.set_position(0);
        self.bar.set_message(format_progress(&ProgressSample {
            elapsed_ms: 0,
            total_ms: duration_ms,
            generation: 0,
        }));
    }

    fn on_progress(&mut self, sample: ProgressSample) {
        if sample.total_ms != self.duration_ms {
            self.duration_ms = sample.total_ms;
            self.bar.set_length(sample.total_ms);
        }
        self.bar.set_position(sample.elapsed_ms);
        self.bar.set_message(format_progress(&sample));
    }

    fn on_playback_ended(&mut self) {
        self.bar.set_position(0);
        self.bar.set_message("");
    }

    fn on_video_size(&mut self, size: Resolution) {
        let surface = fit_to_display(size, self.display);
        self.status(&format!(
            "video {} on {} display -> surface {}",
            size, self.display, surface
        ));
    }

    fn on_error(&mut self, error: &Error) {
        self.bar.println(format!(
            "{} [{}] {}",
            style("error").red().bold(),
            error.error_code(),
            error
        ));
    }
}
