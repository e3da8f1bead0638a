use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;

const TICK: Duration = Duration::from_millis(80);

static SPINNER_STYLE: Lazy<ProgressStyle> = Lazy::new(|| {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
});

/// Builder for a [`Spinner`].
pub struct SpinnerBuilder {
    message: String,
    hidden: bool,
}

impl SpinnerBuilder {
    /// Draw nothing. Used when output is not a terminal or is machine readable.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn start(self) -> Spinner {
        let bar = if self.hidden {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new_spinner()
        };
        bar.set_style(SPINNER_STYLE.clone());
        bar.set_message(self.message);
        if !self.hidden {
            bar.enable_steady_tick(TICK);
        }
        Spinner { bar }
    }
}

/// An animated single-line status indicator.
///
/// The bar is internally synchronised, so worker threads can run while the
/// animation ticks.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn builder(message: impl Into<String>) -> SpinnerBuilder {
        SpinnerBuilder {
            message: message.into(),
            hidden: false,
        }
    }

    /// Stop and clear the spinner line.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
