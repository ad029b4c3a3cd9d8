//! Lightweight progress reporting for ingestion runs.
//!
//! Use `NoopProgress` for the server and `IndicatifProgress` for the CLI.

use indicatif::{ProgressBar, ProgressStyle};

/// Minimal progress interface used by the ingestion service.
pub trait Progress: Send + Sync {
    /// Set known total steps.
    fn set_total(&self, _n: u64) {}
    /// Advance by one step and show a short message.
    fn step(&self, _msg: &str) {}
    /// Replace current message without advancing.
    fn message(&self, _msg: &str) {}
    /// Finish the UI.
    fn finish(&self, _msg: &str) {}
}

/// No-op reporter for servers/headless runs.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Indicatif bar, one tick per document.
pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    /// Bar with an unknown length; call [`Progress::set_total`] once known.
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}/{len:3} {msg}")
        {
            pb.set_style(style);
        }
        Self { pb }
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for IndicatifProgress {
    fn set_total(&self, n: u64) {
        self.pb.set_length(n);
    }
    fn step(&self, msg: &str) {
        self.pb.inc(1);
        self.pb.set_message(msg.to_string());
    }
    fn message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }
    fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}
