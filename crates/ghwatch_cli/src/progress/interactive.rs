use std::sync::Mutex;
use std::time::Duration;

use ghwatch::WatchProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

#[derive(Default)]
struct ProgressState {
    /// Spinner for the collection currently being fetched.
    fetch_bar: Option<ProgressBar>,
    /// Bar for the owner-scoped batch in progress.
    batch_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
///
/// Bars draw to stderr so that stdout carries only command output.
pub struct InteractiveReporter {
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ProgressState::default()),
        }
    }

    pub fn handle(&self, event: WatchProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            WatchProgress::FetchingPages { endpoint, .. } => {
                let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
                pb.set_style(Self::spinner_style());
                pb.set_prefix(endpoint);
                pb.set_message("Fetching...");
                pb.enable_steady_tick(Duration::from_millis(100));
                state.fetch_bar = Some(pb);
            }

            WatchProgress::FetchedPage {
                page, total_so_far, ..
            } => {
                if let Some(ref pb) = state.fetch_bar {
                    pb.set_message(format!("Page {} ({} records)", page, total_so_far));
                }
            }

            WatchProgress::FetchComplete { .. } => {
                if let Some(pb) = state.fetch_bar.take() {
                    pb.finish_and_clear();
                }
            }

            WatchProgress::BatchStarted {
                action,
                owner,
                count,
            } => {
                let pb = ProgressBar::with_draw_target(Some(count as u64), ProgressDrawTarget::stderr());
                pb.set_style(Self::bar_style());
                pb.set_prefix(format!("{} {}", action, owner));
                state.batch_bar = Some(pb);
            }

            WatchProgress::Applied { target, .. }
            | WatchProgress::Skipped { target, .. }
            | WatchProgress::Failed { target, .. } => {
                if let Some(ref pb) = state.batch_bar {
                    pb.inc(1);
                    pb.set_message(target);
                }
            }

            WatchProgress::BatchComplete { .. } => {
                if let Some(pb) = state.batch_bar.take() {
                    pb.finish_and_clear();
                }
            }

            WatchProgress::RateLimitBackoff { retry_after_ms, .. } => {
                let bar = state.batch_bar.as_ref().or(state.fetch_bar.as_ref());
                if let Some(pb) = bar {
                    pb.set_message(format!("rate limited, retrying in {}ms", retry_after_ms));
                }
            }

            _ => {}
        }
    }

    /// Clear all bars.
    pub fn finish(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = state.fetch_bar.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = state.batch_bar.take() {
            pb.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
