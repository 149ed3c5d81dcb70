use ghwatch::WatchProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: WatchProgress) {
        match event {
            WatchProgress::FetchingPages { endpoint, per_page } => {
                tracing::info!(endpoint = %endpoint, per_page, "Fetching collection");
            }

            WatchProgress::FetchedPage {
                endpoint,
                page,
                count,
                total_so_far,
            } => {
                tracing::debug!(endpoint = %endpoint, page, count, total_so_far, "Fetched page");
            }

            WatchProgress::FetchComplete { endpoint, total } => {
                tracing::info!(endpoint = %endpoint, total, "Fetch complete");
            }

            WatchProgress::StateChecked { target, state } => {
                tracing::debug!(target_name = %target, state = %state, "Checked state");
            }

            WatchProgress::Applied { target, action } => {
                tracing::info!(target_name = %target, action = %action, "Applied");
            }

            WatchProgress::Skipped { target, outcome } => {
                tracing::info!(target_name = %target, reason = %outcome, "Skipped");
            }

            WatchProgress::Failed { target, error } => {
                tracing::warn!(target_name = %target, error = %error, "Failed");
            }

            WatchProgress::BatchStarted {
                action,
                owner,
                count,
            } => {
                tracing::info!(action = %action, owner = %owner, count, "Starting batch");
            }

            WatchProgress::BatchComplete {
                action,
                owner,
                applied,
                skipped,
                failed,
            } => {
                tracing::info!(action = %action, owner = %owner, applied, skipped, failed, "Batch complete");
            }

            WatchProgress::RateLimitBackoff {
                target,
                retry_after_ms,
                attempt,
            } => {
                tracing::warn!(
                    target_name = %target,
                    retry_after_ms,
                    attempt,
                    "Rate limited, backing off"
                );
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghwatch::{Action, Outcome};

    #[test]
    fn handles_every_event_kind() {
        let reporter = LoggingReporter::default();
        reporter.handle(WatchProgress::FetchingPages {
            endpoint: "user/blocks".into(),
            per_page: 100,
        });
        reporter.handle(WatchProgress::Applied {
            target: "a/x".into(),
            action: Action::Add,
        });
        reporter.handle(WatchProgress::Skipped {
            target: "a/y".into(),
            outcome: Outcome::AlreadySubscribed,
        });
        reporter.handle(WatchProgress::RateLimitBackoff {
            target: "user/subscriptions".into(),
            retry_after_ms: 1000,
            attempt: 1,
        });
    }
}
