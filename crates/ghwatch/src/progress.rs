//! Progress events emitted while retrieving collections and applying
//! transitions.
//!
//! The library never prints. Callers that want feedback pass a
//! [`ProgressCallback`]; the CLI forwards events to `tracing`.

use crate::executor::{Action, Outcome};

/// Progress events emitted by the paginator and the transition executor.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum WatchProgress {
    /// Starting to page through a collection endpoint.
    FetchingPages {
        /// Human-readable endpoint label (e.g. `user/subscriptions`).
        endpoint: String,
        /// Requested page size.
        per_page: u32,
    },

    /// Fetched one page of a collection.
    FetchedPage {
        endpoint: String,
        /// Page number (1-indexed).
        page: u32,
        /// Number of records on this page.
        count: usize,
        /// Running total of records fetched so far.
        total_so_far: usize,
    },

    /// Finished fetching a collection.
    FetchComplete { endpoint: String, total: usize },

    /// Looked up the current state of a single target.
    StateChecked {
        target: String,
        /// Display label of the state (e.g. `Watched`).
        state: String,
    },

    /// A mutation was sent for a target.
    Applied { target: String, action: Action },

    /// A target was left alone because it is already in (or cannot reach)
    /// the requested state.
    Skipped { target: String, outcome: Outcome },

    /// A remote call failed for a target.
    Failed { target: String, error: String },

    /// Starting an owner-scoped batch.
    BatchStarted {
        action: Action,
        owner: String,
        /// Number of candidate targets after filtering.
        count: usize,
    },

    /// Owner-scoped batch finished (or stopped early under fail-fast).
    BatchComplete {
        action: Action,
        owner: String,
        applied: usize,
        skipped: usize,
        failed: usize,
    },

    /// Backing off after a rate-limited response.
    RateLimitBackoff {
        target: String,
        retry_after_ms: u64,
        attempt: u32,
    },
}

/// Callback for progress updates.
pub type ProgressCallback = Box<dyn Fn(WatchProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: WatchProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_with_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(
            Some(&callback),
            WatchProgress::FetchComplete {
                endpoint: "user/subscriptions".to_string(),
                total: 3,
            },
        );
        emit(
            Some(&callback),
            WatchProgress::Failed {
                target: "a/x".to_string(),
                error: "HTTP 500".to_string(),
            },
        );

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_emit_without_callback() {
        emit(
            None,
            WatchProgress::FetchComplete {
                endpoint: "user/blocks".to_string(),
                total: 0,
            },
        );
    }
}
