use std::sync::Arc;

use ghwatch::{ApiRateLimiter, Capabilities, GitHubClient, Paginator, ProgressCallback};

use crate::config::Config;
use crate::progress::ProgressReporter;

/// Everything a remote command needs: an authenticated client, the
/// progress sink, and the settings that shape retrieval.
pub(crate) struct Session {
    pub client: GitHubClient,
    pub capabilities: Capabilities,
    /// Configured page size; the paginator clamps it.
    pub page_size: u32,
    reporter: Arc<ProgressReporter>,
    callback: Arc<ProgressCallback>,
}

impl Session {
    pub fn connect(config: &Config, no_rate_limit: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let token = config.github_token().ok_or(
            "No GitHub token configured. Set GHWATCH_GITHUB__TOKEN or GITHUB_TOKEN, \
             or add `token` under [github] in the config file.",
        )?;

        let rate_limiter = config.rate_limit(no_rate_limit).map(ApiRateLimiter::new);
        let reporter = Arc::new(ProgressReporter::new());
        let callback = reporter.as_callback();
        let client = GitHubClient::new(&config.github.api_url, &token, rate_limiter)?
            .with_progress(Arc::clone(&callback));

        Ok(Self {
            client,
            capabilities: config.capabilities(),
            page_size: config.github.page_size,
            reporter,
            callback,
        })
    }

    pub fn on_progress(&self) -> Option<&ProgressCallback> {
        Some(self.callback.as_ref())
    }

    pub fn paginator(&self) -> Paginator<'_> {
        Paginator::new(&self.client)
            .with_page_size(self.page_size)
            .with_progress(self.on_progress())
    }

    /// Clear progress output before results are printed.
    pub fn finish(&self) {
        self.reporter.finish();
    }
}
