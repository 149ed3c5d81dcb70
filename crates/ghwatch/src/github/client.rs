//! GitHub API client over the [`HttpTransport`] boundary.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use super::error::{GitHubError, Result, is_rate_limit_error, short_error_message};
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpTransport, header_get};
use crate::progress::ProgressCallback;
use crate::rate_limit::ApiRateLimiter;
use crate::retry::with_retry;

/// Public GitHub REST API root.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// REST API version pinned in every request.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Largest page size GitHub accepts for `per_page`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination information extracted from GitHub's Link header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// URL of the following page, from the rel="next" link.
    pub next_url: Option<String>,
}

impl LinkPagination {
    /// Whether the server advertised a following page.
    ///
    /// Only the presence of rel="next" counts; the URL may use a cursor
    /// instead of a `page` parameter.
    pub fn has_next(&self) -> bool {
        self.next_url.is_some()
    }
}

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/user/subscriptions?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel)
            && rel_type.split_whitespace().any(|r| r == "next")
        {
            info.next_url = Some(url.to_string());
        }
    }

    info
}

/// One page of a collection endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Records on this page, in server order.
    pub items: Vec<T>,
    /// Link header pagination, if the server sent one.
    pub link: Option<LinkPagination>,
}

/// GitHub API client.
///
/// Every request goes through the configured transport, waits for the
/// optional rate limiter first, and is retried with backoff when GitHub
/// answers with a rate-limit response.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    token: String,
    rate_limiter: Option<ApiRateLimiter>,
    on_progress: Option<Arc<ProgressCallback>>,
}

impl GitHubClient {
    /// Create a client backed by reqwest with a 30 second timeout.
    ///
    /// ```ignore
    /// let client = GitHubClient::new(GITHUB_API_URL, &token, None)?;
    /// ```
    pub fn new(
        api_url: &str,
        token: &str,
        rate_limiter: Option<ApiRateLimiter>,
    ) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| GitHubError::Http(e.to_string()))?;

        Ok(Self::new_with_transport(
            api_url,
            token,
            rate_limiter,
            Arc::new(transport),
        ))
    }

    pub fn new_with_transport(
        api_url: &str,
        token: &str,
        rate_limiter: Option<ApiRateLimiter>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            rate_limiter,
            on_progress: None,
        }
    }

    /// Report rate-limit backoff through `on_progress`.
    #[must_use]
    pub fn with_progress(mut self, on_progress: Arc<ProgressCallback>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Get the API root URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn default_headers(&self) -> HttpHeaders {
        vec![
            (
                "Accept".to_string(),
                "application/vnd.github+json".to_string(),
            ),
            ("User-Agent".to_string(), "ghwatch".to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.token),
            ),
            (
                "X-GitHub-Api-Version".to_string(),
                GITHUB_API_VERSION.to_string(),
            ),
        ]
    }

    /// Wait for rate limiter if one is configured.
    async fn wait_for_rate_limit(&self) {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }
    }

    /// Map a rate-limited response to an error.
    ///
    /// GitHub signals primary rate limits with 403 plus
    /// `x-ratelimit-remaining: 0`, and secondary limits with 429.
    fn rate_limit_error(response: &HttpResponse) -> Option<GitHubError> {
        let exhausted = response.status == 403
            && header_get(&response.headers, "x-ratelimit-remaining") == Some("0");
        if response.status != 429 && !exhausted {
            return None;
        }

        let reset_at = header_get(&response.headers, "x-ratelimit-reset")
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::minutes(1));
        Some(GitHubError::RateLimited { reset_at })
    }

    async fn send_once(&self, method: HttpMethod, url: &str, body: &[u8]) -> Result<HttpResponse> {
        self.wait_for_rate_limit().await;

        let mut headers = self.default_headers();
        if !body.is_empty() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body.to_vec(),
        };

        tracing::debug!(method = method.as_str(), url, "GitHub request");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| GitHubError::Http(e.to_string()))?;

        match Self::rate_limit_error(&response) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }

    /// Send a request, retrying rate-limited responses.
    ///
    /// Any other status is returned as-is for the caller to interpret.
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpResponse> {
        let url = self.url(path);
        let body = match body {
            Some(value) => serde_json::to_vec(value)?,
            None => Vec::new(),
        };

        with_retry(
            || self.send_once(method, &url, &body),
            is_rate_limit_error,
            short_error_message,
            path,
            self.on_progress.as_deref(),
        )
        .await
    }

    /// Turn a non-success response into an error.
    fn check_status(response: HttpResponse) -> Result<HttpResponse> {
        match response.status {
            _ if response.is_success() => Ok(response),
            401 => Err(GitHubError::AuthRequired),
            status => Err(GitHubError::api(status, response.body_text())),
        }
    }

    /// Make an authenticated GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = Self::check_status(self.send(HttpMethod::Get, path, None).await?)?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Fetch one page of a collection endpoint.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<T>> {
        let route = format!("{}?per_page={}&page={}", path, per_page, page);
        let response = Self::check_status(self.send(HttpMethod::Get, &route, None).await?)?;

        let link = response.header("link").map(parse_link_header);
        let items: Vec<T> = serde_json::from_slice(&response.body)?;
        Ok(Page { items, link })
    }

    /// GET a resource whose absence is meaningful.
    ///
    /// Returns `None` for 404, the response for any success status, and an
    /// error for everything else.
    pub async fn probe(&self, path: &str) -> Result<Option<HttpResponse>> {
        let response = self.send(HttpMethod::Get, path, None).await?;
        if response.status == 404 {
            return Ok(None);
        }
        Self::check_status(response).map(Some)
    }

    /// Make an authenticated PUT request.
    pub async fn put(&self, path: &str, body: Option<&serde_json::Value>) -> Result<u16> {
        let response = Self::check_status(self.send(HttpMethod::Put, path, body).await?)?;
        Ok(response.status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete(&self, path: &str) -> Result<u16> {
        let response = Self::check_status(self.send(HttpMethod::Delete, path, None).await?)?;
        Ok(response.status)
    }
}
