//! Retrieve a complete collection by walking its pages.
//!
//! A page with fewer records than the requested page size ends the walk,
//! so a collection whose size is an exact multiple of the page size costs
//! one extra (empty) request. When GitHub sends a `Link` header without a
//! `rel="next"` entry, that page is treated as the last one too.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::github::{GitHubClient, Identity, MAX_PAGE_SIZE, Page, Result, Subscription};
use crate::progress::{ProgressCallback, WatchProgress, emit};

/// A paginated collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Repositories the user watches.
    Subscriptions,
    /// Users the user follows.
    Following,
    /// Users the user blocks.
    Blocks,
    /// Public repositories of an owner; read-only.
    OwnerRepos(String),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Subscriptions => "user/subscriptions".to_string(),
            Endpoint::Following => "user/following".to_string(),
            Endpoint::Blocks => "user/blocks".to_string(),
            Endpoint::OwnerRepos(owner) => format!("users/{}/repos", owner),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Clamp a configured page size into what GitHub accepts.
pub fn clamp_page_size(per_page: u32) -> u32 {
    per_page.clamp(1, MAX_PAGE_SIZE)
}

/// Walks collection endpoints page by page.
pub struct Paginator<'a> {
    client: &'a GitHubClient,
    per_page: u32,
    on_progress: Option<&'a ProgressCallback>,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self {
            client,
            per_page: MAX_PAGE_SIZE,
            on_progress: None,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, per_page: u32) -> Self {
        self.per_page = clamp_page_size(per_page);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, on_progress: Option<&'a ProgressCallback>) -> Self {
        self.on_progress = on_progress;
        self
    }

    /// Fetch every record of `endpoint`, in server order.
    ///
    /// Any failure aborts the walk; records from earlier pages are dropped.
    pub async fn retrieve<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<Vec<T>> {
        let path = endpoint.path();
        let mut items: Vec<T> = Vec::new();
        let mut page = 1u32;

        emit(
            self.on_progress,
            WatchProgress::FetchingPages {
                endpoint: path.clone(),
                per_page: self.per_page,
            },
        );

        loop {
            let fetched: Page<T> = self.client.get_page(&path, page, self.per_page).await?;
            let count = fetched.items.len();
            items.extend(fetched.items);

            tracing::debug!(endpoint = %path, page, count, total = items.len(), "fetched page");
            emit(
                self.on_progress,
                WatchProgress::FetchedPage {
                    endpoint: path.clone(),
                    page,
                    count,
                    total_so_far: items.len(),
                },
            );

            let short_page = count < self.per_page as usize;
            let link_says_last = fetched.link.as_ref().is_some_and(|link| !link.has_next());
            if short_page || link_says_last {
                break;
            }
            page += 1;
        }

        emit(
            self.on_progress,
            WatchProgress::FetchComplete {
                endpoint: path,
                total: items.len(),
            },
        );

        Ok(items)
    }

    pub async fn subscriptions(&self) -> Result<Vec<Subscription>> {
        self.retrieve(&Endpoint::Subscriptions).await
    }

    pub async fn following(&self) -> Result<Vec<Identity>> {
        self.retrieve(&Endpoint::Following).await
    }

    pub async fn blocks(&self) -> Result<Vec<Identity>> {
        self.retrieve(&Endpoint::Blocks).await
    }

    pub async fn owner_repos(&self, owner: &str) -> Result<Vec<Subscription>> {
        self.retrieve(&Endpoint::OwnerRepos(owner.to_string())).await
    }
}
