//! GitHub API access for watch, follow and block state.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Records decoded from collection endpoints
//! - `client` - Authenticated requests, pagination headers, rate-limit retry
//! - [`repo`] - The per-repository subscription resource
//! - [`user`] - Follow and block relations

mod client;
pub mod error;
pub mod repo;
pub mod types;
pub mod user;

pub use client::{
    GITHUB_API_URL, GITHUB_API_VERSION, GitHubClient, LinkPagination, MAX_PAGE_SIZE, Page,
    parse_link_header,
};
pub use error::{GitHubError, Result, is_rate_limit_error, short_error_message};
pub use types::{Identity, Subscription};
