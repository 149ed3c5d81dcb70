//! ghwatch - manage GitHub watch, follow and block state.
//!
//! The library retrieves complete collections (watched repositories,
//! followed users, blocked users, an owner's repositories), narrows and
//! summarizes them, and applies add/delete/block/unblock transitions that
//! only touch the remote side when the target is not already in the
//! requested state.
//!
//! # Example
//!
//! ```ignore
//! use ghwatch::{Action, Executor, GitHubClient, Target, GITHUB_API_URL};
//!
//! let client = GitHubClient::new(GITHUB_API_URL, &token, None)?;
//! let report = Executor::new(&client)
//!     .apply(Action::Unblock, &Target::parse("rust-lang/")?)
//!     .await?;
//! ```

pub mod executor;
pub mod filter;
pub mod github;
pub mod http;
pub mod oracle;
pub mod paginate;
pub mod progress;
pub mod rate_limit;
pub mod retry;
pub mod target;

pub use executor::{
    Action, BatchPolicy, BatchReport, Capabilities, Executor, ItemResult, Outcome,
    TransitionReport,
};
pub use filter::{Checked, OwnerCount, OwnerFilter};
pub use github::{
    GITHUB_API_URL, GitHubClient, GitHubError, Identity, MAX_PAGE_SIZE, Subscription,
};
pub use oracle::{BlockState, FollowState, RepoState, TargetState, UserState};
pub use paginate::{Endpoint, Paginator};
pub use progress::{ProgressCallback, WatchProgress};
pub use rate_limit::ApiRateLimiter;
pub use target::Target;
