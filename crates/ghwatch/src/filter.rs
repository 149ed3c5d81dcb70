//! Narrowing and summarizing working sets.

use std::collections::HashMap;

use serde::Serialize;

use crate::github::{GitHubClient, Result, Subscription};
use crate::oracle::{self, RepoState};
use crate::progress::{ProgressCallback, WatchProgress, emit};

/// Owner-based selection over a set of repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
    /// Keep repositories owned by this login.
    Include(String),
    /// Drop repositories owned by this login.
    Exclude(String),
    /// Keep everything.
    All,
}

impl OwnerFilter {
    pub fn matches(&self, record: &Subscription) -> bool {
        match self {
            OwnerFilter::Include(owner) => record.owner() == owner,
            OwnerFilter::Exclude(owner) => record.owner() != owner,
            OwnerFilter::All => true,
        }
    }
}

/// A record paired with the state the oracle reported for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checked<T> {
    pub record: T,
    pub state: RepoState,
}

/// Number of watched repositories under one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerCount {
    pub owner: String,
    pub count: usize,
}

/// Result cap; `None` and `Some(0)` mean no cap.
fn cap(limit: Option<usize>) -> usize {
    match limit {
        None | Some(0) => usize::MAX,
        Some(n) => n,
    }
}

/// Truncate any list to the limit convention.
pub fn limited<T>(items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    items.into_iter().take(cap(limit)).collect()
}

/// Keep records matching `filter`, in input order, stopping at `limit`.
pub fn filter_by_owner<'a>(
    records: &'a [Subscription],
    filter: &OwnerFilter,
    limit: Option<usize>,
) -> Vec<&'a Subscription> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .take(cap(limit))
        .collect()
}

/// Count repositories per owner.
///
/// Every record lands in exactly one group, so the counts add up to the
/// input length when no limit applies. Order is unspecified; callers sort
/// if they need to.
pub fn summarize(records: &[Subscription], limit: Option<usize>) -> Vec<OwnerCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let owner = record
            .full_name
            .rsplit_once('/')
            .map_or(record.full_name.as_str(), |(owner, _)| owner);
        *counts.entry(owner).or_default() += 1;
    }

    counts
        .into_iter()
        .take(cap(limit))
        .map(|(owner, count)| OwnerCount {
            owner: owner.to_string(),
            count,
        })
        .collect()
}

/// Ask the oracle about each record, keeping those whose state passes `keep`.
async fn select_by_state<F>(
    client: &GitHubClient,
    records: Vec<Subscription>,
    limit: Option<usize>,
    on_progress: Option<&ProgressCallback>,
    keep: F,
) -> Result<Vec<Checked<Subscription>>>
where
    F: Fn(RepoState) -> bool,
{
    let max = cap(limit);
    let mut selected = Vec::new();

    for record in records {
        if selected.len() >= max {
            break;
        }
        let state = oracle::repo_state(client, record.owner(), record.name()).await?;
        emit(
            on_progress,
            WatchProgress::StateChecked {
                target: record.full_name.clone(),
                state: state.label().to_string(),
            },
        );
        if keep(state) {
            selected.push(Checked { record, state });
        }
    }

    Ok(selected)
}

/// Repositories the user does not watch yet.
pub async fn unsubscribed_only(
    client: &GitHubClient,
    records: Vec<Subscription>,
    limit: Option<usize>,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<Checked<Subscription>>> {
    select_by_state(client, records, limit, on_progress, |s| s == RepoState::Absent).await
}

/// Watched repositories whose notifications are ignored.
pub async fn blocked_only(
    client: &GitHubClient,
    records: Vec<Subscription>,
    limit: Option<usize>,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<Checked<Subscription>>> {
    select_by_state(client, records, limit, on_progress, |s| s == RepoState::Blocked).await
}

/// Pair every record with its current state.
pub async fn with_state(
    client: &GitHubClient,
    records: Vec<Subscription>,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<Checked<Subscription>>> {
    select_by_state(client, records, None, on_progress, |_| true).await
}
