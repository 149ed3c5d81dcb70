//! Idempotent add/delete/block/unblock transitions.
//!
//! Every transition first asks the oracle for the current state and only
//! sends a mutation when the target is not already where the action would
//! put it. Guard skips are ordinary [`Outcome`]s, never errors.
//!
//! Repository states: `absent -> active <-> blocked`, and back to `absent`
//! on delete. Users have two independent axes, follow and block.

use std::fmt;

use serde::Serialize;

use crate::filter::{self, Checked, OwnerFilter};
use crate::github::{GitHubClient, GitHubError, Result, Subscription, repo, user};
use crate::oracle::{self, BlockState, FollowState, RepoState};
use crate::paginate::Paginator;
use crate::progress::{ProgressCallback, WatchProgress, emit};
use crate::target::Target;

/// A requested transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Delete,
    Block,
    Unblock,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Delete => "delete",
            Action::Block => "block",
            Action::Unblock => "unblock",
        }
    }

    /// Verb used in summaries.
    pub fn past_tense(self) -> &'static str {
        match self {
            Action::Add => "Added",
            Action::Delete => "Deleted",
            Action::Block => "Blocked",
            Action::Unblock => "Unblocked",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one transition on one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The mutation was sent.
    Applied(Action),
    AlreadySubscribed,
    /// Adding a blocked target must go through unblock.
    BlockedUnblockFirst,
    NotSubscribed,
    AlreadyBlocked,
    NotBlocked,
    AlreadyFollowed,
    NotFollowed,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn message(self) -> &'static str {
        match self {
            Outcome::Applied(action) => action.past_tense(),
            Outcome::AlreadySubscribed => "already subscribed",
            Outcome::BlockedUnblockFirst => "blocked, unblock first",
            Outcome::NotSubscribed => "not subscribed",
            Outcome::AlreadyBlocked => "already blocked",
            Outcome::NotBlocked => "not blocked",
            Outcome::AlreadyFollowed => "already followed",
            Outcome::NotFollowed => "not followed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Which target kinds this deployment manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Follow and block users, not only repositories.
    pub users: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { users: true }
    }
}

/// How an owner-scoped batch reacts to a remote failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop at the first failure and return it as the error.
    #[default]
    FailFast,
    /// Record the failure and move on to the next item.
    BestEffort,
}

/// A remote call that changes repository state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoMutation {
    Subscribe,
    SetIgnored(bool),
    Unsubscribe,
}

/// What to do with a repository in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Call(RepoMutation),
    Skip(Outcome),
}

/// Decide the transition for a repository from its current state.
pub fn plan_repo(action: Action, state: RepoState) -> Decision {
    use Decision::{Call, Skip};

    match (action, state) {
        (Action::Add, RepoState::Absent) => Call(RepoMutation::Subscribe),
        (Action::Add, RepoState::Active) => Skip(Outcome::AlreadySubscribed),
        (Action::Add, RepoState::Blocked) => Skip(Outcome::BlockedUnblockFirst),

        (Action::Delete, RepoState::Absent) => Skip(Outcome::NotSubscribed),
        (Action::Delete, _) => Call(RepoMutation::Unsubscribe),

        (Action::Block, RepoState::Active) => Call(RepoMutation::SetIgnored(true)),
        (Action::Block, RepoState::Blocked) => Skip(Outcome::AlreadyBlocked),
        (Action::Block, RepoState::Absent) => Skip(Outcome::NotSubscribed),

        (Action::Unblock, RepoState::Blocked) => Call(RepoMutation::SetIgnored(false)),
        (Action::Unblock, RepoState::Active) => Skip(Outcome::NotBlocked),
        (Action::Unblock, RepoState::Absent) => Skip(Outcome::NotSubscribed),
    }
}

/// Per-target entry of a batch.
#[derive(Debug)]
pub struct ItemResult {
    pub target: String,
    pub result: std::result::Result<Outcome, GitHubError>,
}

/// Everything that happened during one owner-scoped batch.
#[derive(Debug)]
pub struct BatchReport {
    pub action: Action,
    pub owner: String,
    pub items: Vec<ItemResult>,
}

impl BatchReport {
    fn new(action: Action, owner: &str) -> Self {
        Self {
            action,
            owner: owner.to_string(),
            items: Vec::new(),
        }
    }

    pub fn applied(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.result, Ok(o) if o.is_applied()))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.result, Ok(o) if !o.is_applied()))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_err()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// e.g. `Unblocked 3 repositories owned by rust-lang`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} repositories owned by {}",
            self.action.past_tense(),
            self.applied(),
            self.owner
        )
    }
}

/// Result of [`Executor::apply`].
#[derive(Debug)]
pub enum TransitionReport {
    Single { target: String, outcome: Outcome },
    Batch(BatchReport),
}

impl TransitionReport {
    pub fn has_failures(&self) -> bool {
        match self {
            TransitionReport::Single { .. } => false,
            TransitionReport::Batch(report) => report.has_failures(),
        }
    }
}

/// Applies transitions against one GitHub account.
pub struct Executor<'a> {
    client: &'a GitHubClient,
    capabilities: Capabilities,
    policy: BatchPolicy,
    page_size: u32,
    on_progress: Option<&'a ProgressCallback>,
}

impl<'a> Executor<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self {
            client,
            capabilities: Capabilities::default(),
            policy: BatchPolicy::default(),
            page_size: crate::github::MAX_PAGE_SIZE,
            on_progress: None,
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, on_progress: Option<&'a ProgressCallback>) -> Self {
        self.on_progress = on_progress;
        self
    }

    /// Apply `action` to a repository, user or owner-scoped batch.
    pub async fn apply(&self, action: Action, target: &Target) -> Result<TransitionReport> {
        match target {
            Target::Repo { owner, name } => Ok(TransitionReport::Single {
                target: target.to_string(),
                outcome: self.apply_repo(action, owner, name).await?,
            }),
            Target::User(login) => Ok(TransitionReport::Single {
                target: target.to_string(),
                outcome: self.apply_user(action, login).await?,
            }),
            Target::Owner(owner) => Ok(TransitionReport::Batch(
                self.apply_owner(action, owner).await?,
            )),
        }
    }

    /// Apply `action` to a single repository.
    pub async fn apply_repo(&self, action: Action, owner: &str, name: &str) -> Result<Outcome> {
        let state = oracle::repo_state(self.client, owner, name).await?;
        let full_name = format!("{}/{}", owner, name);
        emit(
            self.on_progress,
            WatchProgress::StateChecked {
                target: full_name.clone(),
                state: state.label().to_string(),
            },
        );
        self.transition_repo(action, &full_name, owner, name, state)
            .await
    }

    async fn transition_repo(
        &self,
        action: Action,
        full_name: &str,
        owner: &str,
        name: &str,
        state: RepoState,
    ) -> Result<Outcome> {
        match plan_repo(action, state) {
            Decision::Skip(outcome) => Ok(self.skipped(full_name, outcome)),
            Decision::Call(mutation) => {
                let sent = match mutation {
                    RepoMutation::Subscribe => repo::subscribe(self.client, owner, name).await,
                    RepoMutation::SetIgnored(flag) => {
                        repo::set_ignored(self.client, owner, name, flag).await
                    }
                    RepoMutation::Unsubscribe => {
                        repo::unsubscribe(self.client, owner, name).await
                    }
                };
                self.finish(full_name, action, sent)
            }
        }
    }

    /// Apply `action` to a user's follow or block relation.
    pub async fn apply_user(&self, action: Action, login: &str) -> Result<Outcome> {
        if !self.capabilities.users {
            return Err(GitHubError::UsersDisabled(login.to_string()));
        }

        let decision = match action {
            Action::Add => {
                if self.block_state(login).await? == BlockState::Blocked {
                    Err(Outcome::BlockedUnblockFirst)
                } else if self.follow_state(login).await? == FollowState::Followed {
                    Err(Outcome::AlreadyFollowed)
                } else {
                    Ok(user::follow(self.client, login).await)
                }
            }
            Action::Delete => match self.follow_state(login).await? {
                FollowState::Followed => Ok(user::unfollow(self.client, login).await),
                FollowState::Absent => Err(Outcome::NotFollowed),
            },
            Action::Block => match self.block_state(login).await? {
                BlockState::Absent => Ok(user::block(self.client, login).await),
                BlockState::Blocked => Err(Outcome::AlreadyBlocked),
            },
            Action::Unblock => match self.block_state(login).await? {
                BlockState::Blocked => Ok(user::unblock(self.client, login).await),
                BlockState::Absent => Err(Outcome::NotBlocked),
            },
        };

        match decision {
            Ok(sent) => self.finish(login, action, sent),
            Err(skip) => Ok(self.skipped(login, skip)),
        }
    }

    async fn follow_state(&self, login: &str) -> Result<FollowState> {
        let state = oracle::follow_state(self.client, login).await?;
        let label = match state {
            FollowState::Followed => "Followed",
            FollowState::Absent => "Not followed",
        };
        self.checked(login, label);
        Ok(state)
    }

    async fn block_state(&self, login: &str) -> Result<BlockState> {
        let state = oracle::block_state(self.client, login).await?;
        let label = match state {
            BlockState::Blocked => "Blocked",
            BlockState::Absent => "Not blocked",
        };
        self.checked(login, label);
        Ok(state)
    }

    fn checked(&self, target: &str, label: &str) {
        emit(
            self.on_progress,
            WatchProgress::StateChecked {
                target: target.to_string(),
                state: label.to_string(),
            },
        );
    }

    fn skipped(&self, target: &str, outcome: Outcome) -> Outcome {
        tracing::debug!(item = target, reason = outcome.message(), "skipped");
        emit(
            self.on_progress,
            WatchProgress::Skipped {
                target: target.to_string(),
                outcome,
            },
        );
        outcome
    }

    fn finish(&self, target: &str, action: Action, sent: Result<()>) -> Result<Outcome> {
        match sent {
            Ok(()) => {
                tracing::info!(item = target, action = action.as_str(), "applied");
                emit(
                    self.on_progress,
                    WatchProgress::Applied {
                        target: target.to_string(),
                        action,
                    },
                );
                Ok(Outcome::Applied(action))
            }
            Err(err) => {
                emit(
                    self.on_progress,
                    WatchProgress::Failed {
                        target: target.to_string(),
                        error: err.to_string(),
                    },
                );
                Err(err)
            }
        }
    }

    /// Gather the candidates of an owner-scoped batch with their states.
    ///
    /// Add starts from the owner's repositories and keeps the unwatched
    /// ones; the other actions start from the user's subscriptions under
    /// that owner.
    async fn batch_candidates(
        &self,
        action: Action,
        owner: &str,
    ) -> Result<Vec<Checked<Subscription>>> {
        let paginator = Paginator::new(self.client)
            .with_page_size(self.page_size)
            .with_progress(self.on_progress);

        if action == Action::Add {
            let repos = paginator.owner_repos(owner).await?;
            return filter::unsubscribed_only(self.client, repos, None, self.on_progress).await;
        }

        let subscriptions = paginator.subscriptions().await?;
        let owned: Vec<Subscription> = filter::filter_by_owner(
            &subscriptions,
            &OwnerFilter::Include(owner.to_string()),
            None,
        )
        .into_iter()
        .cloned()
        .collect();

        match action {
            Action::Unblock => {
                filter::blocked_only(self.client, owned, None, self.on_progress).await
            }
            _ => filter::with_state(self.client, owned, self.on_progress).await,
        }
    }

    /// Apply `action` to every matching repository of `owner`, in order.
    ///
    /// The state found while filtering is reused, so each item costs one
    /// lookup. Under [`BatchPolicy::FailFast`] the first remote failure is
    /// returned as the error and earlier mutations stay in place.
    pub async fn apply_owner(&self, action: Action, owner: &str) -> Result<BatchReport> {
        let candidates = self.batch_candidates(action, owner).await?;
        let mut report = BatchReport::new(action, owner);

        emit(
            self.on_progress,
            WatchProgress::BatchStarted {
                action,
                owner: owner.to_string(),
                count: candidates.len(),
            },
        );

        for Checked { record, state } in candidates {
            let result = self
                .transition_repo(action, &record.full_name, record.owner(), record.name(), state)
                .await;

            match result {
                Err(err) if self.policy == BatchPolicy::FailFast => {
                    tracing::warn!(item = %record, error = %err, "batch stopped");
                    return Err(err);
                }
                result => report.items.push(ItemResult {
                    target: record.full_name,
                    result,
                }),
            }
        }

        emit(
            self.on_progress,
            WatchProgress::BatchComplete {
                action,
                owner: owner.to_string(),
                applied: report.applied(),
                skipped: report.skipped(),
                failed: report.failed(),
            },
        );
        tracing::info!("{}", report.summary());

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, MockTransport, fixtures};
    use std::sync::Arc;

    const API: &str = "https://api.test";

    fn client(transport: &MockTransport) -> GitHubClient {
        GitHubClient::new_with_transport(API, "t", None, Arc::new(transport.clone()))
    }

    fn sub_url(full_name: &str) -> String {
        format!("{API}/repos/{full_name}/subscription")
    }

    #[test]
    fn plan_covers_guard_skips() {
        assert_eq!(
            plan_repo(Action::Add, RepoState::Absent),
            Decision::Call(RepoMutation::Subscribe)
        );
        assert_eq!(
            plan_repo(Action::Delete, RepoState::Blocked),
            Decision::Call(RepoMutation::Unsubscribe)
        );
        assert_eq!(
            plan_repo(Action::Block, RepoState::Absent),
            Decision::Skip(Outcome::NotSubscribed)
        );
        assert_eq!(
            plan_repo(Action::Unblock, RepoState::Active),
            Decision::Skip(Outcome::NotBlocked)
        );
        assert_eq!(
            plan_repo(Action::Unblock, RepoState::Blocked),
            Decision::Call(RepoMutation::SetIgnored(false))
        );
    }

    #[tokio::test]
    async fn add_on_active_sends_nothing() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Get, sub_url("a/x"), fixtures::subscription(false));

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_repo(Action::Add, "a", "x")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::AlreadySubscribed);
        assert_eq!(outcome.to_string(), "already subscribed");
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn add_on_blocked_asks_for_unblock() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Get, sub_url("a/x"), fixtures::subscription(true));

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_repo(Action::Add, "a", "x")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::BlockedUnblockFirst);
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn block_active_repo_sets_ignored() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Get, sub_url("a/x"), fixtures::subscription(false));
        transport.push_response(HttpMethod::Put, sub_url("a/x"), fixtures::subscription(true));

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_repo(Action::Block, "a", "x")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Applied(Action::Block));
        let put = &transport.mutations()[0];
        let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
        assert_eq!(body, serde_json::json!({ "ignored": true }));
    }

    #[tokio::test]
    async fn owner_unblock_touches_only_blocked_repos() {
        let transport = MockTransport::new();
        let names = ["a/r1", "a/r2", "a/r3", "a/r4", "a/r5"];
        let mut listing = names.to_vec();
        listing.push("b/other");
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/subscriptions?per_page=100&page=1"),
            fixtures::repos(&listing),
        );
        for (i, name) in names.iter().enumerate() {
            let blocked = i < 3;
            transport.push_response(HttpMethod::Get, sub_url(name), fixtures::subscription(blocked));
            if blocked {
                transport.push_response(HttpMethod::Put, sub_url(name), fixtures::subscription(false));
            }
        }

        let client = client(&transport);
        let report = Executor::new(&client)
            .apply_owner(Action::Unblock, "a")
            .await
            .unwrap();

        assert_eq!(report.applied(), 3);
        assert_eq!(report.summary(), "Unblocked 3 repositories owned by a");
        let puts = transport.mutations();
        assert_eq!(puts.len(), 3);
        assert!(puts.iter().all(|r| r.method == HttpMethod::Put));
        // one subscriptions page plus one lookup per owned repository
        assert_eq!(transport.requests().len(), 1 + 5 + 3);
    }

    #[tokio::test]
    async fn owner_add_subscribes_unwatched_repos() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/users/a/repos?per_page=100&page=1"),
            fixtures::repos(&["a/x", "a/y"]),
        );
        transport.push_response(HttpMethod::Get, sub_url("a/x"), fixtures::not_found());
        transport.push_response(HttpMethod::Get, sub_url("a/y"), fixtures::subscription(false));
        transport.push_response(HttpMethod::Put, sub_url("a/x"), fixtures::subscription(false));

        let client = client(&transport);
        let report = Executor::new(&client)
            .apply(Action::Add, &Target::Owner("a".into()))
            .await
            .unwrap();

        match report {
            TransitionReport::Batch(report) => {
                assert_eq!(report.applied(), 1);
                assert_eq!(report.items.len(), 1);
            }
            other => panic!("expected batch report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fail_fast_stops_at_first_failure() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/subscriptions?per_page=100&page=1"),
            fixtures::repos(&["a/x", "a/y"]),
        );
        for name in ["a/x", "a/y"] {
            transport.push_response(HttpMethod::Get, sub_url(name), fixtures::subscription(false));
        }
        transport.push_response(HttpMethod::Delete, sub_url("a/x"), fixtures::status(500));
        transport.push_response(HttpMethod::Delete, sub_url("a/y"), fixtures::status(204));

        let client = client(&transport);
        let err = Executor::new(&client)
            .apply_owner(Action::Delete, "a")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(transport.mutations().len(), 1);
    }

    #[tokio::test]
    async fn best_effort_records_failure_and_continues() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/subscriptions?per_page=100&page=1"),
            fixtures::repos(&["a/x", "a/y"]),
        );
        for name in ["a/x", "a/y"] {
            transport.push_response(HttpMethod::Get, sub_url(name), fixtures::subscription(false));
        }
        transport.push_response(HttpMethod::Delete, sub_url("a/x"), fixtures::status(500));
        transport.push_response(HttpMethod::Delete, sub_url("a/y"), fixtures::status(204));

        let client = client(&transport);
        let report = Executor::new(&client)
            .with_policy(BatchPolicy::BestEffort)
            .apply_owner(Action::Delete, "a")
            .await
            .unwrap();

        assert_eq!(report.applied(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());
        assert_eq!(report.summary(), "Deleted 1 repositories owned by a");
    }

    #[tokio::test]
    async fn user_add_checks_block_before_follow() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/blocks/eve"),
            fixtures::status(204),
        );

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_user(Action::Add, "eve")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::BlockedUnblockFirst);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn user_follow_when_unrelated() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Get, format!("{API}/user/blocks/bob"), fixtures::not_found());
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/following/bob"),
            fixtures::not_found(),
        );
        transport.push_response(
            HttpMethod::Put,
            format!("{API}/user/following/bob"),
            fixtures::status(204),
        );

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_user(Action::Add, "bob")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Applied(Action::Add));
        assert_eq!(transport.mutations().len(), 1);
    }

    #[tokio::test]
    async fn delete_on_absent_repo_sends_nothing() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Get, sub_url("a/x"), fixtures::not_found());

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_repo(Action::Delete, "a", "x")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NotSubscribed);
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn user_add_on_followed_user_is_skipped() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Get, format!("{API}/user/blocks/bob"), fixtures::not_found());
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/following/bob"),
            fixtures::status(204),
        );

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_user(Action::Add, "bob")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::AlreadyFollowed);
        assert_eq!(outcome.to_string(), "already followed");
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn user_delete_on_unfollowed_user_is_skipped() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/following/bob"),
            fixtures::not_found(),
        );

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_user(Action::Delete, "bob")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NotFollowed);
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn user_block_on_blocked_user_is_skipped() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Get, format!("{API}/user/blocks/eve"), fixtures::status(204));

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_user(Action::Block, "eve")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::AlreadyBlocked);
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn user_unblock_on_unblocked_user_is_skipped() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Get, format!("{API}/user/blocks/eve"), fixtures::not_found());

        let client = client(&transport);
        let outcome = Executor::new(&client)
            .apply_user(Action::Unblock, "eve")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NotBlocked);
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn users_capability_off_rejects_user_targets() {
        let transport = MockTransport::new();
        let client = client(&transport);
        let err = Executor::new(&client)
            .with_capabilities(Capabilities { users: false })
            .apply(Action::Block, &Target::User("bob".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, GitHubError::UsersDisabled(_)));
        assert!(transport.requests().is_empty());
    }
}
