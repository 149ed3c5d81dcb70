//! Current state of a single repository or user.
//!
//! Each lookup is one fresh request. Nothing is cached and no working set
//! is consulted, so the answer reflects the remote state at call time.

use std::fmt;

use serde::Serialize;

use crate::github::{GitHubClient, GitHubError, Result, repo, user};
use crate::target::Target;

/// Watch state of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoState {
    /// Not watched.
    Absent,
    /// Watched with notifications on.
    Active,
    /// Watched with notifications ignored.
    Blocked,
}

impl RepoState {
    pub fn label(self) -> &'static str {
        match self {
            RepoState::Absent => "Not subscribed",
            RepoState::Active => "Watched",
            RepoState::Blocked => "Blocked",
        }
    }
}

impl fmt::Display for RepoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowState {
    Absent,
    Followed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockState {
    Absent,
    Blocked,
}

/// Combined state of a user; both axes are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserState {
    pub follow: FollowState,
    pub block: BlockState,
}

impl UserState {
    /// A block takes precedence over a follow.
    pub fn label(self) -> &'static str {
        match (self.block, self.follow) {
            (BlockState::Blocked, _) => "Blocked",
            (BlockState::Absent, FollowState::Followed) => "Followed",
            (BlockState::Absent, FollowState::Absent) => "Not subscribed",
        }
    }
}

/// State of any single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetState {
    Repo { state: RepoState },
    User { state: UserState },
}

impl TargetState {
    pub fn label(self) -> &'static str {
        match self {
            TargetState::Repo { state } => state.label(),
            TargetState::User { state } => state.label(),
        }
    }
}

/// Look up a repository's watch state.
pub async fn repo_state(client: &GitHubClient, owner: &str, name: &str) -> Result<RepoState> {
    let state = match repo::get_subscription(client, owner, name).await? {
        None => RepoState::Absent,
        Some(body) if body.ignored => RepoState::Blocked,
        Some(_) => RepoState::Active,
    };
    tracing::debug!(repo = %format!("{owner}/{name}"), state = state.label(), "checked repository");
    Ok(state)
}

pub async fn follow_state(client: &GitHubClient, login: &str) -> Result<FollowState> {
    let state = if user::is_following(client, login).await? {
        FollowState::Followed
    } else {
        FollowState::Absent
    };
    tracing::debug!(login, ?state, "checked follow");
    Ok(state)
}

pub async fn block_state(client: &GitHubClient, login: &str) -> Result<BlockState> {
    let state = if user::is_blocking(client, login).await? {
        BlockState::Blocked
    } else {
        BlockState::Absent
    };
    tracing::debug!(login, ?state, "checked block");
    Ok(state)
}

/// Look up both relation axes of a user.
pub async fn user_state(client: &GitHubClient, login: &str) -> Result<UserState> {
    Ok(UserState {
        block: block_state(client, login).await?,
        follow: follow_state(client, login).await?,
    })
}

/// Look up the state of a repository or user target.
///
/// Owner-scoped targets have no single state.
pub async fn state_of(client: &GitHubClient, target: &Target) -> Result<TargetState> {
    match target {
        Target::Repo { owner, name } => Ok(TargetState::Repo {
            state: repo_state(client, owner, name).await?,
        }),
        Target::User(login) => Ok(TargetState::User {
            state: user_state(client, login).await?,
        }),
        Target::Owner(_) => Err(GitHubError::InvalidTarget(target.to_string())),
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

    #[tokio::test]
    async fn repo_state_maps_404_and_ignored_flag() {
        let transport = MockTransport::new();
        let url = format!("{API}/repos/a/x/subscription");
        transport.push_response(HttpMethod::Get, &url, fixtures::not_found());
        transport.push_response(HttpMethod::Get, &url, fixtures::subscription(false));
        transport.push_response(HttpMethod::Get, &url, fixtures::subscription(true));

        let client = client(&transport);
        assert_eq!(repo_state(&client, "a", "x").await.unwrap(), RepoState::Absent);
        assert_eq!(repo_state(&client, "a", "x").await.unwrap(), RepoState::Active);
        assert_eq!(repo_state(&client, "a", "x").await.unwrap(), RepoState::Blocked);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn repo_state_surfaces_other_failures() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/repos/a/x/subscription"),
            fixtures::status(502),
        );

        let err = repo_state(&client(&transport), "a", "x").await.unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn user_block_wins_over_follow() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/blocks/eve"),
            fixtures::status(204),
        );
        transport.push_response(
            HttpMethod::Get,
            format!("{API}/user/following/eve"),
            fixtures::status(204),
        );

        let state = state_of(&client(&transport), &Target::User("eve".into()))
            .await
            .unwrap();
        assert_eq!(state.label(), "Blocked");
    }

    #[tokio::test]
    async fn owner_target_has_no_single_state() {
        let transport = MockTransport::new();
        let err = state_of(&client(&transport), &Target::Owner("a".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, GitHubError::InvalidTarget(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(RepoState::Active.to_string(), "Watched");
        assert_eq!(RepoState::Absent.label(), "Not subscribed");
        let followed = UserState {
            follow: FollowState::Followed,
            block: BlockState::Absent,
        };
        assert_eq!(followed.label(), "Followed");
    }
}
