//! Per-repository subscription resource.

use super::client::GitHubClient;
use super::error::Result;
use super::types::RepoSubscriptionBody;

fn subscription_route(owner: &str, repo: &str) -> String {
    format!("repos/{}/{}/subscription", owner, repo)
}

/// Fetch the authenticated user's subscription to a repository.
///
/// `GET repos/{owner}/{repo}/subscription` returns 404 when the user does
/// not watch the repository.
pub async fn get_subscription(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
) -> Result<Option<RepoSubscriptionBody>> {
    match client.probe(&subscription_route(owner, repo)).await? {
        Some(response) => Ok(Some(serde_json::from_slice(&response.body)?)),
        None => Ok(None),
    }
}

/// Watch a repository.
pub async fn subscribe(client: &GitHubClient, owner: &str, repo: &str) -> Result<()> {
    let body = serde_json::json!({ "subscribed": true });
    client
        .put(&subscription_route(owner, repo), Some(&body))
        .await?;
    Ok(())
}

/// Silence (`true`) or restore (`false`) notifications for a watched repository.
pub async fn set_ignored(client: &GitHubClient, owner: &str, repo: &str, ignored: bool) -> Result<()> {
    let body = serde_json::json!({ "ignored": ignored });
    client
        .put(&subscription_route(owner, repo), Some(&body))
        .await?;
    Ok(())
}

/// Stop watching a repository.
pub async fn unsubscribe(client: &GitHubClient, owner: &str, repo: &str) -> Result<()> {
    client.delete(&subscription_route(owner, repo)).await?;
    Ok(())
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
    async fn get_subscription_reads_ignored_flag() {
        let transport = MockTransport::new();
        let url = format!("{API}/repos/a/x/subscription");
        transport.push_response(HttpMethod::Get, &url, fixtures::subscription(true));
        transport.push_response(HttpMethod::Get, &url, fixtures::not_found());

        let client = client(&transport);
        let body = get_subscription(&client, "a", "x").await.unwrap().unwrap();
        assert!(body.ignored);
        assert!(get_subscription(&client, "a", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_ignored_puts_flag() {
        let transport = MockTransport::new();
        let url = format!("{API}/repos/a/x/subscription");
        transport.push_response(HttpMethod::Put, &url, fixtures::subscription(false));

        set_ignored(&client(&transport), "a", "x", false).await.unwrap();

        let sent: serde_json::Value =
            serde_json::from_slice(&transport.requests()[0].body).unwrap();
        assert_eq!(sent, serde_json::json!({ "ignored": false }));
    }

    #[tokio::test]
    async fn unsubscribe_failure_propagates() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Delete,
            format!("{API}/repos/a/x/subscription"),
            fixtures::status(500),
        );

        let err = unsubscribe(&client(&transport), "a", "x").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
