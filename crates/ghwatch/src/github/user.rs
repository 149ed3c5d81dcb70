//! Follow and block relations of the authenticated user.

use super::client::GitHubClient;
use super::error::Result;
use super::types::AuthenticatedUser;

/// Login of the user the token belongs to.
pub async fn authenticated_login(client: &GitHubClient) -> Result<String> {
    let user: AuthenticatedUser = client.get_json("user").await?;
    Ok(user.login)
}

/// `GET user/following/{login}`: 204 if followed, 404 if not.
pub async fn is_following(client: &GitHubClient, login: &str) -> Result<bool> {
    Ok(client
        .probe(&format!("user/following/{}", login))
        .await?
        .is_some())
}

pub async fn follow(client: &GitHubClient, login: &str) -> Result<()> {
    client.put(&format!("user/following/{}", login), None).await?;
    Ok(())
}

pub async fn unfollow(client: &GitHubClient, login: &str) -> Result<()> {
    client.delete(&format!("user/following/{}", login)).await?;
    Ok(())
}

/// `GET user/blocks/{login}`: 204 if blocked, 404 if not.
pub async fn is_blocking(client: &GitHubClient, login: &str) -> Result<bool> {
    Ok(client
        .probe(&format!("user/blocks/{}", login))
        .await?
        .is_some())
}

pub async fn block(client: &GitHubClient, login: &str) -> Result<()> {
    client.put(&format!("user/blocks/{}", login), None).await?;
    Ok(())
}

pub async fn unblock(client: &GitHubClient, login: &str) -> Result<()> {
    client.delete(&format!("user/blocks/{}", login)).await?;
    Ok(())
}
