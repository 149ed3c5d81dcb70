use ghwatch::{GitHubError, Target, oracle};

use crate::commands::shared::Session;

/// Print `Watched`, `Blocked`, `Not subscribed` or `Followed` for a target.
pub(crate) async fn handle_status(
    session: &Session,
    target: &Target,
) -> Result<(), Box<dyn std::error::Error>> {
    if target.is_user() && !session.capabilities.users {
        return Err(GitHubError::UsersDisabled(target.to_string()).into());
    }

    let state = oracle::state_of(&session.client, target).await?;
    session.finish();
    println!("{}", state.label());
    Ok(())
}
