use clap::ValueEnum;
use ghwatch::filter::{self, OwnerCount, OwnerFilter};
use ghwatch::github::user::authenticated_login;
use ghwatch::{GitHubError, Identity, Subscription};
use tabled::Tabled;

use crate::commands::shared::Session;

/// Output format for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One name per line; summaries as a table (default)
    #[default]
    Text,
    /// JSON array
    Json,
}

/// What `list` shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
    /// Every watched repository.
    All,
    /// Watched repositories of one owner.
    Owner(String),
    /// Watched repositories owned by the authenticated user.
    Own,
    /// Watched repositories owned by anyone else.
    Foreign,
    Followed,
    Blocked,
    /// Watched repositories counted per owner.
    Summary,
}

#[derive(Debug, Clone, serde::Serialize, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Repositories")]
    count: usize,
}

impl From<OwnerCount> for SummaryRow {
    fn from(c: OwnerCount) -> Self {
        Self {
            owner: c.owner,
            count: c.count,
        }
    }
}

/// Largest groups first, ties by owner name.
fn sort_summary(rows: &mut [SummaryRow]) {
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.owner.cmp(&b.owner)));
}

/// Count every owner, then keep the `limit` largest.
fn summary_rows(subscriptions: &[Subscription], limit: Option<usize>) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = filter::summarize(subscriptions, None)
        .into_iter()
        .map(SummaryRow::from)
        .collect();
    sort_summary(&mut rows);
    filter::limited(rows, limit)
}

fn print_names(names: &[String], output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Text => {
            for name in names {
                println!("{}", name);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(names)?),
    }
    Ok(())
}

fn print_summary(rows: Vec<SummaryRow>, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Text => {
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

fn logins(users: Vec<Identity>, limit: Option<usize>) -> Vec<String> {
    filter::limited(users, limit)
        .into_iter()
        .map(|u| u.login)
        .collect()
}

pub(crate) async fn handle_list(
    session: &Session,
    selection: Selection,
    limit: Option<usize>,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let paginator = session.paginator();

    let names = match selection {
        Selection::Followed | Selection::Blocked if !session.capabilities.users => {
            return Err(GitHubError::UsersDisabled("list --followed/--blocked".to_string()).into());
        }
        Selection::Followed => logins(paginator.following().await?, limit),
        Selection::Blocked => logins(paginator.blocks().await?, limit),
        Selection::Summary => {
            let subscriptions = paginator.subscriptions().await?;
            let rows = summary_rows(&subscriptions, limit);
            session.finish();
            return print_summary(rows, output);
        }
        selection => {
            let owner_filter = match selection {
                Selection::Owner(owner) => OwnerFilter::Include(owner),
                Selection::Own => OwnerFilter::Include(authenticated_login(&session.client).await?),
                Selection::Foreign => {
                    OwnerFilter::Exclude(authenticated_login(&session.client).await?)
                }
                _ => OwnerFilter::All,
            };
            let subscriptions = paginator.subscriptions().await?;
            filter::filter_by_owner(&subscriptions, &owner_filter, limit)
                .into_iter()
                .map(|s| s.full_name.clone())
                .collect()
        }
    };

    session.finish();
    print_names(&names, output)
}
