//! ghwatch CLI - manage watched repositories, follows and blocks on GitHub.

mod commands;
mod config;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgGroup, Parser, Subcommand};
use console::Term;
use ghwatch::{Action, Target};
use tracing_subscriber::EnvFilter;

use crate::commands::list::{OutputFormat, Selection};
use crate::commands::shared::Session;

#[derive(Parser)]
#[command(name = "ghwatch")]
#[command(version)]
#[command(about = "Manage watched repositories, followed users and blocked users on GitHub")]
#[command(
    long_about = "ghwatch lists and changes the repositories you watch and the users you \
follow or block on GitHub. Transitions are idempotent: a target that is already in the \
requested state is reported and left alone."
)]
#[command(after_long_help = r#"EXAMPLES
    List watched repositories of one owner:
        $ ghwatch list rust-lang

    Count watched repositories per owner:
        $ ghwatch list --summary

    Watch every repository of an owner you are not watching yet:
        $ ghwatch add rust-lang/

    Silence notifications for one repository:
        $ ghwatch block rust-lang/rust

    Unblock every silenced repository of an owner, continuing past failures:
        $ ghwatch unblock --owner rust-lang --best-effort

    Follow a user:
        $ ghwatch add octocat

CONFIGURATION
    ghwatch reads configuration from:
      1. ~/.config/ghwatch/config.toml (or $XDG_CONFIG_HOME/ghwatch/config.toml)
      2. ./ghwatch.toml
      3. Environment variables (GHWATCH_* prefix, e.g., GHWATCH_GITHUB__TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GHWATCH_GITHUB__TOKEN       GitHub personal access token
    GITHUB_TOKEN                Used when no token is configured
    GHWATCH_GITHUB__API_URL     API root (default: https://api.github.com)
    GHWATCH_FEATURES__USERS     Set to false to manage repositories only
    RUST_LOG                    Log filter when output is not a terminal
"#)]
struct Cli {
    /// Disable proactive rate limiting
    #[arg(short = 'R', long, global = true)]
    no_rate_limit: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List watched repositories, followed users or blocked users
    List(ListArgs),
    /// Show the state of a repository (owner/repo) or user (login)
    Status {
        /// owner/repo or a user login
        target: String,
    },
    /// Watch a repository or follow a user
    Add(TransitionArgs),
    /// Stop watching a repository or unfollow a user
    Delete(TransitionArgs),
    /// Ignore a watched repository's notifications or block a user
    Block(TransitionArgs),
    /// Restore a repository's notifications or unblock a user
    Unblock(TransitionArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
#[command(group(ArgGroup::new("selection").multiple(false)))]
struct ListArgs {
    /// Only repositories owned by this login
    #[arg(group = "selection")]
    owner: Option<String>,

    /// Only repositories you own
    #[arg(long, group = "selection")]
    own: bool,

    /// Only repositories owned by others
    #[arg(long, group = "selection")]
    foreign: bool,

    /// Users you follow
    #[arg(long, group = "selection")]
    followed: bool,

    /// Users you block
    #[arg(long, group = "selection")]
    blocked: bool,

    /// Count watched repositories per owner
    #[arg(long, group = "selection")]
    summary: bool,

    /// Show at most this many entries (0 = no limit)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

impl ListArgs {
    fn selection(self) -> Selection {
        if let Some(owner) = self.owner {
            Selection::Owner(owner)
        } else if self.own {
            Selection::Own
        } else if self.foreign {
            Selection::Foreign
        } else if self.followed {
            Selection::Followed
        } else if self.blocked {
            Selection::Blocked
        } else if self.summary {
            Selection::Summary
        } else {
            Selection::All
        }
    }
}

#[derive(Debug, clap::Args)]
struct TransitionArgs {
    /// owner/repo, owner/ (every repository of owner) or a user login
    #[arg(required_unless_present = "owner", conflicts_with = "owner")]
    target: Option<String>,

    /// Apply to every repository of this owner
    #[arg(long, value_name = "OWNER")]
    owner: Option<String>,

    /// Keep going after a failed item in an owner-wide batch
    #[arg(long)]
    best_effort: bool,
}

impl TransitionArgs {
    fn target(&self) -> Result<Target, ghwatch::GitHubError> {
        match (&self.owner, &self.target) {
            (Some(owner), _) => Target::owner(owner),
            (None, Some(target)) => Target::parse(target),
            (None, None) => Err(ghwatch::GitHubError::InvalidTarget(String::new())),
        }
    }
}

fn init_tracing() {
    // Structured logging only when stdout is not a terminal
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("ghwatch=info,ghwatch_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let (action, args) = match cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::List(args) => {
            let config = config::Config::load();
            let session = Session::connect(&config, cli.no_rate_limit)?;
            let (limit, output) = (args.limit, args.output);
            commands::list::handle_list(&session, args.selection(), limit, output).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Status { target } => {
            let target = Target::parse(&target)?;
            let config = config::Config::load();
            let session = Session::connect(&config, cli.no_rate_limit)?;
            commands::status::handle_status(&session, &target).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Add(args) => (Action::Add, args),
        Commands::Delete(args) => (Action::Delete, args),
        Commands::Block(args) => (Action::Block, args),
        Commands::Unblock(args) => (Action::Unblock, args),
    };

    let target = args.target()?;
    let config = config::Config::load();
    let session = Session::connect(&config, cli.no_rate_limit)?;
    let policy = config.batch_policy(args.best_effort);

    let had_failures =
        commands::transition::handle_transition(&session, action, &target, policy).await?;
    Ok(if had_failures {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
