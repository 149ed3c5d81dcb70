//! Command operands: `owner/repo`, `owner/` and bare logins.

use std::fmt;

use crate::github::GitHubError;

/// What a command acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single repository.
    Repo { owner: String, name: String },
    /// Every repository owned by `owner` (batch form).
    Owner(String),
    /// A user account (follow/block axes).
    User(String),
}

fn is_login_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_repo_char(c: char) -> bool {
    is_login_char(c) || c == '.'
}

fn valid_login(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_login_char)
}

fn valid_repo(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && s.chars().all(is_repo_char)
}

impl Target {
    /// Parse a command operand.
    ///
    /// - `owner/repo` is a single repository
    /// - `owner/` is every repository of `owner`
    /// - `login` is a user
    pub fn parse(input: &str) -> Result<Self, GitHubError> {
        let input = input.trim();
        let invalid = || GitHubError::InvalidTarget(input.to_string());

        match input.split_once('/') {
            None if valid_login(input) => Ok(Target::User(input.to_string())),
            Some((owner, "")) if valid_login(owner) => Ok(Target::Owner(owner.to_string())),
            Some((owner, name)) if valid_login(owner) && valid_repo(name) => Ok(Target::Repo {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(invalid()),
        }
    }

    /// Batch target for `--owner`.
    pub fn owner(owner: &str) -> Result<Self, GitHubError> {
        if valid_login(owner) {
            Ok(Target::Owner(owner.to_string()))
        } else {
            Err(GitHubError::InvalidTarget(owner.to_string()))
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Target::User(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Repo { owner, name } => write!(f, "{}/{}", owner, name),
            Target::Owner(owner) => write!(f, "{}/", owner),
            Target::User(login) => f.write_str(login),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_forms() {
        assert_eq!(
            Target::parse("rust-lang/rust").unwrap(),
            Target::Repo {
                owner: "rust-lang".into(),
                name: "rust".into()
            }
        );
        assert_eq!(
            Target::parse("rust-lang/").unwrap(),
            Target::Owner("rust-lang".into())
        );
        assert_eq!(
            Target::parse("octocat").unwrap(),
            Target::User("octocat".into())
        );
    }

    #[test]
    fn repo_names_may_contain_dots() {
        let target = Target::parse("owner/my.repo_v2").unwrap();
        assert_eq!(target.to_string(), "owner/my.repo_v2");
    }

    #[test]
    fn rejects_malformed_operands() {
        for bad in ["", "/", "/repo", "a/b/c", "a b", "owner/..", "ow@ner"] {
            assert!(
                matches!(Target::parse(bad), Err(GitHubError::InvalidTarget(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn owner_constructor_validates() {
        assert_eq!(Target::owner("a").unwrap().to_string(), "a/");
        assert!(Target::owner("a/b").is_err());
        assert!(!Target::owner("a").unwrap().is_user());
    }
}
