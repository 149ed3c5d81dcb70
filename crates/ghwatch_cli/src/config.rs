//! Configuration file support for ghwatch.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `GHWATCH_`, sections split by `__`,
//!    e.g. `GHWATCH_GITHUB__TOKEN`)
//! 3. Local config file (./ghwatch.toml)
//! 4. User config file (~/.config/ghwatch/config.toml)
//! 5. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or GHWATCH_GITHUB__TOKEN, or GITHUB_TOKEN
//! api_url = "https://api.github.com"
//! page_size = 100
//!
//! [features]
//! users = true  # false manages repositories only
//!
//! [rate_limit]
//! enabled = true
//! requests_per_second = 10
//!
//! [batch]
//! best_effort = false
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use ghwatch::rate_limit::GITHUB_DEFAULT_RPS;
use ghwatch::{BatchPolicy, Capabilities, GITHUB_API_URL, MAX_PAGE_SIZE};
use serde::Deserialize;

const LOCAL_CONFIG: &str = "ghwatch.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub features: FeaturesConfig,
    pub rate_limit: RateLimitConfig,
    pub batch: BatchConfig,
}

/// GitHub connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token.
    pub token: Option<String>,
    /// REST API root; point at `https://HOST/api/v3` for GitHub Enterprise.
    pub api_url: String,
    /// Records requested per page (1..=100).
    pub page_size: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: GITHUB_API_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Which target kinds are managed.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Follow/block users in addition to watching repositories.
    pub users: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self { users: true }
    }
}

/// Client-side request pacing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: GITHUB_DEFAULT_RPS,
        }
    }
}

/// Owner-scoped batch behavior.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Keep going after a failed item instead of stopping.
    pub best_effort: bool,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/ghwatch/config.toml)
    /// 3. Local config file (./ghwatch.toml)
    /// 4. Environment variables with GHWATCH_ prefix
    pub fn load() -> Self {
        let files = Self::config_files(Self::default_config_path(), PathBuf::from(LOCAL_CONFIG));
        Self::from_files(&files)
    }

    /// Config files that exist, lowest precedence first.
    fn config_files(user_config: Option<PathBuf>, local_config: PathBuf) -> Vec<PathBuf> {
        user_config
            .into_iter()
            .chain(std::iter::once(local_config))
            .filter(|path| path.exists())
            .collect()
    }

    fn from_files(files: &[PathBuf]) -> Self {
        let mut builder = ConfigBuilder::builder();

        for path in files {
            tracing::debug!("Loading config from {:?}", path);
            builder = builder.add_source(
                File::from(path.clone())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(Self::environment());

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// `GHWATCH_GITHUB__PAGE_SIZE` -> `github.page_size`.
    fn environment() -> Environment {
        Environment::with_prefix("GHWATCH")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Token from config, falling back to `GITHUB_TOKEN`.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            users: self.features.users,
        }
    }

    /// Batch policy, with `--best-effort` taking precedence.
    pub fn batch_policy(&self, best_effort_flag: bool) -> BatchPolicy {
        if best_effort_flag || self.batch.best_effort {
            BatchPolicy::BestEffort
        } else {
            BatchPolicy::FailFast
        }
    }

    /// Requests per second, or `None` when pacing is off.
    pub fn rate_limit(&self, no_rate_limit_flag: bool) -> Option<u32> {
        if no_rate_limit_flag || !self.rate_limit.enabled {
            None
        } else {
            Some(self.rate_limit.requests_per_second.max(1))
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ghwatch").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml_content: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.page_size, 100);
        assert!(config.features.users);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.requests_per_second, 10);
        assert!(!config.batch.best_effort);
    }

    #[test]
    fn test_full_config_parsing() {
        let config = from_toml(
            r#"
            [github]
            token = "ghp_test123"
            api_url = "https://ghe.example.com/api/v3"
            page_size = 50

            [features]
            users = false

            [rate_limit]
            enabled = false
            requests_per_second = 3

            [batch]
            best_effort = true
        "#,
        );

        assert_eq!(config.github_token(), Some("ghp_test123".to_string()));
        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.github.page_size, 50);
        assert!(!config.capabilities().users);
        assert_eq!(config.rate_limit(false), None);
        assert_eq!(config.batch_policy(false), BatchPolicy::BestEffort);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = from_toml(
            r#"
            [rate_limit]
            requests_per_second = 2
        "#,
        );

        assert_eq!(config.rate_limit(false), Some(2));
        assert_eq!(config.github.page_size, 100);
        assert!(config.features.users);
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::default();
        assert_eq!(config.rate_limit(true), None);
        assert_eq!(config.rate_limit(false), Some(10));
        assert_eq!(config.batch_policy(false), BatchPolicy::FailFast);
        assert_eq!(config.batch_policy(true), BatchPolicy::BestEffort);
    }

    #[test]
    fn test_config_merging_order() {
        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(
                "[github]\npage_size = 20\napi_url = \"https://a\"",
                FileFormat::Toml,
            ))
            .add_source(config::File::from_str("[github]\npage_size = 30", FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.github.page_size, 30);
        assert_eq!(config.github.api_url, "https://a");
    }

    #[test]
    fn test_local_file_overrides_user_file() {
        let dir = std::env::temp_dir().join(format!("ghwatch-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let user = dir.join("config.toml");
        let local = dir.join("ghwatch.toml");
        std::fs::write(&user, "[github]\npage_size = 20\napi_url = \"https://a\"").unwrap();
        std::fs::write(&local, "[github]\npage_size = 30").unwrap();

        let files = Config::config_files(Some(user.clone()), local.clone());
        assert_eq!(files, vec![user.clone(), local.clone()]);

        let config = Config::from_files(&files);
        assert_eq!(config.github.page_size, 30);
        assert_eq!(config.github.api_url, "https://a");

        std::fs::remove_file(&local).unwrap();
        assert_eq!(Config::config_files(Some(user.clone()), local), vec![user]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_invalid_toml() {
        let result = ConfigBuilder::builder()
            .add_source(config::File::from_str("[github\ntoken = 1", FileFormat::Toml))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = Config::default_config_path() {
            assert!(path.ends_with("config.toml"));
            assert!(path.to_string_lossy().contains("ghwatch"));
        }
    }
}
