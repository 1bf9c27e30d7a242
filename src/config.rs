use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the per-repository configuration file.
pub const CONFIG_FILE: &str = ".prflow.toml";

/// Environment variable overriding the base branch for every operation.
pub const BASE_BRANCH_ENV: &str = "PRFLOW_BASE_BRANCH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .prflow.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub reviewers: ReviewersConfig,

    #[serde(default)]
    pub title: TitleConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN / GH_TOKEN.
    pub token: Option<String>,
    /// API root, for GitHub Enterprise installations.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitConfig {
    /// Base branch used instead of the resolver's guess.
    pub base_branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewersConfig {
    #[serde(default = "default_reviewer_limit")]
    pub limit: usize,
    #[serde(default = "default_true")]
    pub assign: bool,
}

impl Default for ReviewersConfig {
    fn default() -> Self {
        Self {
            limit: default_reviewer_limit(),
            assign: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleConfig {
    pub max_length: Option<usize>,
}

fn default_reviewer_limit() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from .prflow.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if let Some(base) = env_non_empty(BASE_BRANCH_ENV) {
            config.git.base_branch = Some(base);
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence,
    /// then GITHUB_TOKEN, then GH_TOKEN.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env_non_empty("GITHUB_TOKEN"))
            .or_else(|| env_non_empty("GH_TOKEN"))
    }

    /// Base-branch override from the config file or PRFLOW_BASE_BRANCH.
    pub fn base_branch_override(&self) -> Option<&str> {
        self.git
            .base_branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
