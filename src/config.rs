//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.devdash.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// LeetCode settings.
    #[serde(default)]
    pub leetcode: LeetCodeConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// GitHub source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Default username to aggregate.
    #[serde(default)]
    pub username: String,

    /// API base URL.
    #[serde(default = "default_github_api")]
    pub api_url: String,

    /// Repositories on the display page.
    #[serde(default = "default_repos_per_page")]
    pub repos_per_page: u32,

    /// Repositories fetched for the language histogram.
    #[serde(default = "default_histogram_per_page")]
    pub histogram_per_page: u32,

    /// Commits fetched per repository.
    #[serde(default = "default_commits_per_page")]
    pub commits_per_page: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            api_url: default_github_api(),
            repos_per_page: default_repos_per_page(),
            histogram_per_page: default_histogram_per_page(),
            commits_per_page: default_commits_per_page(),
        }
    }
}

fn default_github_api() -> String {
    crate::sources::github::DEFAULT_BASE_URL.to_string()
}

fn default_repos_per_page() -> u32 {
    6
}

fn default_histogram_per_page() -> u32 {
    100
}

fn default_commits_per_page() -> u32 {
    5
}

/// LeetCode source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeetCodeConfig {
    /// Default username to aggregate. Empty skips the section.
    #[serde(default)]
    pub username: String,

    /// API base URL (the alfa-leetcode-api proxy).
    #[serde(default = "default_leetcode_api")]
    pub api_url: String,
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            api_url: default_leetcode_api(),
        }
    }
}

fn default_leetcode_api() -> String {
    crate::sources::leetcode::DEFAULT_BASE_URL.to_string()
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds. Bounded so a hung upstream cannot
    /// leave the dashboard loading forever.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header; GitHub rejects anonymous requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Quote endpoint URL.
    #[serde(default = "default_quote_url")]
    pub quote_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            quote_url: default_quote_url(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("devdash/{}", env!("CARGO_PKG_VERSION"))
}

fn default_quote_url() -> String {
    crate::sources::quotes::DEFAULT_QUOTE_URL.to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the trending-discussions section.
    #[serde(default = "default_true")]
    pub include_trending: bool,

    /// Include the quote section.
    #[serde(default = "default_true")]
    pub include_quote: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_trending: true,
            include_quote: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".devdash.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref github) = args.github {
            self.github.username = github.clone();
        }
        if let Some(ref leetcode) = args.leetcode {
            self.leetcode.username = leetcode.clone();
        }

        // Page size has a CLI default, so it always wins
        self.github.repos_per_page = args.repos;

        if let Some(timeout) = args.timeout {
            self.http.timeout_seconds = timeout;
        }

        if args.no_quote {
            self.report.include_quote = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.repos_per_page, 6);
        assert_eq!(config.github.histogram_per_page, 100);
        assert_eq!(config.http.timeout_seconds, 10);
        assert!(config.report.include_trending);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[github]
username = "ashavijit"
repos_per_page = 12

[leetcode]
username = "shellpy03"

[http]
timeout_seconds = 5
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.github.username, "ashavijit");
        assert_eq!(config.github.repos_per_page, 12);
        // Unset fields keep their defaults
        assert_eq!(config.github.commits_per_page, 5);
        assert_eq!(config.leetcode.username, "shellpy03");
        assert_eq!(config.http.timeout_seconds, 5);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[github]"));
        assert!(toml_str.contains("[leetcode]"));
        assert!(toml_str.contains("[http]"));
    }
}
