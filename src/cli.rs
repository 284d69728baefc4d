//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// DevDash - developer profile dashboard for your terminal
///
/// Aggregates a GitHub profile (identity, repositories, commits,
/// languages, activity) and optionally a LeetCode profile (solved
/// stats, skill tags, trending discussions) into one Markdown or
/// JSON report.
///
/// Examples:
///   devdash --github ashavijit
///   devdash --github ashavijit --leetcode shellpy03
///   devdash --github ashavijit --repo devdash --format json -o dash.json
///   devdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// GitHub username to aggregate
    ///
    /// Not required when using --init-config.
    #[arg(
        short,
        long,
        value_name = "HANDLE",
        env = "DEVDASH_GITHUB",
        required_unless_present = "init_config"
    )]
    pub github: Option<String>,

    /// LeetCode username to aggregate
    ///
    /// When omitted, the problem-solving sections are skipped.
    #[arg(short, long, value_name = "HANDLE", env = "DEVDASH_LEETCODE")]
    pub leetcode: Option<String>,

    /// Repository to show commits and activity for
    ///
    /// Defaults to the most recently updated repository.
    #[arg(short, long, value_name = "NAME")]
    pub repo: Option<String>,

    /// Output file path for the report (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Number of repositories on the display page
    #[arg(long, default_value = "6", value_name = "COUNT")]
    pub repos: u32,

    /// Path to configuration file
    ///
    /// If not specified, looks for .devdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip the quote section
    #[arg(long)]
    pub no_quote: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .devdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let github = self.github.as_deref().unwrap_or("");
        if github.trim().is_empty() {
            return Err("GitHub handle must not be empty".to_string());
        }
        if github.contains('/') || github.contains(char::is_whitespace) {
            return Err(format!("Invalid GitHub handle: {}", github));
        }

        if let Some(ref leetcode) = self.leetcode {
            if leetcode.trim().is_empty() {
                return Err("LeetCode handle must not be empty".to_string());
            }
        }

        if self.repos == 0 || self.repos > 100 {
            return Err("Repository page size must be between 1 and 100".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
