//! DevDash - developer profile dashboard for your terminal
//!
//! A CLI tool that aggregates a GitHub profile and optionally a
//! LeetCode profile into a single Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success (the report was generated, even with failed sections)
//!   1 - Runtime error (unknown profile, config failure, etc.)

mod aggregator;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod sources;
mod stats;

use aggregator::{AggregatorOptions, ProfileAggregator};
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use error::FetchError;
use indicatif::{ProgressBar, ProgressStyle};
use models::{Section, ViewModel};
use sources::{GitHubClient, LeetCodeClient, QuoteClient};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("DevDash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_dashboard(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Aggregation failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .devdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".devdash.toml");

    if path.exists() {
        eprintln!("⚠️  .devdash.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .devdash.toml")?;

    println!("✅ Created .devdash.toml with default settings.");
    println!("   Edit it to set usernames, page sizes, timeouts, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete aggregation workflow. Returns the exit code.
async fn run_dashboard(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let github_handle = config.github.username.clone();
    if github_handle.is_empty() {
        anyhow::bail!("No GitHub handle given (use --github or set github.username in config)");
    }

    // Status goes to stderr so a report piped from stdout stays clean
    eprintln!("📡 Aggregating profile: {}", github_handle);
    if !config.leetcode.username.is_empty() {
        eprintln!("   LeetCode: {}", config.leetcode.username);
    }

    // Step 1: Build the upstream clients
    let timeout = Duration::from_secs(config.http.timeout_seconds);
    let user_agent = config.http.user_agent.clone();

    let github = GitHubClient::new(config.github.api_url.clone(), timeout, &user_agent);
    let leetcode = LeetCodeClient::new(config.leetcode.api_url.clone(), timeout, &user_agent);
    let quotes = QuoteClient::new(config.http.quote_url.clone(), timeout, &user_agent);

    let options = AggregatorOptions {
        github_handle: github_handle.clone(),
        leetcode_handle: config.leetcode.username.clone(),
        repos_per_page: config.github.repos_per_page,
        histogram_per_page: config.github.histogram_per_page,
        commits_per_page: config.github.commits_per_page,
        include_quote: config.report.include_quote,
    };

    let mut aggregator = ProfileAggregator::new(github, leetcode, quotes, options);

    // Step 2: Load the initial snapshot
    let spinner = if !args.quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Fetching profile data...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = aggregator.load_initial().await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(()) => {}
        Err(FetchError::NotFound) => {
            anyhow::bail!("GitHub user '{}' not found", github_handle);
        }
        Err(err) => {
            anyhow::bail!("Failed to load profile for '{}': {}", github_handle, err);
        }
    }

    // Step 3: Honor an explicit --repo selection
    if let Some(ref name) = args.repo {
        let found = aggregator
            .view()
            .repositories
            .loaded()
            .and_then(|repos| repos.iter().find(|r| r.name == *name))
            .cloned();

        match found {
            Some(repo) => aggregator.select_repository(repo).await,
            None => warn!(
                "Repository '{}' is not on the display page; keeping the most recent one",
                name
            ),
        }
    }

    // Step 4: One retry pass for sections that failed transiently
    let (_, failed) = section_tally(aggregator.view());
    if failed > 0 {
        info!("Retrying {} unavailable sections", failed);
        if let Err(err) = aggregator.retry().await {
            warn!("Retry failed: {}", err);
        }
    }

    // Step 5: Render the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(aggregator.view())?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(aggregator.view(), &config.report)
        }
    };

    match args.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("✅ Report saved to: {}", path.display());
        }
        None => {
            println!("{}", output);
        }
    }

    // Print summary
    let (loaded, failed) = section_tally(aggregator.view());
    let duration = start_time.elapsed().as_secs_f64();

    eprintln!(
        "📊 {} sections loaded, {} unavailable ({:.1}s)",
        loaded, failed, duration
    );
    if failed > 0 {
        eprintln!("   Failed sections are noted inline in the report.");
    }

    Ok(0)
}

/// Count loaded and failed sections across the view model.
fn section_tally(view: &ViewModel) -> (usize, usize) {
    fn count<T>(section: &Section<T>, loaded: &mut usize, failed: &mut usize) {
        match section {
            Section::Loaded(_) => *loaded += 1,
            Section::Error(_) => *failed += 1,
            _ => {}
        }
    }

    let mut loaded = 0;
    let mut failed = 0;
    count(&view.profile, &mut loaded, &mut failed);
    count(&view.repositories, &mut loaded, &mut failed);
    count(&view.commits, &mut loaded, &mut failed);
    count(&view.languages, &mut loaded, &mut failed);
    count(&view.detail, &mut loaded, &mut failed);
    count(&view.leetcode_profile, &mut loaded, &mut failed);
    count(&view.problem_stats, &mut loaded, &mut failed);
    count(&view.skill_stats, &mut loaded, &mut failed);
    count(&view.trending, &mut loaded, &mut failed);
    count(&view.quote, &mut loaded, &mut failed);
    (loaded, failed)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .devdash.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
