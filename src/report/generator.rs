//! Markdown report generation.
//!
//! This module renders the aggregated view model into a Markdown
//! dashboard, section by section. Sections that were never requested
//! are skipped entirely; sections that failed render a short notice in
//! place, so one bad upstream never blanks the rest of the report.

use crate::config::ReportConfig;
use crate::models::{
    CommitRecord, DifficultyBucket, DifficultyStats, LanguageHistogram, LeetCodeProfile,
    ProfileSummary, Quote, RepositoryDetail, RepositoryRecord, Section, SkillTag, SkillTagGroup,
    TrendingTopic, ViewModel,
};
use crate::stats::{activity_bar_heights, histogram_percentages, top_language};
use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use std::io::Write;
use std::path::Path;

/// Character width of the rendered percentage bars.
const BAR_WIDTH: usize = 20;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(view: &ViewModel, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Developer Dashboard\n\n");

    // Profile section
    output.push_str(&generate_profile_section(&view.profile));

    // Language histogram
    output.push_str(&generate_languages_section(&view.languages));

    // Repository display page
    output.push_str(&generate_repositories_section(&view.repositories));

    // Commits and activity for the selected repository
    output.push_str(&generate_commits_section(&view.commits));
    output.push_str(&generate_activity_section(&view.detail));

    // Problem-solving sections
    output.push_str(&generate_leetcode_profile_section(&view.leetcode_profile));
    output.push_str(&generate_problem_stats_section(&view.problem_stats));
    output.push_str(&generate_skill_section(&view.skill_stats));

    if config.include_trending {
        output.push_str(&generate_trending_section(&view.trending));
    }

    if config.include_quote {
        output.push_str(&generate_quote_section(&view.quote));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Render one section: a heading plus the body for its current state.
///
/// `NotLoaded` sections were never requested and are omitted entirely.
fn render_section<T>(title: &str, section: &Section<T>, body: impl Fn(&T) -> String) -> String {
    let inner = match section {
        Section::NotLoaded => return String::new(),
        Section::Loading => "*Still loading.*\n\n".to_string(),
        Section::Loaded(value) => body(value),
        Section::Error(err) => format!("> :warning: Unavailable: {}\n\n", err),
    };

    format!("## {}\n\n{}", title, inner)
}

/// A fixed-width bar for a ratio in [0, 1].
fn ratio_bar(ratio: f64) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Human-friendly day distance, e.g. `Today` or `3 days ago`.
fn relative_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now.date_naive() - date.date_naive()).num_days();
    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d => format!("{} days ago", d),
    }
}

/// Generate the profile section.
fn generate_profile_section(section: &Section<ProfileSummary>) -> String {
    render_section("Profile", section, |profile: &ProfileSummary| {
        let mut body = String::new();

        body.push_str(&format!(
            "**[{}]({})** (`@{}`)\n\n",
            profile.name, profile.profile_url, profile.handle
        ));

        if let Some(ref bio) = profile.bio {
            body.push_str(&format!("> {}\n\n", bio));
        }

        body.push_str(&format!(
            "- **Public repositories:** {}\n",
            profile.public_repos
        ));
        body.push_str(&format!(
            "- **Followers / Following:** {} / {}\n",
            profile.followers, profile.following
        ));
        if let Some(ref location) = profile.location {
            body.push_str(&format!("- **Location:** {}\n", location));
        }
        if let Some(ref company) = profile.company {
            body.push_str(&format!("- **Company:** {}\n", company));
        }
        if let Some(ref blog) = profile.blog {
            if !blog.is_empty() {
                body.push_str(&format!("- **Blog:** {}\n", blog));
            }
        }
        body.push_str(&format!(
            "- **Member since:** {}\n",
            profile.created_at.format("%B %Y")
        ));
        body.push('\n');

        body
    })
}

/// Generate the language histogram section.
fn generate_languages_section(section: &Section<LanguageHistogram>) -> String {
    render_section("Languages", section, |histogram: &LanguageHistogram| {
        let entries = histogram_percentages(histogram);
        if entries.is_empty() {
            return "*No classified repositories.*\n\n".to_string();
        }

        let mut body = String::new();

        if let Some(language) = top_language(histogram) {
            body.push_str(&format!("Most used: **{}**\n\n", language));
        }

        body.push_str("| Language | Repos | Share |\n");
        body.push_str("|:---|:---:|:---|\n");
        for (language, count, pct) in entries {
            body.push_str(&format!(
                "| {} | {} | `{}` {:.1}% |\n",
                language,
                count,
                ratio_bar(pct / 100.0),
                pct
            ));
        }
        body.push('\n');

        body
    })
}

/// Generate the repository display page section.
fn generate_repositories_section(section: &Section<Vec<RepositoryRecord>>) -> String {
    render_section(
        "Repositories",
        section,
        |repos: &Vec<RepositoryRecord>| {
            if repos.is_empty() {
                return "*No public repositories.*\n\n".to_string();
            }

            let mut body = String::new();

            body.push_str("| Repository | Language | Stars | Forks | Open Issues |\n");
            body.push_str("|:---|:---|:---:|:---:|:---:|\n");
            for repo in repos {
                body.push_str(&format!(
                    "| [{}]({}) | {} | {} | {} | {} |\n",
                    repo.name,
                    repo.html_url,
                    repo.language.as_deref().unwrap_or("-"),
                    repo.stargazers,
                    repo.forks,
                    repo.open_issues
                ));
            }
            body.push('\n');

            for repo in repos {
                if let Some(ref description) = repo.description {
                    body.push_str(&format!("- **{}** — {}\n", repo.name, description));
                }
            }
            body.push('\n');

            body
        },
    )
}

/// Generate the recent-commits section.
fn generate_commits_section(section: &Section<Vec<CommitRecord>>) -> String {
    render_section("Recent Commits", section, |commits: &Vec<CommitRecord>| {
        if commits.is_empty() {
            return "*No commits found.*\n\n".to_string();
        }

        let mut body = String::new();

        body.push_str(&format!("From `{}`:\n\n", commits[0].repository));
        for commit in commits {
            // First line of the message only
            let subject = commit.message.lines().next().unwrap_or("");
            body.push_str(&format!(
                "- [`{}`]({}) {} — {} ({})\n",
                commit.short_sha(),
                commit.html_url,
                subject,
                commit.author,
                commit.date.format("%Y-%m-%d")
            ));
        }
        body.push('\n');

        body
    })
}

/// Generate the commit-activity section for the selected repository.
fn generate_activity_section(section: &Section<RepositoryDetail>) -> String {
    render_section("Commit Activity", section, |detail: &RepositoryDetail| {
        let heights = activity_bar_heights(&detail.commit_activity);
        if heights.is_empty() {
            return format!("*No activity recorded for `{}`.*\n\n", detail.repo.name);
        }

        let start = detail.commit_activity.len() - heights.len();
        let window = &detail.commit_activity[start..];

        let mut body = String::new();

        body.push_str(&format!(
            "Weekly commits in `{}` (last {} weeks):\n\n",
            detail.repo.name,
            window.len()
        ));
        body.push_str("```\n");
        for (week, height) in window.iter().zip(&heights) {
            let label = Utc
                .timestamp_opt(week.week, 0)
                .single()
                .map(|d| d.format("%b %d").to_string())
                .unwrap_or_else(|| "?".to_string());
            body.push_str(&format!(
                "{:>6}  {} {}\n",
                label,
                ratio_bar(height / 100.0),
                week.total
            ));
        }
        body.push_str("```\n\n");

        body
    })
}

/// Generate the problem-tracking identity card section.
fn generate_leetcode_profile_section(section: &Section<LeetCodeProfile>) -> String {
    render_section("LeetCode Profile", section, |profile: &LeetCodeProfile| {
        let mut body = String::new();

        body.push_str(&format!(
            "**{}** (`@{}`)\n\n",
            profile.name, profile.username
        ));

        if let Some(ref about) = profile.about {
            body.push_str(&format!("> {}\n\n", about));
        }

        body.push_str(&format!("- **Ranking:** #{}\n", profile.ranking));
        body.push_str(&format!("- **Reputation:** {}\n", profile.reputation));
        if let Some(ref country) = profile.country {
            body.push_str(&format!("- **Country:** {}\n", country));
        }
        if let Some(ref company) = profile.company {
            body.push_str(&format!("- **Company:** {}\n", company));
        }
        if let Some(ref school) = profile.school {
            body.push_str(&format!("- **School:** {}\n", school));
        }

        let mut links = Vec::new();
        if let Some(ref url) = profile.github {
            links.push(format!("[GitHub]({})", url));
        }
        if let Some(ref url) = profile.twitter {
            links.push(format!("[Twitter]({})", url));
        }
        if let Some(ref url) = profile.linkedin {
            links.push(format!("[LinkedIn]({})", url));
        }
        if let Some(ref site) = profile.website {
            // Websites arrive without a scheme
            links.push(format!("[Website](https://{})", site));
        }
        if !links.is_empty() {
            body.push_str(&format!("- **Links:** {}\n", links.join(" · ")));
        }
        body.push('\n');

        body
    })
}

/// Generate one difficulty row with its completion bar.
fn difficulty_row(label: &str, bucket: &DifficultyBucket) -> String {
    format!(
        "| {} | {} / {} | `{}` | {} |\n",
        label,
        bucket.solved,
        bucket.total,
        ratio_bar(bucket.completion_ratio()),
        bucket.submissions
    )
}

/// Generate the problem-solving statistics section.
fn generate_problem_stats_section(section: &Section<DifficultyStats>) -> String {
    render_section("Problem Solving", section, |stats: &DifficultyStats| {
        let mut body = String::new();

        body.push_str(&format!(
            "**{} / {}** problems solved · ranking **#{}** · {} contribution points · {} reputation\n\n",
            stats.total_solved,
            stats.total_questions,
            stats.ranking,
            stats.contribution_points,
            stats.reputation
        ));

        body.push_str("| Difficulty | Solved | Progress | Submissions |\n");
        body.push_str("|:---|:---:|:---|:---:|\n");
        body.push_str(&difficulty_row("Easy", &stats.easy));
        body.push_str(&difficulty_row("Medium", &stats.medium));
        body.push_str(&difficulty_row("Hard", &stats.hard));
        body.push('\n');

        if !stats.recent_submissions.is_empty() {
            body.push_str("### Recent Submissions\n\n");
            for submission in &stats.recent_submissions {
                body.push_str(&format!(
                    "- **{}** — {} in {} ({})\n",
                    submission.title,
                    submission.status,
                    submission.lang,
                    submission.timestamp.format("%Y-%m-%d")
                ));
            }
            body.push('\n');
        }

        body
    })
}

/// Generate one skill tier as a tag list.
fn skill_tier(label: &str, tags: &[SkillTag]) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let rendered: Vec<String> = tags
        .iter()
        .map(|tag| format!("`{}` ({})", tag.tag_name, tag.problems_solved))
        .collect();
    format!("- **{}:** {}\n", label, rendered.join(", "))
}

/// Generate the skill-tags section.
fn generate_skill_section(section: &Section<SkillTagGroup>) -> String {
    render_section("Skill Tags", section, |skills: &SkillTagGroup| {
        let mut body = String::new();

        body.push_str(&skill_tier("Advanced", &skills.advanced));
        body.push_str(&skill_tier("Intermediate", &skills.intermediate));
        body.push_str(&skill_tier("Fundamental", &skills.fundamental));

        if body.is_empty() {
            body.push_str("*No skill tags recorded.*\n");
        }
        body.push('\n');

        body
    })
}

/// Generate the trending-discussions section.
fn generate_trending_section(section: &Section<Vec<TrendingTopic>>) -> String {
    render_section(
        "Trending Discussions",
        section,
        |topics: &Vec<TrendingTopic>| {
            if topics.is_empty() {
                return "*Nothing trending right now.*\n\n".to_string();
            }

            let now = Utc::now();
            let mut body = String::new();

            for topic in topics {
                body.push_str(&format!(
                    "- **{}** — {} ({})\n",
                    topic.title,
                    topic.author,
                    relative_date(topic.created_at, now)
                ));
            }
            body.push('\n');

            body
        },
    )
}

/// Generate the quote section.
fn generate_quote_section(section: &Section<Quote>) -> String {
    render_section("Quote of the Day", section, |quote: &Quote| {
        format!("> *\"{}\"*\n>\n> — {}\n\n", quote.quote, quote.author)
    })
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Generated by devdash v{} on {}*\n",
        env!("CARGO_PKG_VERSION"),
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(view: &ViewModel) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::WeekActivity;

    fn make_profile() -> ProfileSummary {
        ProfileSummary {
            handle: "ashavijit".to_string(),
            name: "Avijit Sarkar".to_string(),
            avatar_url: "https://avatars.githubusercontent.com/u/1".to_string(),
            profile_url: "https://github.com/ashavijit".to_string(),
            bio: Some("Building things".to_string()),
            location: Some("Kolkata".to_string()),
            company: None,
            blog: None,
            public_repos: 42,
            followers: 10,
            following: 5,
            created_at: Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn make_view() -> ViewModel {
        let mut view = ViewModel::default();
        view.profile = Section::Loaded(make_profile());
        view
    }

    #[test]
    fn test_profile_section_renders_identity() {
        let section = generate_profile_section(&Section::Loaded(make_profile()));

        assert!(section.contains("## Profile"));
        assert!(section.contains("Avijit Sarkar"));
        assert!(section.contains("@ashavijit"));
        assert!(section.contains("Member since:** June 2019"));
    }

    #[test]
    fn test_not_loaded_sections_are_omitted() {
        let view = make_view();
        let config = ReportConfig::default();
        let markdown = generate_markdown_report(&view, &config);

        assert!(markdown.contains("## Profile"));
        // Never-requested sections leave no trace
        assert!(!markdown.contains("## Problem Solving"));
        assert!(!markdown.contains("## Quote of the Day"));
    }

    #[test]
    fn test_error_section_renders_notice_inline() {
        let mut view = make_view();
        view.languages = Section::Error(FetchError::Upstream("HTTP 500".to_string()));
        let markdown = generate_markdown_report(&view, &ReportConfig::default());

        assert!(markdown.contains("## Languages"));
        assert!(markdown.contains("Unavailable"));
        assert!(markdown.contains("HTTP 500"));
        // Sibling sections unaffected
        assert!(markdown.contains("Avijit Sarkar"));
    }

    #[test]
    fn test_leetcode_profile_section_renders_card() {
        let profile = LeetCodeProfile {
            username: "shellpy03".to_string(),
            name: "Shell Py".to_string(),
            avatar: None,
            ranking: 54321,
            reputation: 15,
            github: Some("https://github.com/ashavijit".to_string()),
            twitter: None,
            linkedin: None,
            website: Some("avijitsarkar.dev".to_string()),
            country: Some("India".to_string()),
            company: None,
            school: None,
            about: Some("I solve problems.".to_string()),
        };

        let section = generate_leetcode_profile_section(&Section::Loaded(profile));

        assert!(section.contains("## LeetCode Profile"));
        assert!(section.contains("@shellpy03"));
        assert!(section.contains("#54321"));
        assert!(section.contains("> I solve problems."));
        assert!(section.contains("[GitHub](https://github.com/ashavijit)"));
        assert!(section.contains("[Website](https://avijitsarkar.dev)"));
        // Absent links leave no trace
        assert!(!section.contains("Twitter"));
    }

    #[test]
    fn test_trending_respects_config_flag() {
        let mut view = make_view();
        view.trending = Section::Loaded(vec![]);

        let mut config = ReportConfig::default();
        config.include_trending = false;
        let markdown = generate_markdown_report(&view, &config);
        assert!(!markdown.contains("Trending"));

        config.include_trending = true;
        let markdown = generate_markdown_report(&view, &config);
        assert!(markdown.contains("## Trending Discussions"));
    }

    #[test]
    fn test_ratio_bar_bounds() {
        assert_eq!(ratio_bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(ratio_bar(1.0), "█".repeat(BAR_WIDTH));
        // Out-of-range input clamps instead of panicking
        assert_eq!(ratio_bar(1.5), "█".repeat(BAR_WIDTH));
        assert_eq!(ratio_bar(-0.5), "░".repeat(BAR_WIDTH));
    }

    #[test]
    fn test_relative_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        let today = Utc.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap();
        assert_eq!(relative_date(today, now), "Today");

        let yesterday = Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap();
        assert_eq!(relative_date(yesterday, now), "Yesterday");

        let earlier = Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap();
        assert_eq!(relative_date(earlier, now), "7 days ago");
    }

    #[test]
    fn test_activity_section_scales_against_window() {
        let detail = RepositoryDetail {
            repo: crate::models::RepositoryRecord {
                name: "devdash".to_string(),
                full_name: "ashavijit/devdash".to_string(),
                html_url: String::new(),
                description: None,
                language: None,
                stargazers: 0,
                forks: 0,
                watchers: 0,
                open_issues: 0,
                topics: Vec::new(),
                fork: false,
                visibility: "public".to_string(),
                size_kb: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                pushed_at: None,
            },
            commit_activity: vec![
                WeekActivity {
                    total: 4,
                    week: 1_700_000_000,
                    days: vec![0; 7],
                },
                WeekActivity {
                    total: 8,
                    week: 1_700_604_800,
                    days: vec![0; 7],
                },
            ],
        };

        let section = generate_activity_section(&Section::Loaded(detail));

        assert!(section.contains("## Commit Activity"));
        assert!(section.contains("devdash"));
        // The busiest week fills the whole bar
        assert!(section.contains(&"█".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_json_report_carries_section_states() {
        let mut view = make_view();
        view.quote = Section::Error(FetchError::NotFound);
        let json = generate_json_report(&view).unwrap();

        assert!(json.contains("\"profile\""));
        assert!(json.contains("\"loaded\""));
        assert!(json.contains("\"not_found\""));
    }
}
