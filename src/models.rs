//! Data models for the profile dashboard.
//!
//! This module contains the normalized, render-ready data structures
//! that the aggregator builds from upstream payloads, plus the
//! per-section loading state machine.

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Loading state of one independently-fetched section of the view model.
///
/// Each section moves `NotLoaded -> Loading -> Loaded | Error` and may
/// be driven back through `Loading` by a retry or re-selection. Errors
/// never escalate to sibling sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Error(FetchError),
}

impl<T> Section<T> {
    /// Returns the loaded value, if any.
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Section::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the error, if the section failed.
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Section::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the section ended in an error state.
    pub fn is_error(&self) -> bool {
        matches!(self, Section::Error(_))
    }

    /// Resolve a fetch result into the terminal state for this section.
    pub fn resolve(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Section::Loaded(value),
            Err(err) => Section::Error(err),
        }
    }
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Section::NotLoaded
    }
}

/// Identity fields for the profiled user. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Account handle (login name).
    pub handle: String,
    /// Display name; falls back to the handle when unset upstream.
    pub name: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Link to the public profile page.
    pub profile_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

/// One public repository, normalized from the repository-list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,
    /// Owner-qualified name, e.g. `ashavijit/devdash`.
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    /// Primary language; `None` for repositories GitHub cannot classify.
    pub language: Option<String>,
    pub stargazers: u32,
    pub forks: u32,
    pub watchers: u32,
    pub open_issues: u32,
    pub topics: Vec<String>,
    pub fork: bool,
    pub visibility: String,
    /// Repository size in kilobytes.
    pub size_kb: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// One commit, tagged with the repository it was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub html_url: String,
    /// Name of the repository this commit belongs to (by reference,
    /// not ownership; the repository list is the source of truth).
    pub repository: String,
}

impl CommitRecord {
    /// Short form of the content hash for display.
    pub fn short_sha(&self) -> &str {
        let end = self.sha.len().min(7);
        &self.sha[..end]
    }
}

/// Language name -> repository count, folded over the full repo page.
pub type LanguageHistogram = HashMap<String, usize>;

/// One week of commit activity from the stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekActivity {
    /// Total commits in the week.
    pub total: u32,
    /// Week start as a unix timestamp.
    pub week: i64,
    /// Per-day commit counts, Sunday first.
    #[serde(default)]
    pub days: Vec<u32>,
}

/// A repository inspected by the user, extended with its weekly
/// commit-activity series. Single-slot: selecting another repository
/// overwrites this atomically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryDetail {
    pub repo: RepositoryRecord,
    pub commit_activity: Vec<WeekActivity>,
}

/// Identity card from the problem-tracking profile endpoint: who the
/// user is there, distinct from their solving stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeetCodeProfile {
    pub username: String,
    /// Display name; falls back to the username when unset upstream.
    pub name: String,
    pub avatar: Option<String>,
    pub ranking: u32,
    pub reputation: u32,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    /// First listed website, stored without a scheme as delivered.
    pub website: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    pub school: Option<String>,
    pub about: Option<String>,
}

/// Solved/total/submission counts for one difficulty bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DifficultyBucket {
    pub solved: u32,
    pub total: u32,
    pub submissions: u32,
}

impl DifficultyBucket {
    /// Completion ratio in [0, 1]. A zero total yields 0, and a solved
    /// count exceeding the total clamps to 1 rather than overflowing
    /// the displayed bar.
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (f64::from(self.solved) / f64::from(self.total)).clamp(0.0, 1.0)
    }
}

/// One recent problem submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub title: String,
    pub title_slug: String,
    pub status: String,
    pub lang: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate problem-solving statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyStats {
    pub total_solved: u32,
    pub total_questions: u32,
    pub ranking: u32,
    pub contribution_points: u32,
    pub reputation: u32,
    pub easy: DifficultyBucket,
    pub medium: DifficultyBucket,
    pub hard: DifficultyBucket,
    /// Most recent submissions, truncated to 4.
    pub recent_submissions: Vec<SubmissionRecord>,
}

/// One skill tag with its solved-problem count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTag {
    pub tag_name: String,
    pub tag_slug: String,
    pub problems_solved: u32,
}

/// The three fixed skill tiers, each ranked and truncated to the top 6.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SkillTagGroup {
    pub fundamental: Vec<SkillTag>,
    pub intermediate: Vec<SkillTag>,
    pub advanced: Vec<SkillTag>,
}

/// One trending discussion topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingTopic {
    pub id: u64,
    pub title: String,
    pub content_preview: String,
    pub author: String,
    pub author_avatar: Option<String>,
    pub author_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A quote and its author, re-fetchable on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
    pub author: String,
}

/// The render-ready view model consumed by the presentation layer.
///
/// Each field is an independent section with its own lifecycle; the
/// aggregator is the only writer, and each operation touches exactly
/// one field group so updates never clobber each other.
#[derive(Debug, Default, Serialize)]
pub struct ViewModel {
    pub profile: Section<ProfileSummary>,
    pub repositories: Section<Vec<RepositoryRecord>>,
    pub commits: Section<Vec<CommitRecord>>,
    pub languages: Section<LanguageHistogram>,
    pub detail: Section<RepositoryDetail>,
    pub leetcode_profile: Section<LeetCodeProfile>,
    pub problem_stats: Section<DifficultyStats>,
    pub skill_stats: Section<SkillTagGroup>,
    pub trending: Section<Vec<TrendingTopic>>,
    pub quote: Section<Quote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_default_is_not_loaded() {
        let section: Section<u32> = Section::default();
        assert_eq!(section, Section::NotLoaded);
    }

    #[test]
    fn test_section_resolve() {
        let ok: Section<u32> = Section::resolve(Ok(7));
        assert_eq!(ok.loaded(), Some(&7));

        let err: Section<u32> = Section::resolve(Err(FetchError::NotFound));
        assert!(err.is_error());
        assert_eq!(err.error(), Some(&FetchError::NotFound));
    }

    #[test]
    fn test_completion_ratio_zero_total() {
        let bucket = DifficultyBucket {
            solved: 0,
            total: 0,
            submissions: 0,
        };
        assert_eq!(bucket.completion_ratio(), 0.0);
    }

    #[test]
    fn test_completion_ratio_clamps() {
        let bucket = DifficultyBucket {
            solved: 12,
            total: 10,
            submissions: 40,
        };
        assert_eq!(bucket.completion_ratio(), 1.0);

        let half = DifficultyBucket {
            solved: 5,
            total: 10,
            submissions: 20,
        };
        assert_eq!(half.completion_ratio(), 0.5);
    }

    #[test]
    fn test_short_sha() {
        let commit = CommitRecord {
            sha: "abcdef1234567890".to_string(),
            message: "fix".to_string(),
            author: "test".to_string(),
            date: Utc::now(),
            html_url: String::new(),
            repository: "repo".to_string(),
        };
        assert_eq!(commit.short_sha(), "abcdef1");

        let tiny = CommitRecord {
            sha: "abc".to_string(),
            ..commit
        };
        assert_eq!(tiny.short_sha(), "abc");
    }
}
