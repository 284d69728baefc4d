//! LeetCode stats API client.
//!
//! Talks to the public alfa-leetcode-api proxy. The upstream is flaky
//! and its payload shapes drift, so every parser validates the fields
//! it cannot do without before accepting a payload; a payload missing
//! a required field is a `MalformedData` failure, never zero stats.

use crate::error::FetchError;
use crate::models::{
    DifficultyBucket, DifficultyStats, LeetCodeProfile, SkillTag, SkillTagGroup, SubmissionRecord,
    TrendingTopic,
};
use crate::stats::rank_skill_tags;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default public proxy base.
pub const DEFAULT_BASE_URL: &str = "https://alfa-leetcode-api.onrender.com";

/// How many recent submissions the stats keep.
const RECENT_SUBMISSIONS: usize = 4;

/// How many trending topics to request and keep.
const TRENDING_FIRST: u32 = 20;
const TRENDING_KEPT: usize = 5;

/// Client for the problem-tracking API.
pub struct LeetCodeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl LeetCodeClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("Fetching: {}", url);

        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(FetchError::from_request)?;

        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|_| FetchError::MalformedData("json body"))
    }

    /// Fetch the identity card for `handle`.
    pub async fn profile(&self, handle: &str) -> Result<LeetCodeProfile, FetchError> {
        let url = format!("{}/{}/", self.base_url, handle);
        let payload = self.get_json(&url).await?;
        parse_profile(&payload)
    }

    /// Fetch aggregate problem-solving statistics for `handle`.
    pub async fn problem_stats(&self, handle: &str) -> Result<DifficultyStats, FetchError> {
        let url = format!("{}/userProfile/{}/", self.base_url, handle);
        let payload = self.get_json(&url).await?;
        parse_problem_stats(&payload)
    }

    /// Fetch the ranked skill-tag tiers for `handle`.
    pub async fn skill_stats(&self, handle: &str) -> Result<SkillTagGroup, FetchError> {
        let url = format!("{}/skillStats/{}/", self.base_url, handle);
        let payload = self.get_json(&url).await?;
        parse_skill_stats(&payload)
    }

    /// Fetch the current trending discussion topics.
    pub async fn trending_topics(&self) -> Result<Vec<TrendingTopic>, FetchError> {
        let url = format!("{}/trendingDiscuss?first={}", self.base_url, TRENDING_FIRST);
        let payload = self.get_json(&url).await?;
        parse_trending(&payload)
    }
}

/// Read a count field, saturating rather than truncating oversized
/// values; absence is zero.
fn u32_field(value: &Value, key: &str) -> u32 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Read a non-empty string field.
fn opt_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Submission count for one difficulty out of the totalSubmissions array.
fn submissions_for(payload: &Value, difficulty: &str) -> u32 {
    payload
        .get("totalSubmissions")
        .and_then(Value::as_array)
        .and_then(|entries| {
            entries
                .iter()
                .find(|e| e.get("difficulty").and_then(Value::as_str) == Some(difficulty))
        })
        .map(|e| u32_field(e, "submissions"))
        .unwrap_or(0)
}

/// Parse the userProfile payload into difficulty stats.
///
/// `totalSolved` and `totalQuestions` are required: their absence means
/// the proxy returned an error body, not a profile. Everything else
/// defaults to zero.
pub fn parse_problem_stats(payload: &Value) -> Result<DifficultyStats, FetchError> {
    let total_solved = payload
        .get("totalSolved")
        .and_then(Value::as_u64)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .ok_or(FetchError::MalformedData("totalSolved"))?;
    let total_questions = payload
        .get("totalQuestions")
        .and_then(Value::as_u64)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .ok_or(FetchError::MalformedData("totalQuestions"))?;

    let recent_submissions = payload
        .get("recentSubmissions")
        .and_then(Value::as_array)
        .map(|subs| {
            subs.iter()
                .take(RECENT_SUBMISSIONS)
                .filter_map(parse_submission)
                .collect()
        })
        .unwrap_or_default();

    Ok(DifficultyStats {
        total_solved,
        total_questions,
        ranking: u32_field(payload, "ranking"),
        contribution_points: u32_field(payload, "contributionPoint"),
        reputation: u32_field(payload, "reputation"),
        easy: DifficultyBucket {
            solved: u32_field(payload, "easySolved"),
            total: u32_field(payload, "totalEasy"),
            submissions: submissions_for(payload, "Easy"),
        },
        medium: DifficultyBucket {
            solved: u32_field(payload, "mediumSolved"),
            total: u32_field(payload, "totalMedium"),
            submissions: submissions_for(payload, "Medium"),
        },
        hard: DifficultyBucket {
            solved: u32_field(payload, "hardSolved"),
            total: u32_field(payload, "totalHard"),
            submissions: submissions_for(payload, "Hard"),
        },
        recent_submissions,
    })
}

fn parse_submission(value: &Value) -> Option<SubmissionRecord> {
    // Timestamps arrive as unix-second strings
    let timestamp = value
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))?;

    Some(SubmissionRecord {
        title: value.get("title")?.as_str()?.to_string(),
        title_slug: value
            .get("titleSlug")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        status: value
            .get("statusDisplay")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        lang: value
            .get("lang")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        timestamp,
    })
}

/// Parse the identity payload into a profile card.
///
/// `username` is required: the proxy answers an error body without one.
/// Empty link and text fields normalize to `None`, matching how the
/// card renders (absent links are simply not shown).
pub fn parse_profile(payload: &Value) -> Result<LeetCodeProfile, FetchError> {
    let username = payload
        .get("username")
        .and_then(Value::as_str)
        .ok_or(FetchError::MalformedData("username"))?
        .to_string();

    Ok(LeetCodeProfile {
        name: opt_str(payload, "name").unwrap_or_else(|| username.clone()),
        username,
        avatar: opt_str(payload, "avatar"),
        ranking: u32_field(payload, "ranking"),
        reputation: u32_field(payload, "reputation"),
        github: opt_str(payload, "gitHub"),
        twitter: opt_str(payload, "twitter"),
        linkedin: opt_str(payload, "linkedIN"),
        website: payload
            .get("website")
            .and_then(Value::as_array)
            .and_then(|sites| sites.first())
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from),
        country: opt_str(payload, "country"),
        company: opt_str(payload, "company"),
        school: opt_str(payload, "school"),
        about: opt_str(payload, "about"),
    })
}

/// Parse the skillStats payload into ranked tag tiers.
///
/// The tier map at `data.matchedUser.tagProblemCounts` is required; a
/// missing individual tier is an empty list, not an error.
pub fn parse_skill_stats(payload: &Value) -> Result<SkillTagGroup, FetchError> {
    let tag_counts = payload
        .pointer("/data/matchedUser/tagProblemCounts")
        .ok_or(FetchError::MalformedData("tagProblemCounts"))?;

    Ok(SkillTagGroup {
        fundamental: parse_tier(tag_counts, "fundamental"),
        intermediate: parse_tier(tag_counts, "intermediate"),
        advanced: parse_tier(tag_counts, "advanced"),
    })
}

fn parse_tier(tag_counts: &Value, tier: &str) -> Vec<SkillTag> {
    let tags = tag_counts
        .get(tier)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_tag).collect())
        .unwrap_or_default();

    rank_skill_tags(tags)
}

fn parse_tag(value: &Value) -> Option<SkillTag> {
    Some(SkillTag {
        tag_name: value.get("tagName")?.as_str()?.to_string(),
        tag_slug: value
            .get("tagSlug")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        problems_solved: u32_field(value, "problemsSolved"),
    })
}

/// Parse the trendingDiscuss payload into topics, truncated to 5.
///
/// An absent topic list is an empty result (the cache key appears only
/// when the upstream has data); individual topics missing their post
/// are skipped.
pub fn parse_trending(payload: &Value) -> Result<Vec<TrendingTopic>, FetchError> {
    let topics = payload
        .get("cachedTrendingCategoryTopics")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(parse_topic)
                .take(TRENDING_KEPT)
                .collect()
        })
        .unwrap_or_default();

    Ok(topics)
}

fn parse_topic(value: &Value) -> Option<TrendingTopic> {
    let post = value.get("post")?;
    let created_at = post
        .get("creationDate")
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))?;

    let author = post.get("author");
    Some(TrendingTopic {
        id: value.get("id")?.as_u64()?,
        title: value.get("title")?.as_str()?.to_string(),
        content_preview: post
            .get("contentPreview")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        author: author
            .and_then(|a| a.get("username"))
            .and_then(Value::as_str)
            .unwrap_or("Anonymous")
            .to_string(),
        author_avatar: author
            .and_then(|a| a.pointer("/profile/userAvatar"))
            .and_then(Value::as_str)
            .map(String::from),
        author_active: author
            .and_then(|a| a.get("isActive"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_payload() -> Value {
        json!({
            "totalSolved": 250,
            "totalQuestions": 3000,
            "easySolved": 120,
            "totalEasy": 700,
            "mediumSolved": 100,
            "totalMedium": 1500,
            "hardSolved": 30,
            "totalHard": 800,
            "ranking": 54321,
            "contributionPoint": 120,
            "reputation": 15,
            "totalSubmissions": [
                {"difficulty": "All", "count": 250, "submissions": 600},
                {"difficulty": "Easy", "count": 120, "submissions": 200},
                {"difficulty": "Medium", "count": 100, "submissions": 300},
                {"difficulty": "Hard", "count": 30, "submissions": 100}
            ],
            "recentSubmissions": [
                {"title": "Two Sum", "titleSlug": "two-sum", "timestamp": "1706745600",
                 "statusDisplay": "Accepted", "lang": "rust"},
                {"title": "Add Two Numbers", "titleSlug": "add-two-numbers", "timestamp": "1706659200",
                 "statusDisplay": "Wrong Answer", "lang": "python3"},
                {"title": "LRU Cache", "titleSlug": "lru-cache", "timestamp": "1706572800",
                 "statusDisplay": "Accepted", "lang": "rust"},
                {"title": "Word Break", "titleSlug": "word-break", "timestamp": "1706486400",
                 "statusDisplay": "Accepted", "lang": "rust"},
                {"title": "Coin Change", "titleSlug": "coin-change", "timestamp": "1706400000",
                 "statusDisplay": "Accepted", "lang": "rust"}
            ]
        })
    }

    #[test]
    fn test_parse_problem_stats() {
        let stats = parse_problem_stats(&profile_payload()).unwrap();

        assert_eq!(stats.total_solved, 250);
        assert_eq!(stats.total_questions, 3000);
        assert_eq!(stats.ranking, 54321);
        assert_eq!(stats.easy.solved, 120);
        assert_eq!(stats.easy.submissions, 200);
        assert_eq!(stats.medium.submissions, 300);
        assert_eq!(stats.hard.total, 800);
        // Truncated to the four most recent
        assert_eq!(stats.recent_submissions.len(), 4);
        assert_eq!(stats.recent_submissions[0].title, "Two Sum");
        assert_eq!(stats.recent_submissions[1].status, "Wrong Answer");
    }

    #[test]
    fn test_missing_total_solved_is_malformed() {
        let mut payload = profile_payload();
        payload.as_object_mut().unwrap().remove("totalSolved");

        let err = parse_problem_stats(&payload).unwrap_err();
        assert_eq!(err, FetchError::MalformedData("totalSolved"));
    }

    #[test]
    fn test_zero_solved_is_valid_not_malformed() {
        // Zero is a legitimate stat value; only absence is an error
        let payload = json!({"totalSolved": 0, "totalQuestions": 3000});
        let stats = parse_problem_stats(&payload).unwrap();
        assert_eq!(stats.total_solved, 0);
        assert_eq!(stats.easy.solved, 0);
        assert!(stats.recent_submissions.is_empty());
    }

    #[test]
    fn test_oversized_counts_saturate() {
        let payload = json!({
            "totalSolved": 10_000_000_000u64,
            "totalQuestions": 3000,
            "ranking": u64::MAX
        });
        let stats = parse_problem_stats(&payload).unwrap();

        assert_eq!(stats.total_solved, u32::MAX);
        assert_eq!(stats.total_questions, 3000);
        assert_eq!(stats.ranking, u32::MAX);
    }

    #[test]
    fn test_parse_profile() {
        let payload = json!({
            "username": "shellpy03",
            "name": "Shell Py",
            "birthday": null,
            "avatar": "https://assets.leetcode.com/users/shellpy03/avatar.png",
            "ranking": 54321,
            "reputation": 15,
            "gitHub": "https://github.com/ashavijit",
            "twitter": "",
            "linkedIN": null,
            "website": ["avijitsarkar.dev"],
            "country": "India",
            "company": null,
            "school": "JGEC",
            "skillTags": [],
            "about": "I solve problems."
        });

        let profile = parse_profile(&payload).unwrap();

        assert_eq!(profile.username, "shellpy03");
        assert_eq!(profile.name, "Shell Py");
        assert_eq!(profile.ranking, 54321);
        assert_eq!(profile.github.as_deref(), Some("https://github.com/ashavijit"));
        // Empty and null links normalize away
        assert_eq!(profile.twitter, None);
        assert_eq!(profile.linkedin, None);
        assert_eq!(profile.website.as_deref(), Some("avijitsarkar.dev"));
        assert_eq!(profile.country.as_deref(), Some("India"));
        assert_eq!(profile.company, None);
        assert_eq!(profile.about.as_deref(), Some("I solve problems."));
    }

    #[test]
    fn test_parse_profile_name_falls_back_to_username() {
        let payload = json!({"username": "shellpy03", "name": ""});
        let profile = parse_profile(&payload).unwrap();
        assert_eq!(profile.name, "shellpy03");
        assert_eq!(profile.website, None);
    }

    #[test]
    fn test_parse_profile_missing_username_is_malformed() {
        let payload = json!({"name": "Shell Py"});
        let err = parse_profile(&payload).unwrap_err();
        assert_eq!(err, FetchError::MalformedData("username"));
    }

    #[test]
    fn test_parse_skill_stats_ranks_and_truncates() {
        let payload = json!({
            "data": {"matchedUser": {"tagProblemCounts": {
                "advanced": [
                    {"tagName": "Dynamic Programming", "tagSlug": "dynamic-programming", "problemsSolved": 40},
                    {"tagName": "Union Find", "tagSlug": "union-find", "problemsSolved": 5},
                    {"tagName": "Trie", "tagSlug": "trie", "problemsSolved": 8},
                    {"tagName": "Segment Tree", "tagSlug": "segment-tree", "problemsSolved": 3},
                    {"tagName": "Monotonic Stack", "tagSlug": "monotonic-stack", "problemsSolved": 12},
                    {"tagName": "Topological Sort", "tagSlug": "topological-sort", "problemsSolved": 6},
                    {"tagName": "Shortest Path", "tagSlug": "shortest-path", "problemsSolved": 9}
                ],
                "intermediate": [
                    {"tagName": "Hash Table", "tagSlug": "hash-table", "problemsSolved": 80}
                ],
                "fundamental": []
            }}}
        });

        let skills = parse_skill_stats(&payload).unwrap();

        assert_eq!(skills.advanced.len(), 6);
        assert_eq!(skills.advanced[0].tag_name, "Dynamic Programming");
        assert_eq!(skills.advanced[1].tag_name, "Monotonic Stack");
        assert_eq!(skills.intermediate.len(), 1);
        assert!(skills.fundamental.is_empty());
    }

    #[test]
    fn test_missing_tag_counts_is_malformed() {
        let payload = json!({"data": {"matchedUser": null}});
        let err = parse_skill_stats(&payload).unwrap_err();
        assert_eq!(err, FetchError::MalformedData("tagProblemCounts"));
    }

    #[test]
    fn test_parse_trending() {
        let payload = json!({
            "cachedTrendingCategoryTopics": [
                {"id": 100, "title": "Meta interview experience", "post": {
                    "id": 1, "creationDate": 1706745600,
                    "contentPreview": "I interviewed at...",
                    "author": {"username": "coder1", "isActive": true,
                               "profile": {"userAvatar": "https://example.com/a.png"}}
                }},
                {"id": 101, "title": "No author topic", "post": {
                    "id": 2, "creationDate": 1706659200,
                    "contentPreview": "Anonymous post"
                }}
            ]
        });

        let topics = parse_trending(&payload).unwrap();

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].author, "coder1");
        assert!(topics[0].author_active);
        assert_eq!(topics[1].author, "Anonymous");
        assert_eq!(topics[1].author_avatar, None);
    }

    #[test]
    fn test_parse_trending_missing_cache_is_empty() {
        let topics = parse_trending(&json!({})).unwrap();
        assert!(topics.is_empty());
    }
}
