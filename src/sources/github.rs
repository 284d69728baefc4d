//! GitHub REST API client.
//!
//! Fetches identity, repositories, commits, and commit-activity series
//! for a public user. No authentication; GitHub only requires a
//! User-Agent header for anonymous API access.

use crate::error::FetchError;
use crate::models::{CommitRecord, ProfileSummary, RepositoryRecord, WeekActivity};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default public API base.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Wire shape of the user endpoint.
#[derive(Debug, Deserialize)]
struct UserDto {
    login: String,
    name: Option<String>,
    avatar_url: String,
    html_url: String,
    bio: Option<String>,
    location: Option<String>,
    company: Option<String>,
    blog: Option<String>,
    public_repos: u32,
    followers: u32,
    following: u32,
    created_at: DateTime<Utc>,
}

/// Wire shape of one repository-list entry.
#[derive(Debug, Deserialize)]
struct RepoDto {
    name: String,
    full_name: String,
    html_url: String,
    description: Option<String>,
    language: Option<String>,
    stargazers_count: u32,
    forks_count: u32,
    watchers_count: u32,
    open_issues_count: u32,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    fork: bool,
    #[serde(default = "default_visibility")]
    visibility: String,
    #[serde(default)]
    size: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    pushed_at: Option<DateTime<Utc>>,
}

fn default_visibility() -> String {
    "public".to_string()
}

/// Wire shape of one commit-list entry.
#[derive(Debug, Deserialize)]
struct CommitDto {
    sha: String,
    html_url: String,
    commit: CommitInnerDto,
}

#[derive(Debug, Deserialize)]
struct CommitInnerDto {
    message: String,
    author: CommitAuthorDto,
}

#[derive(Debug, Deserialize)]
struct CommitAuthorDto {
    name: String,
    date: DateTime<Utc>,
}

impl From<UserDto> for ProfileSummary {
    fn from(dto: UserDto) -> Self {
        let name = dto.name.unwrap_or_else(|| dto.login.clone());
        ProfileSummary {
            handle: dto.login,
            name,
            avatar_url: dto.avatar_url,
            profile_url: dto.html_url,
            bio: dto.bio,
            location: dto.location,
            company: dto.company,
            blog: dto.blog.filter(|b| !b.is_empty()),
            public_repos: dto.public_repos,
            followers: dto.followers,
            following: dto.following,
            created_at: dto.created_at,
        }
    }
}

impl From<RepoDto> for RepositoryRecord {
    fn from(dto: RepoDto) -> Self {
        RepositoryRecord {
            name: dto.name,
            full_name: dto.full_name,
            html_url: dto.html_url,
            description: dto.description,
            language: dto.language,
            stargazers: dto.stargazers_count,
            forks: dto.forks_count,
            watchers: dto.watchers_count,
            open_issues: dto.open_issues_count,
            topics: dto.topics,
            fork: dto.fork,
            visibility: dto.visibility,
            size_kb: dto.size,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            pushed_at: dto.pushed_at,
        }
    }
}

fn tag_commit(dto: CommitDto, repo_name: &str) -> CommitRecord {
    CommitRecord {
        sha: dto.sha,
        message: dto.commit.message,
        author: dto.commit.author.name,
        date: dto.commit.author.date,
        html_url: dto.html_url,
        repository: repo_name.to_string(),
    }
}

/// Client for the GitHub REST API.
pub struct GitHubClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
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

    /// Fetch identity fields for `handle`.
    ///
    /// The only fetch that distinguishes 404: a missing user is
    /// `NotFound` and page-blocking for the caller.
    pub async fn user(&self, handle: &str) -> Result<ProfileSummary, FetchError> {
        let url = format!("{}/users/{}", self.base_url, handle);
        debug!("Fetching user: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_request)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        let dto: UserDto = response
            .json()
            .await
            .map_err(|_| FetchError::MalformedData("user fields"))?;

        Ok(dto.into())
    }

    /// Fetch one page of repositories for `handle`, newest-updated first
    /// when `sort_updated` is set.
    pub async fn repositories(
        &self,
        handle: &str,
        per_page: u32,
        sort_updated: bool,
    ) -> Result<Vec<RepositoryRecord>, FetchError> {
        let sort = if sort_updated { "sort=updated&" } else { "" };
        let url = format!(
            "{}/users/{}/repos?{}per_page={}",
            self.base_url, handle, sort, per_page
        );
        debug!("Fetching repositories: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_request)?;

        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        let dtos: Vec<RepoDto> = response
            .json()
            .await
            .map_err(|_| FetchError::MalformedData("repository fields"))?;

        Ok(dtos.into_iter().map(RepositoryRecord::from).collect())
    }

    /// Fetch recent commits for one repository, each tagged with the
    /// repository name.
    pub async fn commits(
        &self,
        handle: &str,
        repo_name: &str,
        per_page: u32,
    ) -> Result<Vec<CommitRecord>, FetchError> {
        let url = format!(
            "{}/repos/{}/{}/commits?per_page={}",
            self.base_url, handle, repo_name, per_page
        );
        debug!("Fetching commits: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_request)?;

        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        let dtos: Vec<CommitDto> = response
            .json()
            .await
            .map_err(|_| FetchError::MalformedData("commit fields"))?;

        Ok(dtos
            .into_iter()
            .map(|dto| tag_commit(dto, repo_name))
            .collect())
    }

    /// Fetch the weekly commit-activity series for one repository.
    ///
    /// GitHub answers 202 while it is still computing the statistics;
    /// that is an upstream condition for this section, retryable later.
    pub async fn commit_activity(&self, full_name: &str) -> Result<Vec<WeekActivity>, FetchError> {
        let url = format!("{}/repos/{}/stats/commit_activity", self.base_url, full_name);
        debug!("Fetching commit activity: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_request)?;

        if response.status() == reqwest::StatusCode::ACCEPTED {
            return Err(FetchError::Upstream(
                "commit statistics are still being generated".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        let weeks: Vec<WeekActivity> = response
            .json()
            .await
            .map_err(|_| FetchError::MalformedData("commit activity fields"))?;

        Ok(weeks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_JSON: &str = r#"{
        "login": "ashavijit",
        "id": 1,
        "avatar_url": "https://avatars.githubusercontent.com/u/1",
        "html_url": "https://github.com/ashavijit",
        "name": "Avijit Sarkar",
        "company": null,
        "blog": "",
        "location": "India",
        "bio": "Backend engineer",
        "public_repos": 42,
        "followers": 10,
        "following": 5,
        "created_at": "2019-03-01T10:00:00Z",
        "updated_at": "2024-01-01T10:00:00Z"
    }"#;

    const REPO_JSON: &str = r#"{
        "name": "devdash",
        "full_name": "ashavijit/devdash",
        "html_url": "https://github.com/ashavijit/devdash",
        "description": "A dashboard",
        "fork": false,
        "created_at": "2023-01-01T00:00:00Z",
        "updated_at": "2024-02-01T00:00:00Z",
        "pushed_at": "2024-02-01T00:00:00Z",
        "size": 128,
        "stargazers_count": 9,
        "watchers_count": 9,
        "language": "Rust",
        "forks_count": 2,
        "open_issues_count": 1,
        "topics": ["cli", "dashboard"],
        "visibility": "public"
    }"#;

    const COMMIT_JSON: &str = r#"{
        "sha": "3f786850e387550fdab836ed7e6dc881de23001b",
        "html_url": "https://github.com/ashavijit/devdash/commit/3f78685",
        "commit": {
            "author": {
                "name": "Avijit Sarkar",
                "email": "a@example.com",
                "date": "2024-02-01T12:00:00Z"
            },
            "message": "Add language histogram"
        }
    }"#;

    #[test]
    fn test_user_normalization() {
        let dto: UserDto = serde_json::from_str(USER_JSON).unwrap();
        let profile = ProfileSummary::from(dto);

        assert_eq!(profile.handle, "ashavijit");
        assert_eq!(profile.name, "Avijit Sarkar");
        assert_eq!(profile.location.as_deref(), Some("India"));
        // Empty blog strings normalize away
        assert_eq!(profile.blog, None);
        assert_eq!(profile.public_repos, 42);
    }

    #[test]
    fn test_user_name_falls_back_to_login() {
        let json = USER_JSON.replace(r#""name": "Avijit Sarkar","#, r#""name": null,"#);
        let dto: UserDto = serde_json::from_str(&json).unwrap();
        let profile = ProfileSummary::from(dto);
        assert_eq!(profile.name, "ashavijit");
    }

    #[test]
    fn test_repo_normalization() {
        let dto: RepoDto = serde_json::from_str(REPO_JSON).unwrap();
        let repo = RepositoryRecord::from(dto);

        assert_eq!(repo.name, "devdash");
        assert_eq!(repo.full_name, "ashavijit/devdash");
        assert_eq!(repo.language.as_deref(), Some("Rust"));
        assert_eq!(repo.stargazers, 9);
        assert_eq!(repo.topics, vec!["cli", "dashboard"]);
        assert_eq!(repo.size_kb, 128);
    }

    #[test]
    fn test_repo_missing_optional_fields() {
        // Older API payloads omit topics, visibility, fork, and size
        let json = r#"{
            "name": "old",
            "full_name": "ashavijit/old",
            "html_url": "https://github.com/ashavijit/old",
            "description": null,
            "language": null,
            "stargazers_count": 0,
            "watchers_count": 0,
            "forks_count": 0,
            "open_issues_count": 0,
            "created_at": "2020-01-01T00:00:00Z",
            "updated_at": "2020-06-01T00:00:00Z",
            "pushed_at": null
        }"#;
        let dto: RepoDto = serde_json::from_str(json).unwrap();
        let repo = RepositoryRecord::from(dto);

        assert!(repo.topics.is_empty());
        assert_eq!(repo.visibility, "public");
        assert!(!repo.fork);
        assert_eq!(repo.language, None);
        assert_eq!(repo.pushed_at, None);
    }

    #[test]
    fn test_commit_tagged_with_repository() {
        let dto: CommitDto = serde_json::from_str(COMMIT_JSON).unwrap();
        let commit = tag_commit(dto, "devdash");

        assert_eq!(commit.repository, "devdash");
        assert_eq!(commit.author, "Avijit Sarkar");
        assert_eq!(commit.short_sha(), "3f78685");
        assert_eq!(commit.message, "Add language histogram");
    }

    #[test]
    fn test_week_activity_parses() {
        let json = r#"[{"total": 3, "week": 1706400000, "days": [0,1,0,2,0,0,0]}]"#;
        let weeks: Vec<WeekActivity> = serde_json::from_str(json).unwrap();
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].total, 3);
        assert_eq!(weeks[0].days[3], 2);
    }
}
