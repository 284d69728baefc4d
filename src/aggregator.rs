//! The profile aggregator.
//!
//! Orchestrates the independent upstream fetches, normalizes their
//! results into the view model, and keeps each section's lifecycle
//! isolated: one source failing never blanks a sibling section. Only
//! the profile load is page-blocking, because every other section
//! needs a valid handle context to make sense.
//!
//! Fetching and applying are split on purpose: the async `load_*`
//! operations fetch and then hand the result to a synchronous apply
//! step that owns all view-model mutation. The apply step is where the
//! ordering rules live (notably stale-response discarding for the
//! repository detail slot).

use crate::error::FetchError;
use crate::models::{
    CommitRecord, DifficultyStats, LanguageHistogram, LeetCodeProfile, ProfileSummary, Quote,
    RepositoryDetail, RepositoryRecord, Section, SkillTagGroup, TrendingTopic, ViewModel,
    WeekActivity,
};
use crate::sources::{GitHubClient, LeetCodeClient, QuoteClient};
use crate::stats::language_histogram;
use tracing::{debug, info, warn};

/// Page sizes and handles the aggregator operates with.
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    /// GitHub username to aggregate.
    pub github_handle: String,
    /// Problem-tracking username to aggregate.
    pub leetcode_handle: String,
    /// Size of the display page of repositories.
    pub repos_per_page: u32,
    /// Size of the fuller page used for the language histogram.
    pub histogram_per_page: u32,
    /// Number of recent commits per repository.
    pub commits_per_page: u32,
    /// Whether the initial snapshot includes a quote.
    pub include_quote: bool,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            github_handle: String::new(),
            leetcode_handle: String::new(),
            repos_per_page: 6,
            histogram_per_page: 100,
            commits_per_page: 5,
            include_quote: true,
        }
    }
}

/// Resolve a fetch result into a section state, logging failures.
///
/// Malformed payloads are logged distinctly from upstream failures so
/// the two are separable in diagnostics, even though they render the
/// same way.
fn resolve_section<T>(name: &str, result: Result<T, FetchError>) -> Section<T> {
    match result {
        Ok(value) => Section::Loaded(value),
        Err(err) => {
            match &err {
                FetchError::MalformedData(field) => {
                    warn!("{} payload malformed: missing {}", name, field)
                }
                other => warn!("{} fetch failed: {}", name, other),
            }
            Section::Error(err)
        }
    }
}

/// Composes the upstream sources into one eventually-consistent view
/// model. Single logical writer; every operation mutates exactly one
/// section (the profile load owns both the profile and repository
/// sections, which load and fail together).
pub struct ProfileAggregator {
    github: GitHubClient,
    leetcode: LeetCodeClient,
    quotes: QuoteClient,
    options: AggregatorOptions,
    view: ViewModel,
    /// Monotonic token for detail requests; responses carrying an older
    /// token are stale and get discarded.
    detail_seq: u64,
    /// The repository currently selected for commits/detail, kept so
    /// `retry` can re-drive those sections.
    selected: Option<RepositoryRecord>,
}

impl ProfileAggregator {
    pub fn new(
        github: GitHubClient,
        leetcode: LeetCodeClient,
        quotes: QuoteClient,
        options: AggregatorOptions,
    ) -> Self {
        Self {
            github,
            leetcode,
            quotes,
            options,
            view: ViewModel::default(),
            detail_seq: 0,
            selected: None,
        }
    }

    /// Read-only access for the presentation layer.
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Load the full initial snapshot: identity + display repositories,
    /// language histogram, problem stats, skill stats, trending topics,
    /// and a quote, all fetched concurrently; then the first-page
    /// commits once the repository list is known.
    ///
    /// Fails only when the profile bundle fails; every other section
    /// resolves independently.
    pub async fn load_initial(&mut self) -> Result<(), FetchError> {
        info!(
            "Loading profile snapshot for {} / {}",
            self.options.github_handle, self.options.leetcode_handle
        );

        self.view.profile = Section::Loading;
        self.view.repositories = Section::Loading;
        self.view.languages = Section::Loading;
        if self.has_leetcode() {
            self.view.leetcode_profile = Section::Loading;
            self.view.problem_stats = Section::Loading;
            self.view.skill_stats = Section::Loading;
            self.view.trending = Section::Loading;
        }
        if self.options.include_quote {
            self.view.quote = Section::Loading;
        }

        let (profile, languages, leetcode_profile, problem_stats, skill_stats, trending, quote) =
            futures::join!(
                self.fetch_profile_bundle(),
                self.fetch_languages(),
                self.fetch_leetcode_profile(),
                self.fetch_problem_stats(),
                self.fetch_skill_stats(),
                self.fetch_trending(),
                self.fetch_quote(),
            );

        self.apply_languages(languages);
        if let Some(result) = leetcode_profile {
            self.apply_leetcode_profile(result);
        }
        if let Some(result) = problem_stats {
            self.apply_problem_stats(result);
        }
        if let Some(result) = skill_stats {
            self.apply_skill_stats(result);
        }
        if let Some(result) = trending {
            self.apply_trending(result);
        }
        if let Some(result) = quote {
            self.apply_quote(result);
        }
        self.apply_profile(profile)?;

        // First-page commits once we know the newest repository
        let first = self
            .view
            .repositories
            .loaded()
            .and_then(|repos| repos.first())
            .cloned();
        if let Some(repo) = first {
            self.select_repository(repo).await;
        }

        Ok(())
    }

    async fn fetch_profile_bundle(
        &self,
    ) -> Result<(ProfileSummary, Vec<RepositoryRecord>), FetchError> {
        let profile = self.github.user(&self.options.github_handle).await?;
        let repos = self
            .github
            .repositories(
                &self.options.github_handle,
                self.options.repos_per_page,
                true,
            )
            .await?;
        Ok((profile, repos))
    }

    fn has_leetcode(&self) -> bool {
        !self.options.leetcode_handle.is_empty()
    }

    async fn fetch_leetcode_profile(&self) -> Option<Result<LeetCodeProfile, FetchError>> {
        if !self.has_leetcode() {
            return None;
        }
        Some(self.leetcode.profile(&self.options.leetcode_handle).await)
    }

    async fn fetch_problem_stats(&self) -> Option<Result<DifficultyStats, FetchError>> {
        if !self.has_leetcode() {
            return None;
        }
        Some(self.leetcode.problem_stats(&self.options.leetcode_handle).await)
    }

    async fn fetch_skill_stats(&self) -> Option<Result<SkillTagGroup, FetchError>> {
        if !self.has_leetcode() {
            return None;
        }
        Some(self.leetcode.skill_stats(&self.options.leetcode_handle).await)
    }

    async fn fetch_trending(&self) -> Option<Result<Vec<TrendingTopic>, FetchError>> {
        if !self.has_leetcode() {
            return None;
        }
        Some(self.leetcode.trending_topics().await)
    }

    async fn fetch_quote(&self) -> Option<Result<Quote, FetchError>> {
        if !self.options.include_quote {
            return None;
        }
        Some(self.quotes.random_quote().await)
    }

    async fn fetch_languages(&self) -> Result<LanguageHistogram, FetchError> {
        // Deliberately a second, larger fetch rather than a reuse of the
        // display page: the histogram must cover all repositories and
        // must be able to fail without touching the display list.
        let repos = self
            .github
            .repositories(
                &self.options.github_handle,
                self.options.histogram_per_page,
                false,
            )
            .await?;
        Ok(language_histogram(&repos))
    }

    /// Re-fetch identity and the display page of repositories.
    pub async fn load_profile(&mut self) -> Result<(), FetchError> {
        self.view.profile = Section::Loading;
        self.view.repositories = Section::Loading;
        let result = self.fetch_profile_bundle().await;
        self.apply_profile(result)
    }

    /// Re-fetch the language histogram. Independent failure domain.
    pub async fn load_language_histogram(&mut self) {
        self.view.languages = Section::Loading;
        let result = self.fetch_languages().await;
        self.apply_languages(result);
    }

    /// Fetch recent commits for one repository, replacing the current
    /// list wholesale. On failure the list is cleared (error state),
    /// never left stale.
    pub async fn load_commits(&mut self, repo_name: &str) {
        self.view.commits = Section::Loading;
        let result = self
            .github
            .commits(
                &self.options.github_handle,
                repo_name,
                self.options.commits_per_page,
            )
            .await;
        self.apply_commits(result);
    }

    /// Fetch the commit-activity detail for one repository.
    ///
    /// Responses apply in request order: a response for a superseded
    /// request is discarded on arrival, so the slot always reflects the
    /// most recent selection regardless of network reordering.
    pub async fn load_repository_detail(&mut self, repo: RepositoryRecord) {
        let token = self.begin_detail_request();
        let result = self.github.commit_activity(&repo.full_name).await;
        self.apply_detail(token, repo, result);
    }

    /// Fetch the problem-tracking identity card. Independent failure
    /// domain; a no-op when no problem-tracking handle is configured.
    pub async fn load_leetcode_profile(&mut self) {
        if !self.has_leetcode() {
            return;
        }
        self.view.leetcode_profile = Section::Loading;
        let result = self.leetcode.profile(&self.options.leetcode_handle).await;
        self.apply_leetcode_profile(result);
    }

    /// Fetch aggregate problem-solving stats. Independent failure domain.
    pub async fn load_problem_stats(&mut self) {
        if !self.has_leetcode() {
            return;
        }
        self.view.problem_stats = Section::Loading;
        let result = self.leetcode.problem_stats(&self.options.leetcode_handle).await;
        self.apply_problem_stats(result);
    }

    /// Fetch ranked skill tags. Independent failure domain.
    pub async fn load_skill_stats(&mut self) {
        if !self.has_leetcode() {
            return;
        }
        self.view.skill_stats = Section::Loading;
        let result = self.leetcode.skill_stats(&self.options.leetcode_handle).await;
        self.apply_skill_stats(result);
    }

    /// Fetch trending discussion topics. Independent failure domain.
    pub async fn load_trending_topics(&mut self) {
        if !self.has_leetcode() {
            return;
        }
        self.view.trending = Section::Loading;
        let result = self.leetcode.trending_topics().await;
        self.apply_trending(result);
    }

    /// Fetch a fresh quote, on demand.
    pub async fn refresh_quote(&mut self) {
        self.view.quote = Section::Loading;
        let result = self.quotes.random_quote().await;
        self.apply_quote(result);
    }

    /// User intent: inspect one repository. Drives both the commit list
    /// and the activity detail for it.
    pub async fn select_repository(&mut self, repo: RepositoryRecord) {
        debug!("Selecting repository: {}", repo.name);
        let name = repo.name.clone();
        self.selected = Some(repo.clone());
        self.load_commits(&name).await;
        self.load_repository_detail(repo).await;
    }

    /// User intent: re-run every section load that currently sits in an
    /// error state. A `NotFound` profile is terminal and not retried.
    pub async fn retry(&mut self) -> Result<(), FetchError> {
        if let Some(err) = self.view.profile.error() {
            if *err == FetchError::NotFound {
                return Err(FetchError::NotFound);
            }
            self.load_profile().await?;
        }
        if self.view.languages.is_error() {
            self.load_language_histogram().await;
        }
        if let Some(repo) = self.selected.clone() {
            // Re-drive only the failed half of the selection
            if self.view.commits.is_error() {
                self.load_commits(&repo.name).await;
            }
            if self.view.detail.is_error() {
                self.load_repository_detail(repo).await;
            }
        }
        if self.view.leetcode_profile.is_error() {
            self.load_leetcode_profile().await;
        }
        if self.view.problem_stats.is_error() {
            self.load_problem_stats().await;
        }
        if self.view.skill_stats.is_error() {
            self.load_skill_stats().await;
        }
        if self.view.trending.is_error() {
            self.load_trending_topics().await;
        }
        if self.view.quote.is_error() {
            self.refresh_quote().await;
        }
        Ok(())
    }

    // --- apply side: all view-model mutation happens below ---

    /// Apply the profile bundle. On failure both sections enter the
    /// error state together (no partial population) and the error
    /// propagates: this is the one page-blocking load.
    fn apply_profile(
        &mut self,
        result: Result<(ProfileSummary, Vec<RepositoryRecord>), FetchError>,
    ) -> Result<(), FetchError> {
        match result {
            Ok((profile, repos)) => {
                self.view.profile = Section::Loaded(profile);
                self.view.repositories = Section::Loaded(repos);
                Ok(())
            }
            Err(err) => {
                warn!("profile fetch failed: {}", err);
                self.view.profile = Section::Error(err.clone());
                self.view.repositories = Section::Error(err.clone());
                Err(err)
            }
        }
    }

    fn apply_languages(&mut self, result: Result<LanguageHistogram, FetchError>) {
        self.view.languages = resolve_section("languages", result);
    }

    fn apply_commits(&mut self, result: Result<Vec<CommitRecord>, FetchError>) {
        self.view.commits = resolve_section("commits", result);
    }

    fn apply_leetcode_profile(&mut self, result: Result<LeetCodeProfile, FetchError>) {
        self.view.leetcode_profile = resolve_section("leetcode profile", result);
    }

    fn apply_problem_stats(&mut self, result: Result<DifficultyStats, FetchError>) {
        self.view.problem_stats = resolve_section("problem stats", result);
    }

    fn apply_skill_stats(&mut self, result: Result<SkillTagGroup, FetchError>) {
        self.view.skill_stats = resolve_section("skill stats", result);
    }

    fn apply_trending(&mut self, result: Result<Vec<TrendingTopic>, FetchError>) {
        self.view.trending = resolve_section("trending", result);
    }

    fn apply_quote(&mut self, result: Result<Quote, FetchError>) {
        self.view.quote = resolve_section("quote", result);
    }

    /// Start a detail request: bump the sequence token and mark the
    /// slot as loading. The returned token must accompany the response.
    fn begin_detail_request(&mut self) -> u64 {
        self.detail_seq += 1;
        self.view.detail = Section::Loading;
        self.detail_seq
    }

    /// Apply a detail response. A token older than the latest request
    /// means a newer selection superseded this one; the response is
    /// dropped so the slot only ever reflects the last selection.
    fn apply_detail(
        &mut self,
        token: u64,
        repo: RepositoryRecord,
        result: Result<Vec<WeekActivity>, FetchError>,
    ) {
        if token != self.detail_seq {
            debug!("Discarding stale detail response for {}", repo.name);
            return;
        }

        self.view.detail = resolve_section(
            "repository detail",
            result.map(|commit_activity| RepositoryDetail {
                repo,
                commit_activity,
            }),
        );
    }
}
