//! Derived statistics over the fetched data.
//!
//! This module holds the pure computations the renderer relies on:
//! language histograms, percentage normalization, skill-tag ranking,
//! and commit-activity bar heights. No I/O happens here.

use crate::models::{LanguageHistogram, RepositoryRecord, SkillTag, WeekActivity};

/// How many skill tags each tier keeps after ranking.
pub const TOP_SKILL_TAGS: usize = 6;

/// How many weeks of commit activity the renderer shows.
pub const ACTIVITY_WINDOW_WEEKS: usize = 12;

/// Fold repositories into a language -> repository-count histogram.
///
/// Each repository contributes one count for its primary language;
/// repositories without a classified language are skipped.
pub fn language_histogram(repos: &[RepositoryRecord]) -> LanguageHistogram {
    let mut histogram = LanguageHistogram::new();

    for repo in repos {
        if let Some(language) = &repo.language {
            *histogram.entry(language.clone()).or_default() += 1;
        }
    }

    histogram
}

/// Histogram entries sorted by count descending, each with its share of
/// the total as a percentage.
///
/// A zero total yields 0.0 for every entry rather than dividing. Ties
/// are broken by language name so the ordering is deterministic.
pub fn histogram_percentages(histogram: &LanguageHistogram) -> Vec<(String, usize, f64)> {
    let total: usize = histogram.values().sum();

    let mut entries: Vec<(String, usize, f64)> = histogram
        .iter()
        .map(|(language, &count)| {
            let percentage = if total == 0 {
                0.0
            } else {
                (count as f64 / total as f64) * 100.0
            };
            (language.clone(), count, percentage)
        })
        .collect();

    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// The most-used language, if any.
pub fn top_language(histogram: &LanguageHistogram) -> Option<&str> {
    histogram
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(language, _)| language.as_str())
}

/// Rank skill tags descending by solved count and keep the top 6.
///
/// The sort is stable, so tags with equal counts keep the order the
/// upstream payload delivered them in.
pub fn rank_skill_tags(mut tags: Vec<SkillTag>) -> Vec<SkillTag> {
    tags.sort_by(|a, b| b.problems_solved.cmp(&a.problems_solved));
    tags.truncate(TOP_SKILL_TAGS);
    tags
}

/// Bar heights in [0, 100] for the last `ACTIVITY_WINDOW_WEEKS` weeks.
///
/// Each week's total is normalized against the maximum total within the
/// sliced window. An all-zero window yields all-zero heights, never NaN.
pub fn activity_bar_heights(activity: &[WeekActivity]) -> Vec<f64> {
    let start = activity.len().saturating_sub(ACTIVITY_WINDOW_WEEKS);
    let window = &activity[start..];

    let max = window.iter().map(|w| w.total).max().unwrap_or(0);
    if max == 0 {
        return vec![0.0; window.len()];
    }

    window
        .iter()
        .map(|w| (f64::from(w.total) / f64::from(max)) * 100.0)
        .collect()
}
