//! HTTP clients for the upstream data sources.
//!
//! One client per upstream API; each owns its wire DTOs and normalizes
//! them into the shared data model.

pub mod github;
pub mod leetcode;
pub mod quotes;

pub use github::GitHubClient;
pub use leetcode::LeetCodeClient;
pub use quotes::QuoteClient;
