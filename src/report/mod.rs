//! Report generation.
//!
//! This module renders the aggregated view model into Markdown or JSON
//! reports.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report, write_report};
