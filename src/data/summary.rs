//! Commit range summaries.

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A commit as it appears inside a grouped summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Commit hash.
    #[serde(default)]
    pub hash: String,
    /// Conventional type, `other` when the subject has none.
    #[serde(default, rename = "type")]
    pub commit_type: String,
    /// Conventional scope.
    #[serde(default)]
    pub scope: String,
    /// Subject text without the header.
    #[serde(default)]
    pub subject: String,
}

/// Summary of a range of commits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// One-line title.
    #[serde(default)]
    pub title: String,
    /// Full prose description.
    #[serde(default)]
    pub description: String,
    /// Commits grouped by conventional type.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<CommitSummary>>,
    /// Markdown rendering, when requested.
    #[serde(default)]
    pub markdown: String,
}

/// Output format of the summary command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Plain terminal text.
    #[default]
    Text,
    /// Markdown.
    Markdown,
    /// Pretty-printed JSON.
    Json,
}

/// Options that shape a summary request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Ask the model to group commits by type.
    pub group_by_type: bool,
    /// Requested output format.
    pub format: SummaryFormat,
    /// Produce a changelog entry instead of prose.
    pub changelog: bool,
}
