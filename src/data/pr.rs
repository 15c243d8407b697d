//! Pull request descriptions and the inputs used to generate them.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::commit::CommitRecord;

/// Code hosting platform the description is formatted for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// GitHub pull requests.
    #[default]
    Github,
    /// GitLab merge requests.
    Gitlab,
    /// Bitbucket pull requests.
    Bitbucket,
}

impl Platform {
    /// Lowercase identifier used in prompts and flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }

    /// Human-readable platform name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Gitlab => "GitLab",
            Self::Bitbucket => "Bitbucket",
        }
    }

    /// Keyword that closes an issue when the request merges.
    pub fn closing_keyword(self) -> &'static str {
        match self {
            Self::Gitlab => "Closes",
            Self::Github | Self::Bitbucket => "Fixes",
        }
    }

    /// Checkbox markers as `(unchecked, checked)`.
    ///
    /// Bitbucket renders no task lists, so it gets glyphs instead.
    pub fn checkboxes(self) -> (&'static str, &'static str) {
        match self {
            Self::Github | Self::Gitlab => ("- [ ]", "- [x]"),
            Self::Bitbucket => ("- \u{2610}", "- \u{2611}"),
        }
    }

    /// The platform suggested next in the `--platform` tip.
    pub fn next(self) -> Self {
        match self {
            Self::Github => Self::Gitlab,
            Self::Gitlab => Self::Bitbucket,
            Self::Bitbucket => Self::Github,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout of the rendered description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PrTemplate {
    /// Summary, changes, testing, checklist, breaking changes and issues.
    #[default]
    Standard,
    /// Summary, changes and related issues only.
    Minimal,
    /// Standard plus the list of commits.
    Detailed,
}

/// One entry of the reviewer checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Checklist text.
    pub text: String,
    /// Whether the box is pre-ticked.
    pub checked: bool,
}

impl ChecklistItem {
    /// Creates a checklist item.
    pub fn new(text: impl Into<String>, checked: bool) -> Self {
        Self {
            text: text.into(),
            checked,
        }
    }
}

/// A generated pull request description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrDescription {
    /// Title line.
    #[serde(default)]
    pub title: String,
    /// Summary paragraph.
    #[serde(default)]
    pub summary: String,
    /// Bullet list of key changes.
    #[serde(default)]
    pub changes: Vec<String>,
    /// Issue closing lines such as `Fixes #12`.
    #[serde(default)]
    pub issue_links: Vec<String>,
    /// How to test the change.
    #[serde(default, alias = "testing")]
    pub testing_notes: String,
    /// Reviewer checklist.
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Breaking changes, empty when there are none.
    #[serde(default)]
    pub breaking_changes: Vec<String>,
    /// Whether UI screenshots should be attached.
    #[serde(default)]
    pub screenshots_needed: bool,
    /// Platform the description is formatted for.
    #[serde(default)]
    pub platform: Platform,
}

/// Everything known locally about a branch before asking the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrAnalysis {
    /// Branch being proposed.
    pub current_branch: String,
    /// Branch it merges into.
    pub target_branch: String,
    /// Diff against the target branch.
    pub diff: String,
    /// Commits on the branch, newest first.
    pub commits: Vec<CommitRecord>,
    /// Referenced issue numbers, deduplicated.
    pub issue_numbers: Vec<String>,
    /// Target platform.
    pub platform: Platform,
    /// Output layout.
    pub template: PrTemplate,
    /// Whether the request is opened as a draft.
    pub is_draft: bool,
}
