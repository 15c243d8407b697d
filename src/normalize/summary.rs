//! Commit summary parsing and local grouping.

use std::collections::BTreeMap;

use super::commit::parse_commit_message;
use super::json::decode_structured;
use crate::data::{CommitRecord, CommitSummary, Summary, SummaryFormat};

/// Group name for commits without a conventional type.
const UNTYPED_GROUP: &str = "other";

/// Parses a summary response.
///
/// JSON with `title`, `description`, `groups` and `markdown` keys is decoded
/// directly. Otherwise the first non-empty line is the title, the whole text
/// the description, and the text doubles as markdown when that format was
/// requested.
pub fn parse_summary(text: &str, format: SummaryFormat) -> Summary {
    if let Some(summary) = decode_structured::<Summary>(text) {
        if !summary.title.is_empty() || !summary.description.is_empty() {
            return summary;
        }
    }

    let text = text.trim();
    Summary {
        title: text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string(),
        description: text.to_string(),
        groups: BTreeMap::new(),
        markdown: if format == SummaryFormat::Markdown {
            text.to_string()
        } else {
            String::new()
        },
    }
}

/// Groups commits by the conventional type in their subject line.
pub fn group_commits(commits: &[CommitRecord]) -> BTreeMap<String, Vec<CommitSummary>> {
    let mut groups: BTreeMap<String, Vec<CommitSummary>> = BTreeMap::new();
    for commit in commits {
        let parsed = parse_commit_message(&commit.message, true);
        let group = if parsed.commit_type.is_empty() {
            UNTYPED_GROUP.to_string()
        } else {
            parsed.commit_type.to_lowercase()
        };
        groups.entry(group.clone()).or_default().push(CommitSummary {
            hash: commit.hash.clone(),
            commit_type: group,
            scope: parsed.scope,
            subject: parsed.subject,
        });
    }
    groups
}
