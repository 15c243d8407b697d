//! Issue references in branch names and commit messages.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::data::{CommitRecord, Platform};

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static HASH_REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\d+)").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static KEYWORD_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:fix|fixes|fixed|close|closes|closed|resolve|resolves|resolved)\s+#?(\d+)")
        .unwrap()
});

/// Collects issue numbers referenced by the branch name and commit messages.
///
/// Recognises `#123` and closing keywords followed by a number with or
/// without `#`. The result is deduplicated and sorted numerically.
pub fn extract_issue_numbers(branch: &str, commits: &[CommitRecord]) -> Vec<String> {
    let mut found = BTreeSet::new();
    let texts = std::iter::once(branch).chain(commits.iter().map(|c| c.message.as_str()));
    for text in texts {
        for caps in HASH_REFERENCE
            .captures_iter(text)
            .chain(KEYWORD_REFERENCE.captures_iter(text))
        {
            if let Some(number) = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) {
                found.insert(number);
            }
        }
    }
    found.into_iter().map(|n| n.to_string()).collect()
}

/// Formats issue numbers as closing lines for the platform.
pub fn format_issue_links(issue_numbers: &[String], platform: Platform) -> Vec<String> {
    issue_numbers
        .iter()
        .map(|n| format!("{} #{n}", platform.closing_keyword()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(message: &str) -> CommitRecord {
        CommitRecord {
            hash: "0".repeat(40),
            author: "Dev".to_string(),
            date: "2024-01-01".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn extracts_and_deduplicates() {
        let commits = [
            commit("fix: crash on start (#42)"),
            commit("Fixes #42 and closes #7"),
            commit("resolves 100"),
        ];
        assert_eq!(
            extract_issue_numbers("feature/no-issue", &commits),
            vec!["7", "42", "100"]
        );
    }

    #[test]
    fn branch_reference() {
        assert_eq!(extract_issue_numbers("fix-#15-login", &[]), vec!["15"]);
    }

    #[test]
    fn bare_ticket_number_in_branch_is_not_an_issue() {
        assert!(extract_issue_numbers("feature/1234-login", &[]).is_empty());
    }

    #[test]
    fn links_per_platform() {
        let issues = vec!["3".to_string()];
        assert_eq!(format_issue_links(&issues, Platform::Github), vec!["Fixes #3"]);
        assert_eq!(format_issue_links(&issues, Platform::Gitlab), vec!["Closes #3"]);
    }
}
