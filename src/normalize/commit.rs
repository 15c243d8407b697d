//! Commit message parsing and the offline fallback.

use super::json::strip_code_fence;
use crate::analysis::DiffSummary;
use crate::data::{CommitMessage, CommitOptions};
use crate::utils::capitalize_first;

/// Line prefixes that open the footer block.
const FOOTER_MARKERS: [&str; 4] = ["BREAKING CHANGE:", "Fixes #", "Closes #", "Resolves #"];

/// Parses model output into a commit message.
///
/// With `conventional` set, a first line like `feat(api)!: add endpoint` is
/// split into type, scope, breaking marker and subject. Otherwise, or when the
/// first line has no colon, the whole first line is the subject. The remaining
/// lines become the body up to the first footer marker, and the footer after.
pub fn parse_commit_message(text: &str, conventional: bool) -> CommitMessage {
    let text = strip_code_fence(text);
    let lines: Vec<&str> = text.lines().collect();
    let mut message = CommitMessage::default();

    let Some(first) = lines.first().map(|line| line.trim()) else {
        return message;
    };

    match first.split_once(':') {
        Some((head, subject)) if conventional && is_header(head) => {
            let (commit_type, scope, breaking) = split_header(head.trim());
            message.commit_type = commit_type.to_string();
            message.scope = scope.to_string();
            message.breaking = breaking;
            message.subject = subject.trim().to_string();
        }
        _ => message.subject = first.to_string(),
    }

    let rest = lines.get(1..).unwrap_or_default();
    let footer_start = rest
        .iter()
        .position(|line| {
            let line = line.trim_start();
            FOOTER_MARKERS.iter().any(|marker| line.starts_with(marker))
        })
        .unwrap_or(rest.len());
    message.body = trim_block(&rest[..footer_start]);
    message.footer = trim_block(&rest[footer_start..]);

    message.rebuild_full_message();
    message
}

fn trim_block(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

/// A conventional header has a single-word type before any parenthesis.
fn is_header(head: &str) -> bool {
    let commit_type = head.split('(').next().unwrap_or(head).trim();
    !commit_type.is_empty() && !commit_type.contains(char::is_whitespace)
}

/// Splits `type(scope)!` into its parts using the first parenthesis pair.
fn split_header(head: &str) -> (&str, &str, bool) {
    let (head, breaking) = match head.strip_suffix('!') {
        Some(without_bang) => (without_bang, true),
        None => (head, false),
    };
    match (head.find('('), head.strip_suffix(')')) {
        (Some(open), Some(without_close)) if open < without_close.len() => (
            head[..open].trim(),
            without_close[open + 1..].trim(),
            breaking,
        ),
        _ => (head, "", breaking),
    }
}

/// Builds a commit message from the diff alone.
///
/// Used when the provider is rate limited. Never returns a blank message.
pub fn fallback_commit_message(diff: &str, options: &CommitOptions) -> CommitMessage {
    let summary = DiffSummary::from_diff(diff);
    let subject = summary.subject();

    if !options.conventional {
        return CommitMessage::from_parts("", "", capitalize_first(&subject));
    }

    let commit_type = options
        .commit_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| summary.inferred_type());
    let scope = options.scope.as_deref().unwrap_or_default();
    CommitMessage::from_parts(commit_type, scope, subject)
}
