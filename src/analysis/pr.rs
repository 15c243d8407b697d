//! Pull request heuristics derived from the diff and commit list.

use std::sync::LazyLock;

use regex::Regex;

use super::issues::format_issue_links;
use crate::data::{ChecklistItem, CommitRecord, PrAnalysis, PrDescription, PrTemplate};
use crate::normalize::DEFAULT_PR_TITLE;
use crate::utils::capitalize_first;

const BRANCH_PREFIXES: [&str; 7] = [
    "feature/", "feat/", "fix/", "bugfix/", "hotfix/", "chore/", "docs/",
];

const UI_MARKERS: [&str; 10] = [
    ".css", ".scss", ".html", ".jsx", ".tsx", ".vue", "component", "style", "ui/", "frontend/",
];

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{8}").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static TICKET_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4,5}-?").unwrap());

fn touches_tests(diff: &str) -> bool {
    diff.contains("_test.") || diff.contains(".test.")
}

fn touches_docs(diff: &str) -> bool {
    diff.contains("README") || diff.contains(".md")
}

fn touches_dependencies(diff: &str) -> bool {
    ["package.json", "go.mod", "requirements.txt", "Cargo.toml"]
        .iter()
        .any(|manifest| diff.contains(manifest))
}

/// Builds a readable title from a branch name.
///
/// `feature/1234-add-user-login` becomes `Add user login`.
pub fn title_from_branch(branch: &str) -> String {
    let mut title = branch;
    if let Some(rest) = BRANCH_PREFIXES
        .iter()
        .find_map(|prefix| title.strip_prefix(prefix))
    {
        title = rest;
    }
    let title = DATE_TOKEN.replace_all(title, "");
    let title = TICKET_TOKEN.replace_all(&title, "");
    let title = title.replace(['-', '_'], " ");
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    capitalize_first(&title)
}

/// Summary sentence used when the model gives none.
pub fn summary_from_commits(commits: &[CommitRecord]) -> String {
    match commits {
        [] => "No commits found in this branch.".to_string(),
        [only] => format!("This PR contains a single commit: {}", only.message),
        many => format!(
            "This PR contains {} commits with various changes and improvements.",
            many.len()
        ),
    }
}

/// Broad change categories visible in the diff.
pub fn change_categories(diff: &str) -> Vec<String> {
    let mut changes = Vec::new();
    if diff.contains("+++ /dev/null") {
        changes.push("\u{1f5d1}\u{fe0f} Removed files");
    }
    if diff.contains("--- /dev/null") {
        changes.push("\u{1f4c4} Added new files");
    }
    if touches_dependencies(diff) {
        changes.push("\u{1f4e6} Updated dependencies");
    }
    if touches_tests(diff) || diff.contains("spec.") {
        changes.push("\u{1f9ea} Updated tests");
    }
    if touches_docs(diff) {
        changes.push("\u{1f4da} Updated documentation");
    }
    if diff.contains(".css") || diff.contains(".scss") || diff.contains("style") {
        changes.push("\u{1f3a8} Updated styles");
    }
    if changes.is_empty() {
        changes.push("\u{1f527} Modified existing functionality");
    }
    changes.into_iter().map(String::from).collect()
}

/// Testing advice derived from what the diff touches.
pub fn testing_notes(diff: &str) -> String {
    if touches_tests(diff) {
        "\u{2705} Tests have been updated to cover the changes".to_string()
    } else if touches_dependencies(diff) {
        "\u{1f504} Run tests after installing new dependencies".to_string()
    } else {
        "\u{1f9ea} Manual testing recommended for the modified functionality".to_string()
    }
}

/// Default reviewer checklist.
pub fn default_checklist(diff: &str) -> Vec<ChecklistItem> {
    let mut checklist = vec![
        ChecklistItem::new("Code follows project style guidelines", false),
        ChecklistItem::new("Self-review of code has been performed", false),
    ];
    if touches_tests(diff) {
        checklist.push(ChecklistItem::new("Tests pass locally", false));
    } else {
        checklist.push(ChecklistItem::new("Tests have been added/updated", false));
    }
    if touches_docs(diff) {
        checklist.push(ChecklistItem::new("Documentation has been updated", true));
    } else {
        checklist.push(ChecklistItem::new("Documentation updated if needed", false));
    }
    checklist
}

/// Breaking changes announced by commits or suggested by interface edits.
///
/// Only added or removed lines are inspected for `export` and
/// `public interface`, so diff context does not trigger it.
pub fn detect_breaking_changes(commits: &[CommitRecord], diff: &str) -> Vec<String> {
    let mut breaking: Vec<String> = commits
        .iter()
        .filter(|c| {
            let lower = c.message.to_lowercase();
            lower.contains("breaking change") || lower.contains("breaking:")
        })
        .map(|c| c.message.clone())
        .collect();

    let touches_interface = diff.lines().any(|line| {
        let changed = (line.starts_with('+') && !line.starts_with("+++"))
            || (line.starts_with('-') && !line.starts_with("---"));
        changed && (line.contains("public interface") || line.contains("export "))
    });
    if touches_interface {
        breaking.push("Modified public interfaces - review for compatibility".to_string());
    }
    breaking
}

/// Returns true when the diff touches UI files.
pub fn needs_screenshots(diff: &str) -> bool {
    let lower = diff.to_lowercase();
    UI_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Completes a model-produced description with local knowledge.
///
/// Model output wins where present; empty fields fall back to heuristics.
/// Issue links, checklist, screenshot reminder and platform always come from
/// the local analysis.
pub fn complete_description(mut description: PrDescription, analysis: &PrAnalysis) -> PrDescription {
    if description.title.trim().is_empty() || description.title == DEFAULT_PR_TITLE {
        let from_branch = title_from_branch(&analysis.current_branch);
        if !from_branch.is_empty() {
            description.title = from_branch;
        }
    }
    if analysis.is_draft && analysis.platform == crate::data::Platform::Gitlab {
        description.title = format!("Draft: {}", description.title);
    }
    if description.summary.trim().is_empty() {
        description.summary = summary_from_commits(&analysis.commits);
    }
    if description.changes.is_empty() {
        description.changes = change_categories(&analysis.diff);
    }
    if description.testing_notes.trim().is_empty() {
        description.testing_notes = testing_notes(&analysis.diff);
    }
    for item in detect_breaking_changes(&analysis.commits, &analysis.diff) {
        if !description.breaking_changes.contains(&item) {
            description.breaking_changes.push(item);
        }
    }
    description.issue_links = format_issue_links(&analysis.issue_numbers, analysis.platform);
    description.checklist = match analysis.template {
        PrTemplate::Minimal => Vec::new(),
        PrTemplate::Standard | PrTemplate::Detailed => default_checklist(&analysis.diff),
    };
    description.screenshots_needed = needs_screenshots(&analysis.diff);
    description.platform = analysis.platform;
    description
}
