//! Plain-text and markdown rendering of assistant results.
//!
//! Nothing here touches the terminal; [`Ui`](super::Ui) adds colour on top.

use crate::data::{
    ChecklistItem, CommitSummary, Issue, PerformanceIssue, Platform, PrDescription, SecurityRisk,
    Suggestion, Summary,
};

/// Bullets each item as `  • item`, one per line.
pub fn format_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  • {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders checklist items with the platform's checkbox markers.
pub fn format_checklist(items: &[ChecklistItem], platform: Platform) -> String {
    let (empty, checked) = platform.checkboxes();
    items
        .iter()
        .map(|item| {
            let marker = if item.checked { checked } else { empty };
            format!("  {marker} {}", item.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the markdown body of a pull request.
///
/// The title is not part of the body. Issue links come last so hosting
/// platforms pick them up as closing references.
pub fn format_pr_markdown(description: &PrDescription) -> String {
    let mut markdown = String::new();

    if !description.summary.is_empty() {
        markdown.push_str("## Summary\n\n");
        markdown.push_str(&description.summary);
        markdown.push_str("\n\n");
    }

    if !description.changes.is_empty() {
        markdown.push_str("## Changes\n\n");
        for change in &description.changes {
            markdown.push_str(&format!("- {change}\n"));
        }
        markdown.push('\n');
    }

    if !description.testing_notes.is_empty() {
        markdown.push_str("## Testing\n\n");
        markdown.push_str(&description.testing_notes);
        markdown.push_str("\n\n");
    }

    if !description.checklist.is_empty() {
        let (empty, checked) = description.platform.checkboxes();
        markdown.push_str("## Checklist\n\n");
        for item in &description.checklist {
            let marker = if item.checked { checked } else { empty };
            markdown.push_str(&format!("{marker} {}\n", item.text));
        }
        markdown.push('\n');
    }

    if !description.breaking_changes.is_empty() {
        markdown.push_str("## ⚠️ Breaking Changes\n\n");
        for breaking in &description.breaking_changes {
            markdown.push_str(&format!("- {breaking}\n"));
        }
        markdown.push('\n');
    }

    if !description.issue_links.is_empty() {
        markdown.push_str("## Related Issues\n\n");
        for link in &description.issue_links {
            markdown.push_str(&format!("{link}\n"));
        }
    }

    markdown.trim().to_string()
}

/// `[Severity: high, Type: bug] description`
pub fn issue_line(issue: &Issue) -> String {
    format!(
        "[Severity: {}, Type: {}] {}",
        issue.severity, issue.kind, issue.description
    )
}

/// `[Type: style] description`
pub fn suggestion_line(suggestion: &Suggestion) -> String {
    format!("[Type: {}] {}", suggestion.kind, suggestion.description)
}

/// `[Severity: high] description`
pub fn security_line(risk: &SecurityRisk) -> String {
    format!("[Severity: {}] {}", risk.severity, risk.description)
}

/// `[Type: memory] description (Impact: ...)`, without the impact when
/// none was given.
pub fn performance_line(issue: &PerformanceIssue) -> String {
    if issue.impact.is_empty() {
        format!("[Type: {}] {}", issue.kind, issue.description)
    } else {
        format!(
            "[Type: {}] {} (Impact: {})",
            issue.kind, issue.description, issue.impact
        )
    }
}

fn commit_line(commit: &CommitSummary) -> String {
    let scope = if commit.scope.is_empty() {
        String::new()
    } else {
        format!("**{}:** ", commit.scope)
    };
    if commit.hash.is_empty() {
        format!("{scope}{}", commit.subject)
    } else {
        format!("{scope}{} ({})", commit.subject, crate::git::short_hash(&commit.hash))
    }
}

/// Plain terminal rendering of a summary.
pub fn summary_text(summary: &Summary) -> String {
    let mut out = String::new();
    if !summary.title.is_empty() {
        out.push_str(&summary.title);
        out.push_str("\n\n");
    }
    if !summary.description.is_empty() && summary.description != summary.title {
        out.push_str(&summary.description);
        out.push_str("\n\n");
    }
    for (commit_type, commits) in &summary.groups {
        out.push_str(&format!("{commit_type}:\n"));
        for commit in commits {
            let line = commit_line(commit).replace("**", "");
            out.push_str(&format!("  • {line}\n"));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Markdown rendering of a summary.
///
/// A markdown document returned by the model is used as is; otherwise one
/// is built from the title, description and groups.
pub fn summary_markdown(summary: &Summary) -> String {
    if !summary.markdown.trim().is_empty() {
        return summary.markdown.trim().to_string();
    }

    let mut out = String::new();
    if !summary.title.is_empty() {
        out.push_str(&format!("# {}\n\n", summary.title));
    }
    if !summary.description.is_empty() && summary.description != summary.title {
        out.push_str(&summary.description);
        out.push_str("\n\n");
    }
    for (commit_type, commits) in &summary.groups {
        out.push_str(&format!("## {commit_type}\n\n"));
        for commit in commits {
            out.push_str(&format!("- {}\n", commit_line(commit)));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn description(platform: Platform) -> PrDescription {
        PrDescription {
            title: "Add login".to_string(),
            summary: "Adds a login form.".to_string(),
            changes: vec!["Login form".to_string(), "Session cookie".to_string()],
            issue_links: vec!["Fixes #1234".to_string()],
            testing_notes: "Sign in with a test account.".to_string(),
            checklist: vec![
                ChecklistItem::new("Tests added", true),
                ChecklistItem::new("Docs updated", false),
            ],
            breaking_changes: vec!["Session format changed".to_string()],
            screenshots_needed: false,
            platform,
        }
    }

    // --- format_list ---

    #[test]
    fn list_items_are_bulleted() {
        let items = vec!["one".to_string(), "two".to_string()];
        assert_eq!(format_list(&items), "  • one\n  • two");
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert_eq!(format_list(&[]), "");
    }

    // --- format_checklist ---

    #[test]
    fn checklist_uses_task_list_markers() {
        let items = description(Platform::Github).checklist;
        assert_eq!(
            format_checklist(&items, Platform::Github),
            "  - [x] Tests added\n  - [ ] Docs updated"
        );
    }

    #[test]
    fn bitbucket_checklist_uses_glyphs() {
        let items = description(Platform::Bitbucket).checklist;
        assert_eq!(
            format_checklist(&items, Platform::Bitbucket),
            "  - ☑ Tests added\n  - ☐ Docs updated"
        );
    }

    // --- format_pr_markdown ---

    #[test]
    fn pr_markdown_full() {
        insta::assert_snapshot!(format_pr_markdown(&description(Platform::Github)), @r"
        ## Summary

        Adds a login form.

        ## Changes

        - Login form
        - Session cookie

        ## Testing

        Sign in with a test account.

        ## Checklist

        - [x] Tests added
        - [ ] Docs updated

        ## ⚠️ Breaking Changes

        - Session format changed

        ## Related Issues

        Fixes #1234
        ");
    }

    #[test]
    fn pr_markdown_skips_empty_sections() {
        let description = PrDescription {
            summary: "Small fix.".to_string(),
            issue_links: vec!["Closes #7".to_string()],
            platform: Platform::Gitlab,
            ..PrDescription::default()
        };
        assert_eq!(
            format_pr_markdown(&description),
            "## Summary\n\nSmall fix.\n\n## Related Issues\n\nCloses #7"
        );
    }

    #[test]
    fn pr_markdown_empty_description() {
        assert_eq!(format_pr_markdown(&PrDescription::default()), "");
    }

    // --- review lines ---

    #[test]
    fn review_lines() {
        let mut issue = Issue::new("null pointer risk");
        issue.severity = "high".to_string();
        issue.kind = "bug".to_string();
        assert_eq!(
            issue_line(&issue),
            "[Severity: high, Type: bug] null pointer risk"
        );
        assert_eq!(
            suggestion_line(&Suggestion::new("extract helper")),
            "[Type: general] extract helper"
        );
        assert_eq!(
            security_line(&SecurityRisk::new("token logged")),
            "[Severity: medium] token logged"
        );
    }

    #[test]
    fn performance_line_impact_optional() {
        let mut perf = PerformanceIssue::new("quadratic loop");
        assert_eq!(performance_line(&perf), "[Type: general] quadratic loop");
        perf.impact = "slow on large repos".to_string();
        assert_eq!(
            performance_line(&perf),
            "[Type: general] quadratic loop (Impact: slow on large repos)"
        );
    }

    // --- summaries ---

    fn grouped_summary() -> Summary {
        let mut groups = BTreeMap::new();
        groups.insert(
            "feat".to_string(),
            vec![CommitSummary {
                hash: "abc1234def".to_string(),
                commit_type: "feat".to_string(),
                scope: "auth".to_string(),
                subject: "add login".to_string(),
            }],
        );
        groups.insert(
            "fix".to_string(),
            vec![CommitSummary {
                hash: String::new(),
                commit_type: "fix".to_string(),
                scope: String::new(),
                subject: "handle empty input".to_string(),
            }],
        );
        Summary {
            title: "Release notes".to_string(),
            description: "Login and a bug fix.".to_string(),
            groups,
            markdown: String::new(),
        }
    }

    #[test]
    fn summary_text_lists_groups() {
        assert_eq!(
            summary_text(&grouped_summary()),
            "Release notes\n\nLogin and a bug fix.\n\nfeat:\n  • auth: add login (abc1234)\n\nfix:\n  • handle empty input"
        );
    }

    #[test]
    fn summary_markdown_built_from_groups() {
        insta::assert_snapshot!(summary_markdown(&grouped_summary()), @r"
        # Release notes

        Login and a bug fix.

        ## feat

        - **auth:** add login (abc1234)

        ## fix

        - handle empty input
        ");
    }

    #[test]
    fn summary_markdown_prefers_model_document() {
        let summary = Summary {
            title: "ignored".to_string(),
            markdown: "\n# Changelog\n\n- item\n".to_string(),
            ..Summary::default()
        };
        assert_eq!(summary_markdown(&summary), "# Changelog\n\n- item");
    }

    #[test]
    fn summary_description_equal_to_title_not_repeated() {
        let summary = Summary {
            title: "Two fixes".to_string(),
            description: "Two fixes".to_string(),
            ..Summary::default()
        };
        assert_eq!(summary_text(&summary), "Two fixes");
    }
}
