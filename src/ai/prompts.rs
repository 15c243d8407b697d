//! Prompt templates for each assistant operation.

use chrono::Local;

use crate::data::{
    CommitOptions, CommitRecord, PrAnalysis, PrTemplate, ReviewOptions, SummaryFormat,
    SummaryOptions,
};
use crate::git::short_hash;
use crate::utils::truncate_str;

/// Diff bytes included in a PR prompt before truncation.
pub const PR_DIFF_LIMIT: usize = 8000;

/// Commits listed in a PR prompt.
pub const PR_COMMIT_LIMIT: usize = 10;

const CONVENTIONAL_RULES: &str = r#"1. Use conventional commit format: <type>(<scope>): <subject>
2. Types: feat, fix, docs, style, refactor, test, chore, perf, ci, build
3. Subject line max 50 characters
4. Use present tense ("add" not "added")
5. No period at the end of subject
6. Include body if changes are complex (wrap at 72 chars)
7. Include footer for breaking changes or issue references
"#;

const FREEFORM_RULES: &str = r#"1. Subject line max 50 characters
2. Use imperative mood ("Add feature" not "Added feature")
3. Capitalize the subject line
4. No period at the end
5. Include body if needed (wrap at 72 chars)
"#;

const PR_JSON_SHAPE: &str = r#"Respond with a JSON object containing:
{
  "title": "PR title",
  "summary": "Brief summary paragraph",
  "changes": ["change 1", "change 2", ...],
  "testing": "Testing instructions",
  "breaking_changes": ["breaking change 1", ...] // empty array if none
}
"#;

const SUMMARY_JSON_SHAPE: &str = r#"Respond with a JSON object containing:
{
  "title": "Short headline",
  "description": "Summary paragraph",
  "groups": {"feat": [{"hash": "abc1234", "type": "feat", "scope": "", "subject": "..."}]}
}
"#;

fn push_fenced(prompt: &mut String, lang: &str, body: &str) {
    prompt.push_str("```");
    prompt.push_str(lang);
    prompt.push('\n');
    prompt.push_str(body);
    prompt.push_str("\n```\n\n");
}

fn push_commit_line(prompt: &mut String, commit: &CommitRecord) {
    prompt.push_str(&format!("- {}: {}\n", short_hash(&commit.hash), commit.message));
}

/// Prompt for a commit message describing `diff`.
pub fn commit_message_prompt(diff: &str, options: &CommitOptions) -> String {
    let mut prompt = String::from(
        "Analyze the following git diff and generate a concise, conventional commit message.\n\n",
    );

    prompt.push_str("Rules:\n");
    prompt.push_str(if options.conventional {
        CONVENTIONAL_RULES
    } else {
        FREEFORM_RULES
    });

    if let Some(commit_type) = options.commit_type.as_deref().filter(|t| !t.is_empty()) {
        prompt.push_str(&format!("\nCommit type must be: {commit_type}\n"));
    }
    if let Some(scope) = options.scope.as_deref().filter(|s| !s.is_empty()) {
        prompt.push_str(&format!("Scope must be: {scope}\n"));
    }

    prompt.push_str("\nDiff:\n");
    push_fenced(&mut prompt, "", diff);
    prompt.push_str(
        "Generate the commit message (respond with ONLY the commit message, no explanations):",
    );
    prompt
}

/// Prompt for a summary of `commits`.
pub fn summary_prompt(commits: &[CommitRecord], options: &SummaryOptions) -> String {
    let mut prompt = String::from("Summarize the following git commits ");
    if options.changelog {
        prompt.push_str("in changelog format.\n\n");
        prompt.push_str("Format the output as a proper changelog entry with:\n");
        prompt.push_str("- Version header\n");
        prompt.push_str(&format!("- Date ({})\n", Local::now().format("%Y-%m-%d")));
        prompt.push_str("- Grouped changes by type (Features, Bug Fixes, etc.)\n");
        prompt.push_str("- Clear, user-facing descriptions\n\n");
    } else {
        prompt.push_str("in a clear, concise manner.\n\n");
        if options.group_by_type {
            prompt.push_str("Group commits by their type (feat, fix, docs, etc.).\n");
        }
    }

    prompt.push_str("Commits:\n\n");
    for commit in commits {
        push_commit_line(&mut prompt, commit);
    }

    match options.format {
        SummaryFormat::Markdown => prompt.push_str("\nFormat the summary as markdown.\n"),
        SummaryFormat::Json => {
            prompt.push('\n');
            prompt.push_str(SUMMARY_JSON_SHAPE);
        }
        SummaryFormat::Text => {}
    }

    prompt.push_str("\nGenerate the summary:");
    prompt
}

/// Prompt for a structured code review of `diff`.
pub fn review_prompt(diff: &str, options: &ReviewOptions) -> String {
    let mut prompt =
        String::from("Review the following code changes and provide constructive feedback.\n\n");

    prompt.push_str("Focus on:\n");
    prompt.push_str("1. Potential bugs or errors\n");
    prompt.push_str("2. Code quality and best practices\n");
    prompt.push_str("3. Readability and maintainability\n");
    let mut item = 4;
    if options.security {
        prompt.push_str(&format!("{item}. Security vulnerabilities (PRIORITY)\n"));
        item += 1;
    }
    if options.performance {
        prompt.push_str(&format!(
            "{item}. Performance issues and optimization opportunities (PRIORITY)\n"
        ));
        item += 1;
    }
    if !options.focus_areas.is_empty() {
        prompt.push_str(&format!(
            "{item}. Specific areas: {}\n",
            options.focus_areas.join(", ")
        ));
    }

    prompt.push_str("\nProvide:\n");
    prompt.push_str("- Summary of the changes\n");
    prompt.push_str("- List of issues found (if any)\n");
    prompt.push_str("- Suggestions for improvement\n");
    if options.security {
        prompt.push_str("- Security risks and mitigations\n");
    }
    if options.performance {
        prompt.push_str("- Performance concerns and solutions\n");
    }

    prompt.push_str("\nCode changes:\n");
    push_fenced(&mut prompt, "diff", diff);
    prompt.push_str("Provide a structured review using markdown headers (e.g., ## Summary, ## Issues, ## Suggestions, ## Security Risks, ## Performance Issues):");
    prompt
}

/// Prompt for a pull request description.
///
/// At most [`PR_COMMIT_LIMIT`] commits are listed and the diff is cut at
/// [`PR_DIFF_LIMIT`] bytes.
pub fn pr_description_prompt(analysis: &PrAnalysis) -> String {
    let mut prompt = String::from(
        "Generate a comprehensive Pull Request description based on the following information.\n\n",
    );

    prompt.push_str("Branch Information:\n");
    prompt.push_str(&format!("- Current Branch: {}\n", analysis.current_branch));
    prompt.push_str(&format!("- Target Branch: {}\n", analysis.target_branch));
    prompt.push_str(&format!("- Platform: {}\n", analysis.platform.as_str()));
    if !analysis.issue_numbers.is_empty() {
        prompt.push_str(&format!(
            "- Related Issues: {}\n",
            analysis.issue_numbers.join(", ")
        ));
    }
    if analysis.is_draft {
        prompt.push_str("- Status: draft, work in progress\n");
    }

    prompt.push_str("\nCommits in this branch:\n");
    for commit in analysis.commits.iter().take(PR_COMMIT_LIMIT) {
        push_commit_line(&mut prompt, commit);
    }
    if analysis.commits.len() > PR_COMMIT_LIMIT {
        prompt.push_str(&format!(
            "... and {} more commits\n",
            analysis.commits.len() - PR_COMMIT_LIMIT
        ));
    }

    prompt.push_str("\nGenerate a PR description with the following structure:\n");
    prompt.push_str("1. **Title**: Concise, descriptive title (50 chars max)\n");
    prompt.push_str("2. **Summary**: Brief overview of what this PR accomplishes\n");
    prompt.push_str("3. **Changes**: Bullet points of key changes made\n");
    prompt.push_str("4. **Testing**: How the changes should be tested\n");
    prompt.push_str("5. **Breaking Changes**: Any breaking changes (if applicable)\n\n");

    prompt.push_str("Requirements:\n");
    prompt.push_str("- Use clear, professional language\n");
    prompt.push_str("- Focus on business value and impact\n");
    prompt.push_str("- Include technical details where relevant\n");
    prompt.push_str("- Mention any dependencies or requirements\n");
    prompt.push_str(&format!(
        "- Use {}-specific formatting\n",
        analysis.platform.display_name()
    ));
    prompt.push_str(&format!(
        "- Use '{} #issue' for issue linking\n",
        analysis.platform.closing_keyword()
    ));
    match analysis.template {
        PrTemplate::Minimal => prompt.push_str("- Keep the description short: title, summary and key changes only\n"),
        PrTemplate::Detailed => prompt.push_str("- Be thorough: explain the motivation and the technical approach\n"),
        PrTemplate::Standard => {}
    }

    prompt.push_str("\nCode changes:\n");
    let diff = truncate_str(&analysis.diff, PR_DIFF_LIMIT);
    if diff.len() < analysis.diff.len() {
        push_fenced(&mut prompt, "diff", &format!("{diff}\n... (diff truncated for brevity)"));
    } else {
        push_fenced(&mut prompt, "diff", diff);
    }

    prompt.push_str(PR_JSON_SHAPE);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Platform;

    fn commit(n: usize) -> CommitRecord {
        CommitRecord {
            hash: format!("{n:040x}"),
            author: "Dev".to_string(),
            date: "2024-03-01".to_string(),
            message: format!("feat: change {n}"),
        }
    }

    fn analysis() -> PrAnalysis {
        PrAnalysis {
            current_branch: "feature/1234-login".to_string(),
            target_branch: "main".to_string(),
            diff: "+fn login() {}".to_string(),
            commits: vec![commit(1)],
            issue_numbers: vec!["1234".to_string()],
            platform: Platform::Github,
            template: PrTemplate::Standard,
            is_draft: false,
        }
    }

    #[test]
    fn commit_prompt_conventional_rules() {
        let options = CommitOptions {
            commit_type: Some("fix".to_string()),
            scope: Some("api".to_string()),
            conventional: true,
        };
        let prompt = commit_message_prompt("+x", &options);
        assert!(prompt.contains("<type>(<scope>): <subject>"));
        assert!(prompt.contains("Commit type must be: fix\n"));
        assert!(prompt.contains("Scope must be: api\n"));
        assert!(prompt.contains("```\n+x\n```"));
        assert!(prompt.ends_with("no explanations):"));
    }

    #[test]
    fn commit_prompt_freeform_rules() {
        let options = CommitOptions {
            conventional: false,
            ..CommitOptions::default()
        };
        let prompt = commit_message_prompt("+x", &options);
        assert!(prompt.contains("Capitalize the subject line"));
        assert!(!prompt.contains("Commit type must be"));
    }

    #[test]
    fn review_prompt_numbering_follows_flags() {
        let options = ReviewOptions {
            focus_areas: vec!["security".to_string(), "naming".to_string()],
            security: false,
            performance: true,
        };
        let prompt = review_prompt("-a\n+b", &options);
        assert!(prompt.contains("4. Performance issues"));
        assert!(prompt.contains("5. Specific areas: security, naming"));
        assert!(!prompt.contains("Security vulnerabilities"));
        assert!(prompt.contains("```diff\n-a\n+b\n```"));
    }

    #[test]
    fn summary_prompt_lists_short_hashes() {
        let options = SummaryOptions {
            group_by_type: true,
            ..SummaryOptions::default()
        };
        let prompt = summary_prompt(&[commit(255)], &options);
        assert!(prompt.contains("- 0000000: feat: change 255\n"));
        assert!(prompt.contains("Group commits by their type"));
    }

    #[test]
    fn changelog_prompt_has_date() {
        let options = SummaryOptions {
            changelog: true,
            ..SummaryOptions::default()
        };
        let prompt = summary_prompt(&[], &options);
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert!(prompt.contains(&format!("- Date ({today})")));
    }

    #[test]
    fn pr_prompt_limits_commits() {
        let mut analysis = analysis();
        analysis.commits = (0..13).map(commit).collect();
        let prompt = pr_description_prompt(&analysis);
        assert_eq!(prompt.matches(": feat: change").count(), PR_COMMIT_LIMIT);
        assert!(prompt.contains("... and 3 more commits\n"));
        assert!(prompt.contains("- Related Issues: 1234\n"));
    }

    #[test]
    fn pr_prompt_truncates_diff() {
        let mut analysis = analysis();
        analysis.diff = "x".repeat(PR_DIFF_LIMIT + 100);
        let prompt = pr_description_prompt(&analysis);
        assert!(prompt.contains("\n... (diff truncated for brevity)\n```"));
        assert!(!prompt.contains(&"x".repeat(PR_DIFF_LIMIT + 1)));
    }

    #[test]
    fn pr_prompt_gitlab_linking() {
        let mut analysis = analysis();
        analysis.platform = Platform::Gitlab;
        analysis.is_draft = true;
        let prompt = pr_description_prompt(&analysis);
        assert!(prompt.contains("- Use GitLab-specific formatting\n"));
        assert!(prompt.contains("- Use 'Closes #issue' for issue linking\n"));
        assert!(prompt.contains("draft"));
        assert!(prompt.contains("\"breaking_changes\""));
    }
}
