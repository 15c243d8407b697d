//! PR command: pull and merge request descriptions for the current branch.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use tokio::time::Instant;
use tracing::debug;

use super::{release, CommandContext, ANALYSIS_DEADLINE};
use crate::ai::Assistant;
use crate::analysis::extract_issue_numbers;
use crate::data::{Platform, PrAnalysis, PrTemplate};
use crate::git::LogQuery;
use crate::ui::{copy_to_clipboard, edit_in_editor, render, Prompter};

/// Most commits read from the branch range.
const COMMIT_LIMIT: usize = 50;

/// PR command options.
#[derive(Parser, Debug)]
pub struct PrCommand {
    /// Target branch (defaults to git.default_branch).
    #[arg(short, long, value_name = "BRANCH")]
    pub target: Option<String>,

    /// Platform to format for.
    #[arg(short, long, value_enum, default_value_t = Platform::Github)]
    pub platform: Platform,

    /// Description layout.
    #[arg(long, value_enum, default_value_t = PrTemplate::Standard)]
    pub template: PrTemplate,

    /// Marks the request as a draft.
    #[arg(short, long)]
    pub draft: bool,

    /// Offers to edit the description.
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub interactive: bool,

    /// Copies the description to the clipboard.
    #[arg(short, long)]
    pub copy: bool,
}

/// Final title and markdown body of a generated description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrOutput {
    /// Request title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Whether the user edited the text.
    pub edited: bool,
}

impl PrCommand {
    /// Executes the PR command.
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let prompter = Prompter::new(self.interactive, ANALYSIS_DEADLINE);
        self.run(context, &prompter, || context.connect(), edit_in_editor)
            .await?;
        Ok(())
    }

    /// Runs the PR flow; `None` when there was nothing to describe.
    pub(crate) async fn run(
        &self,
        context: &CommandContext,
        prompter: &Prompter,
        connect: impl FnOnce() -> Result<Option<Assistant>>,
        edit: impl FnOnce(&str) -> Result<String>,
    ) -> Result<Option<PrOutput>> {
        let ui = &context.ui;
        let git = &context.git;

        let target = self
            .target
            .clone()
            .unwrap_or_else(|| context.config.git.default_branch.clone());
        let current = git
            .current_branch()
            .context("failed to get current branch")?;

        if current == target {
            bail!("current branch ({current}) is the same as target branch ({target})");
        }

        ui.status(
            "🔍",
            &format!("Analyzing changes from {target} to {current}..."),
        );

        let diff = git
            .branch_diff(&target)
            .context("failed to get branch diff")?;
        if diff.is_empty() {
            ui.warning("No differences found between current branch and target branch");
            return Ok(None);
        }

        let commits = git
            .log(&LogQuery {
                number: Some(COMMIT_LIMIT),
                branch: Some(format!("{target}..{current}")),
                ..LogQuery::default()
            })
            .context("failed to get branch commits")?;

        ui.status(
            "📊",
            &format!("Found {} commits and analyzing diff...", commits.len()),
        );

        let issue_numbers = extract_issue_numbers(&current, &commits);
        debug!(issues = ?issue_numbers, "Extracted issue numbers");

        let analysis = PrAnalysis {
            current_branch: current,
            target_branch: target,
            diff,
            commits,
            issue_numbers,
            platform: self.platform,
            template: self.template,
            is_draft: self.draft,
        };

        let Some(assistant) = connect()? else {
            return Ok(None);
        };

        let provider = assistant.metadata().provider;
        ui.status("🤖", &format!("Generating PR description with {provider}..."));

        let deadline = Instant::now() + ANALYSIS_DEADLINE;
        let spinner = ui.spinner("Writing description");
        let description = assistant.generate_pr_description(&analysis, deadline).await;
        spinner.stop().await;
        release(&assistant);

        let description = description.context("failed to generate PR description")?;
        ui.show_pr_description(&description);

        let mut output = PrOutput {
            title: description.title.clone(),
            body: render::format_pr_markdown(&description),
            edited: false,
        };

        if prompter.is_enabled()
            && prompter
                .confirm("\n✏️  Edit PR description? (y/N): ", false)
                .await
        {
            match edit(&join_title(&output.title, &output.body)) {
                Ok(text) => {
                    let (title, body) = split_title(&text, &output.title);
                    output = PrOutput {
                        title,
                        body,
                        edited: true,
                    };
                    println!("\n# {}\n\n{}", output.title, output.body);
                }
                Err(e) => ui.warning(&format!("Failed to edit PR description: {e:#}")),
            }
        }

        if self.copy {
            match copy_to_clipboard(&output.body) {
                Ok(tool) => {
                    debug!(tool, "Copied PR description");
                    ui.status("📋", "PR description copied to clipboard");
                }
                Err(e) => ui.warning(&format!("Failed to copy to clipboard: {e}")),
            }
        }

        ui.success("PR description generated successfully!");
        ui.status(
            "💡",
            &format!(
                "Tip: Use 'aig pr --platform {}' to format for different platforms",
                self.platform.next()
            ),
        );

        Ok(Some(output))
    }
}

/// Editor buffer: the title as a level-one heading above the body.
fn join_title(title: &str, body: &str) -> String {
    format!("# {title}\n\n{body}\n")
}

/// Splits an edited buffer back into title and body.
///
/// The first non-blank line is the title when it is a `# ` heading;
/// otherwise `fallback_title` is kept and the whole text is the body.
fn split_title(text: &str, fallback_title: &str) -> (String, String) {
    let trimmed = text.trim_start();
    let (first, rest) = trimmed.split_once('\n').unwrap_or((trimmed, ""));
    match first.trim_end().strip_prefix("# ") {
        Some(title) if !title.trim().is_empty() => {
            (title.trim().to_string(), rest.trim().to_string())
        }
        _ => (fallback_title.to_string(), text.trim().to_string()),
    }
}
