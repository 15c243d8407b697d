//! Commit command: AI commit messages for staged changes.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::time::Instant;
use tracing::{debug, info};

use super::{release, CommandContext, COMMIT_DEADLINE};
use crate::ai::Assistant;
use crate::data::{CommitMessage, CommitOptions};
use crate::git::extract_commit_details;
use crate::normalize::{fallback_commit_message, parse_commit_message};
use crate::ui::Prompter;

/// Commit command options.
#[derive(Parser, Debug)]
pub struct CommitCommand {
    /// Commit type (feat, fix, docs, style, refactor, test, chore).
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub commit_type: Option<String>,

    /// Commit scope.
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Asks before committing and offers edits.
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

    /// Uses the conventional commit format.
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub conventional: bool,

    /// Pushes after committing.
    #[arg(short, long)]
    pub push: bool,

    /// Shows the staged changes without generating anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// How a commit run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing was staged.
    NoStagedChanges,
    /// `--dry-run` printed the staged diff.
    DryRun,
    /// No API key is configured; setup instructions were printed.
    MissingApiKey,
    /// The user declined the message.
    Cancelled,
    /// A commit was created.
    Committed {
        /// The committed message.
        message: CommitMessage,
        /// Whether a requested push succeeded. `false` when none was requested.
        pushed: bool,
    },
}

impl CommitCommand {
    /// Executes the commit command.
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let prompter = Prompter::new(self.interactive, COMMIT_DEADLINE);
        self.run(context, &prompter, || context.connect()).await?;
        Ok(())
    }

    /// Runs the commit flow with injected input and provider construction.
    pub(crate) async fn run(
        &self,
        context: &CommandContext,
        prompter: &Prompter,
        connect: impl FnOnce() -> Result<Option<Assistant>>,
    ) -> Result<CommitOutcome> {
        let ui = &context.ui;
        let git = &context.git;

        let branch = git.current_branch().unwrap_or_else(|e| {
            debug!(error = %e, "Branch lookup failed");
            ui.warning("Could not get current branch name, proceeding without it.");
            String::new()
        });
        let details = extract_commit_details(&branch);
        debug!(branch = %branch, details = ?details, "Branch details");

        let options = CommitOptions {
            commit_type: self.commit_type.clone().or(details.commit_type),
            scope: self.scope.clone(),
            conventional: self.conventional && context.config.uses_conventional_commits(),
        };

        if context.config.git.auto_stage
            && !git
                .has_staged_changes()
                .context("failed to check staged changes")?
        {
            ui.info("Staging all changes...");
            git.stage_all().context("failed to stage changes")?;
        }

        let diff = git.staged_diff().context("failed to get staged changes")?;
        if diff.is_empty() {
            ui.warning("No staged changes found. Stage your changes with 'git add' first");
            return Ok(CommitOutcome::NoStagedChanges);
        }

        if self.dry_run {
            ui.show_dry_run(&diff);
            return Ok(CommitOutcome::DryRun);
        }

        let Some(assistant) = connect()? else {
            return Ok(CommitOutcome::MissingApiKey);
        };

        let provider = assistant.metadata().provider;
        ui.status("🤖", &format!("Analyzing staged changes with {provider}..."));

        let deadline = Instant::now() + COMMIT_DEADLINE;
        let spinner = ui.spinner("Generating commit message");
        let generated = assistant
            .generate_commit_message(&diff, &options, deadline)
            .await;
        spinner.stop().await;
        release(&assistant);

        let mut message = match generated {
            Ok(message) => message,
            Err(e) if e.is_rate_limit() => {
                info!(error = %e, "Falling back to local commit message");
                ui.warning("API quota exceeded. Falling back to manual mode...");
                let fallback = fallback_commit_message(&diff, &options);
                ui.status("📝", "Generated fallback commit message:");
                ui.show_commit_message(&fallback);
                edit_fallback(prompter, fallback, options.conventional).await
            }
            Err(e) => return Err(e).context("failed to generate commit message"),
        };

        if let Some(ticket) = &details.ticket {
            message.prefix_ticket(ticket);
        }

        ui.show_commit_message(&message);

        if prompter.is_enabled()
            && !prompter
                .confirm("\nUse this commit message? [Y/n]: ", true)
                .await
        {
            ui.info("Commit cancelled");
            return Ok(CommitOutcome::Cancelled);
        }

        git.commit(&message.full_message).context("failed to commit")?;
        ui.success("Commit created successfully!");

        let mut pushed = false;
        if self.push {
            ui.info("Pushing to remote...");
            match git.push() {
                Ok(()) => {
                    ui.success("Pushed to remote successfully!");
                    pushed = true;
                }
                Err(e) => ui.warning(&format!("Failed to push: {e}")),
            }
        }

        Ok(CommitOutcome::Committed { message, pushed })
    }
}

/// Offers to replace the fallback message with one typed by the user.
async fn edit_fallback(
    prompter: &Prompter,
    fallback: CommitMessage,
    conventional: bool,
) -> CommitMessage {
    if !prompter.is_enabled()
        || !prompter
            .confirm("\n✏️  Edit commit message? (y/N): ", false)
            .await
    {
        return fallback;
    }
    match prompter.ask("Enter commit message: ").await {
        Some(custom) if !custom.trim().is_empty() => parse_commit_message(&custom, conventional),
        _ => fallback,
    }
}
