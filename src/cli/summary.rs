//! Summary command: AI summaries and changelogs of recent commits.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::time::Instant;

use super::{release, CommandContext, ANALYSIS_DEADLINE};
use crate::ai::Assistant;
use crate::data::{Summary, SummaryFormat, SummaryOptions};
use crate::git::LogQuery;

/// Summary command options.
#[derive(Parser, Debug)]
pub struct SummaryCommand {
    /// Number of commits to summarize.
    #[arg(short, long, default_value_t = 10)]
    pub number: usize,

    /// Branch to read commits from (default: current).
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Start commit or tag of the range.
    #[arg(short, long)]
    pub from: Option<String>,

    /// End commit or tag of the range.
    #[arg(short, long)]
    pub to: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = SummaryFormat::Text)]
    pub output: SummaryFormat,

    /// Groups commits by conventional type.
    #[arg(short, long)]
    pub group: bool,

    /// Produces a changelog entry.
    #[arg(long)]
    pub changelog: bool,
}

impl SummaryCommand {
    /// Executes the summary command.
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        self.run(context, || context.connect()).await?;
        Ok(())
    }

    fn query(&self) -> LogQuery {
        LogQuery {
            number: Some(self.number),
            branch: self.branch.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }

    /// Runs the summary; `None` when no provider is configured.
    pub(crate) async fn run(
        &self,
        context: &CommandContext,
        connect: impl FnOnce() -> Result<Option<Assistant>>,
    ) -> Result<Option<Summary>> {
        let ui = &context.ui;
        let json = self.output == SummaryFormat::Json;

        let commits = context
            .git
            .log(&self.query())
            .context("failed to get commits")?;
        if commits.is_empty() {
            bail!("no commits found in the specified range");
        }

        let Some(assistant) = connect()? else {
            return Ok(None);
        };

        // JSON output stays machine readable on stdout.
        if !json {
            ui.info(&format!("Found {} commits to summarize", commits.len()));
        }

        let options = SummaryOptions {
            group_by_type: self.group,
            format: self.output,
            changelog: self.changelog,
        };

        let deadline = Instant::now() + ANALYSIS_DEADLINE;
        let spinner = ui.spinner("Summarizing commits");
        let summary = assistant.generate_summary(&commits, &options, deadline).await;
        spinner.stop().await;
        release(&assistant);

        let summary = summary.context("failed to generate summary")?;
        match self.output {
            SummaryFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to encode summary")?
            ),
            SummaryFormat::Markdown => ui.show_summary(&summary, true),
            SummaryFormat::Text => ui.show_summary(&summary, false),
        }
        Ok(Some(summary))
    }
}
