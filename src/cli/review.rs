//! Review command: AI code review of a diff.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::Instant;

use super::{release, CommandContext, ANALYSIS_DEADLINE};
use crate::ai::Assistant;
use crate::analysis::PathFilter;
use crate::data::{ReviewOptions, ReviewResult};
use crate::git::DiffSource;
use crate::utils::preview;

/// Bytes of the diff shown with `--verbose`.
const VERBOSE_PREVIEW: usize = 500;

/// Review command options.
#[derive(Parser, Debug, Default)]
pub struct ReviewCommand {
    /// Reviews staged changes.
    #[arg(long, conflicts_with_all = ["commit", "range", "branch"])]
    pub staged: bool,

    /// Reviews a single commit.
    #[arg(long, value_name = "HASH", conflicts_with_all = ["range", "branch"])]
    pub commit: Option<String>,

    /// Reviews a commit range such as `main..HEAD`.
    #[arg(long, value_name = "RANGE", conflicts_with = "branch")]
    pub range: Option<String>,

    /// Reviews the working tree against a branch.
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Only reviews files matching this glob.
    #[arg(short, long, value_name = "GLOB")]
    pub files: Option<String>,

    /// Applies review.include_patterns and review.exclude_patterns.
    #[arg(long)]
    pub config_filters: bool,

    /// Shows a preview of the diff before reviewing.
    #[arg(short, long)]
    pub verbose: bool,

    /// Focuses on security issues.
    #[arg(long)]
    pub security: bool,

    /// Focuses on performance issues.
    #[arg(long)]
    pub performance: bool,
}

impl ReviewCommand {
    /// Executes the review command.
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        self.run(context, || context.connect()).await?;
        Ok(())
    }

    /// Diff selection and the message announcing it.
    fn source(&self) -> (DiffSource, String) {
        if self.staged {
            return (DiffSource::Staged, "Reviewing staged changes...".to_string());
        }
        if let Some(hash) = &self.commit {
            return (
                DiffSource::Commit(hash.clone()),
                format!("Reviewing commit {hash}..."),
            );
        }
        if let Some(range) = &self.range {
            return (
                DiffSource::Range(range.clone()),
                format!("Reviewing commit range {range}..."),
            );
        }
        if let Some(branch) = &self.branch {
            return (
                DiffSource::Branch(branch.clone()),
                format!("Reviewing changes against branch {branch}..."),
            );
        }
        (DiffSource::Unstaged, "Reviewing unstaged changes...".to_string())
    }

    /// Path filter for the diff; `None` reviews every file.
    ///
    /// `--files` replaces the configured include patterns. Configured
    /// excludes only apply with `--config-filters`.
    fn filter(&self, context: &CommandContext) -> Result<Option<PathFilter>> {
        let review = &context.config.review;
        let (include, exclude) = match (&self.files, self.config_filters) {
            (None, false) => return Ok(None),
            (Some(glob), false) => (vec![glob.clone()], Vec::new()),
            (Some(glob), true) => (vec![glob.clone()], review.exclude_patterns.clone()),
            (None, true) => (
                review.include_patterns.clone(),
                review.exclude_patterns.clone(),
            ),
        };
        PathFilter::new(&include, &exclude)
            .map(Some)
            .context("invalid review file pattern")
    }

    /// Runs the review; `None` when there was nothing to review.
    pub(crate) async fn run(
        &self,
        context: &CommandContext,
        connect: impl FnOnce() -> Result<Option<Assistant>>,
    ) -> Result<Option<ReviewResult>> {
        let ui = &context.ui;
        let (source, announcement) = self.source();
        ui.info(&announcement);

        let raw = context.git.diff(&source).context("failed to get diff")?;
        if raw.is_empty() {
            ui.warning("No changes found to review");
            return Ok(None);
        }

        let diff = match self.filter(context)? {
            Some(filter) => filter.apply(&raw),
            None => raw,
        };
        if diff.trim().is_empty() {
            ui.warning("All changed files were filtered out");
            return Ok(None);
        }

        if self.verbose {
            ui.show_diff(&preview(&diff, VERBOSE_PREVIEW));
        }

        let Some(assistant) = connect()? else {
            return Ok(None);
        };

        ui.info("Sending diff to AI for review...");
        let options = ReviewOptions {
            focus_areas: context.config.review.focus_areas.clone(),
            security: self.security,
            performance: self.performance,
        };

        let deadline = Instant::now() + ANALYSIS_DEADLINE;
        let spinner = ui.spinner("Reviewing");
        let review = assistant.review_code(&diff, &options, deadline).await;
        spinner.stop().await;
        release(&assistant);

        let review = review.context("failed to get code review")?;
        ui.show_review(&review);
        Ok(Some(review))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::test_utils::ConfigurableMockAiClient;
    use crate::cli::test_repo::TestRepo;
    use crate::config::AppConfig;

    fn context_for(repo: &TestRepo) -> CommandContext {
        let mut config = AppConfig::default();
        config.ui.color = false;
        config.review.include_patterns = vec!["*.rs".to_string()];
        config.review.exclude_patterns = vec!["*_test.rs".to_string()];
        CommandContext::new(config, repo.git())
    }

    fn repo_with_changes() -> TestRepo {
        let repo = TestRepo::new();
        repo.commit_file("src/lib.rs", "pub fn a() {}\n", "feat: add a");
        repo.commit_file("src/lib_test.rs", "fn t() {}\n", "test: add t");
        repo.commit_file("notes.md", "first\n", "docs: notes");
        repo.write("src/lib.rs", "pub fn a() { todo!() }\n");
        repo.write("src/lib_test.rs", "fn t() { assert!(true) }\n");
        repo.write("notes.md", "second\n");
        repo
    }

    #[test]
    fn source_selection() {
        let cmd = ReviewCommand::default();
        assert_eq!(cmd.source().0, DiffSource::Unstaged);

        let cmd = ReviewCommand {
            range: Some("main..HEAD".to_string()),
            ..ReviewCommand::default()
        };
        let (source, message) = cmd.source();
        assert_eq!(source, DiffSource::Range("main..HEAD".to_string()));
        assert_eq!(message, "Reviewing commit range main..HEAD...");
    }

    #[tokio::test]
    async fn reviews_filtered_unstaged_diff() {
        let repo = repo_with_changes();
        let context = context_for(&repo);
        let client = ConfigurableMockAiClient::new(vec![Ok(
            "## Summary\nStubbed body.\n## Issues\n- todo! panics at runtime".to_string(),
        )]);
        let prompts = client.prompt_handle();
        let cmd = ReviewCommand {
            security: true,
            config_filters: true,
            ..ReviewCommand::default()
        };

        let review = cmd
            .run(&context, || Ok(Some(Assistant::new(Box::new(client)))))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(review.summary, "Stubbed body.");
        assert_eq!(review.issues.len(), 1);
        let prompt = &prompts.prompts()[0];
        assert!(prompt.contains("src/lib.rs"));
        assert!(!prompt.contains("src/lib_test.rs"));
        assert!(!prompt.contains("notes.md"));
    }

    #[tokio::test]
    async fn files_flag_selects_paths() {
        let repo = repo_with_changes();
        let context = context_for(&repo);
        let client = ConfigurableMockAiClient::repeating("## Summary\nok", 1);
        let prompts = client.prompt_handle();
        let cmd = ReviewCommand {
            files: Some("*.md".to_string()),
            ..ReviewCommand::default()
        };

        cmd.run(&context, || Ok(Some(Assistant::new(Box::new(client)))))
            .await
            .unwrap();

        let prompt = &prompts.prompts()[0];
        assert!(prompt.contains("notes.md"));
        assert!(!prompt.contains("src/lib.rs"));
    }

    #[test]
    fn configured_excludes_need_opt_in() {
        let repo = TestRepo::new();
        let context = context_for(&repo);
        let cmd = ReviewCommand {
            files: Some("*.rs".to_string()),
            ..ReviewCommand::default()
        };
        let filter = cmd.filter(&context).unwrap().unwrap();
        assert!(filter.allows("src/lib_test.rs"));

        let cmd = ReviewCommand {
            config_filters: true,
            ..cmd
        };
        let filter = cmd.filter(&context).unwrap().unwrap();
        assert!(filter.allows("src/lib.rs"));
        assert!(!filter.allows("src/lib_test.rs"));

        assert!(ReviewCommand::default().filter(&context).unwrap().is_none());
    }

    #[tokio::test]
    async fn clean_tree_reviews_nothing() {
        let repo = TestRepo::new();
        repo.commit_file("src/lib.rs", "pub fn a() {}\n", "feat: add a");
        let context = context_for(&repo);

        let result = ReviewCommand::default()
            .run(&context, || panic!("provider must not be built"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn everything_filtered_reviews_nothing() {
        let repo = TestRepo::new();
        repo.commit_file("app.py", "x = 1\n", "feat: app");
        repo.write("app.py", "x = 2\n");
        let context = context_for(&repo);
        let cmd = ReviewCommand {
            config_filters: true,
            ..ReviewCommand::default()
        };

        let result = cmd
            .run(&context, || panic!("provider must not be built"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn default_config_reviews_every_changed_file() {
        let repo = repo_with_changes();
        let mut config = AppConfig::default();
        config.ui.color = false;
        let context = CommandContext::new(config, repo.git());
        let client = ConfigurableMockAiClient::repeating("## Summary\nok", 1);
        let prompts = client.prompt_handle();

        let review = ReviewCommand::default()
            .run(&context, || Ok(Some(Assistant::new(Box::new(client)))))
            .await
            .unwrap();

        assert!(review.is_some());
        assert_eq!(prompts.request_count(), 1);
        let prompt = &prompts.prompts()[0];
        assert!(prompt.contains("src/lib.rs"));
        assert!(prompt.contains("src/lib_test.rs"));
        assert!(prompt.contains("notes.md"));
    }

    #[tokio::test]
    async fn staged_review_reads_index() {
        let repo = TestRepo::new();
        repo.commit_file("src/lib.rs", "pub fn a() {}\n", "feat: add a");
        repo.write("src/new.rs", "pub fn b() {}\n");
        repo.stage_all();
        let context = context_for(&repo);
        let client = ConfigurableMockAiClient::repeating("## Summary\nok", 1);
        let prompts = client.prompt_handle();
        let cmd = ReviewCommand {
            staged: true,
            ..ReviewCommand::default()
        };

        cmd.run(&context, || Ok(Some(Assistant::new(Box::new(client)))))
            .await
            .unwrap();
        assert!(prompts.prompts()[0].contains("src/new.rs"));
    }

    #[test]
    fn conflicting_sources_rejected() {
        use crate::cli::Cli;
        use clap::Parser as _;

        assert!(Cli::try_parse_from(["aig", "review", "--staged", "--commit", "abc"]).is_err());
        assert!(Cli::try_parse_from(["aig", "review", "--range", "a..b", "--branch", "main"]).is_err());
    }
}
