//! CLI interface for aig.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::ai::{is_placeholder_key, Assistant};
use crate::config::{AppConfig, ConfigManager, CONFIG_PATH_ENV};
use crate::git::Git;
use crate::ui::Ui;

pub mod commit;
pub mod config;
pub mod pr;
pub mod review;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_repo;

/// Deadline for commit message generation.
pub const COMMIT_DEADLINE: Duration = Duration::from_secs(30);

/// Deadline for reviews, summaries and PR descriptions.
pub const ANALYSIS_DEADLINE: Duration = Duration::from_secs(60);

/// aig: AI-powered git assistant.
#[derive(Parser)]
#[command(name = "aig")]
#[command(about = "AI-powered git assistant for commits, reviews and pull requests", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, env = CONFIG_PATH_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generates a commit message for staged changes.
    #[command(visible_alias = "c")]
    Commit(commit::CommitCommand),
    /// Reviews changes with AI.
    #[command(visible_alias = "r")]
    Review(review::ReviewCommand),
    /// Summarizes recent commits.
    #[command(visible_alias = "s")]
    Summary(summary::SummaryCommand),
    /// Generates a pull or merge request description.
    #[command(visible_aliases = ["pull-request", "merge-request", "mr"])]
    Pr(pr::PrCommand),
    /// Reads and writes configuration.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        let manager = ConfigManager::resolve(self.config.as_deref())
            .context("failed to locate configuration")?;

        match self.command {
            Commands::Config(cmd) => cmd.execute(&manager),
            Commands::Commit(cmd) => cmd.execute(&CommandContext::load(&manager)?).await,
            Commands::Review(cmd) => cmd.execute(&CommandContext::load(&manager)?).await,
            Commands::Summary(cmd) => cmd.execute(&CommandContext::load(&manager)?).await,
            Commands::Pr(cmd) => cmd.execute(&CommandContext::load(&manager)?).await,
        }
    }
}

/// Configuration, repository and printer shared by the AI commands.
pub struct CommandContext {
    /// Loaded configuration with environment overrides applied.
    pub config: AppConfig,
    /// Repository the command works on.
    pub git: Git,
    /// Terminal printer.
    pub ui: Ui,
}

impl CommandContext {
    /// Loads configuration and targets the current directory's repository.
    pub fn load(manager: &ConfigManager) -> Result<Self> {
        let config = manager.load().context("failed to load config")?;
        Ok(Self::new(config, Git::new()))
    }

    /// Builds a context from parts.
    pub fn new(config: AppConfig, git: Git) -> Self {
        let ui = Ui::new(&config.ui);
        Self { config, git, ui }
    }

    /// Builds the configured assistant.
    ///
    /// Returns `None` after printing setup instructions when no API key is
    /// configured.
    pub fn connect(&self) -> Result<Option<Assistant>> {
        if is_placeholder_key(&self.config.ai.api_key) {
            self.show_key_setup();
            return Ok(None);
        }
        let assistant = Assistant::from_config(&self.config.provider_config())
            .context("failed to create AI provider")?;
        Ok(Some(assistant))
    }

    fn show_key_setup(&self) {
        let provider = self.config.ai.provider.trim().to_lowercase();
        let (name, upper, url) = match provider.as_str() {
            "gemini" => (
                "Gemini",
                "GEMINI",
                "https://makersuite.google.com/app/apikey",
            ),
            _ => ("OpenAI", "OPENAI", "https://platform.openai.com/api-keys"),
        };

        self.ui.error(&format!("{name} API key not configured"));
        self.ui.info("Please set your API key in one of these ways:");
        self.ui.info(&format!(
            "1. Set environment variable: export AIG_{upper}_API_KEY=your-key"
        ));
        self.ui.info(&format!(
            "2. Set environment variable: export {upper}_API_KEY=your-key"
        ));
        self.ui.info("3. Use: aig config set ai.api_key your-key");
        self.ui.info(&format!("\nGet your API key from: {url}"));
    }
}

/// Closes the provider connection, logging failures.
pub(crate) fn release(assistant: &Assistant) {
    if let Err(e) = assistant.close() {
        warn!(error = %e, "Failed to close AI provider");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- argument parsing ---

    #[test]
    fn aliases_resolve() {
        for alias in ["pr", "pull-request", "merge-request", "mr"] {
            let cli = Cli::try_parse_from(["aig", alias]).unwrap();
            assert!(matches!(cli.command, Commands::Pr(_)), "alias {alias}");
        }
        let cli = Cli::try_parse_from(["aig", "c"]).unwrap();
        assert!(matches!(cli.command, Commands::Commit(_)));
        let cli = Cli::try_parse_from(["aig", "r", "--staged"]).unwrap();
        assert!(matches!(cli.command, Commands::Review(_)));
        let cli = Cli::try_parse_from(["aig", "s", "-n", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::Summary(_)));
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["aig", "config", "path", "--config", "/tmp/aig.yaml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/aig.yaml")));
    }

    #[test]
    fn unknown_command_rejected() {
        assert!(Cli::try_parse_from(["aig", "deploy"]).is_err());
    }

    // --- connect ---

    #[test]
    fn missing_key_yields_no_assistant() {
        let mut config = AppConfig::default();
        config.ai.api_key = "${AIG_OPENAI_API_KEY}".to_string();
        let context = CommandContext::new(config, Git::new());
        assert!(context.connect().unwrap().is_none());
    }

    #[test]
    fn configured_key_builds_assistant() {
        let mut config = AppConfig::default();
        config.ai.provider = "gemini".to_string();
        config.ai.api_key = "g-key".to_string();
        let context = CommandContext::new(config, Git::new());
        let assistant = context.connect().unwrap().unwrap();
        assert_eq!(assistant.metadata().provider, "Gemini");
    }

    #[test]
    fn unsupported_provider_is_an_error() {
        let mut config = AppConfig::default();
        config.ai.provider = "claude".to_string();
        config.ai.api_key = "k".to_string();
        let context = CommandContext::new(config, Git::new());
        let err = context.connect().unwrap_err();
        assert_eq!(err.to_string(), "failed to create AI provider");
        assert!(format!("{err:#}").contains("unsupported AI provider: claude"));
    }
}
