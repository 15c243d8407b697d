//! Configuration-related CLI commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::ConfigManager;
use crate::ui::Ui;

/// Configuration operations.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Sets a dotted key such as `ai.provider`.
    Set {
        /// Dotted configuration key.
        key: String,
        /// New value. Lists are comma separated.
        value: String,
    },
    /// Prints the value of a dotted key.
    Get {
        /// Dotted configuration key.
        key: String,
    },
    /// Lists every key with its value.
    List,
    /// Prints the configuration file path.
    Path,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self, manager: &ConfigManager) -> Result<()> {
        let ui = manager
            .load_file()
            .map(|config| Ui::new(&config.ui))
            .unwrap_or_default();

        match self.command {
            ConfigSubcommands::Set { key, value } => {
                manager
                    .set(&key, &value)
                    .with_context(|| format!("failed to set {key}"))?;
                ui.success(&format!("Set {key} = {value}"));
            }
            ConfigSubcommands::Get { key } => {
                let value = manager.get(&key)?;
                println!("{key} = {value}");
            }
            ConfigSubcommands::List => {
                let entries = manager.list().context("failed to read configuration")?;
                println!("Current configuration:");
                for (key, value) in entries {
                    println!("  {key} = {value}");
                }
            }
            ConfigSubcommands::Path => {
                println!("Config file: {}", manager.path().display());
            }
        }
        Ok(())
    }
}
