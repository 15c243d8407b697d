//! YAML configuration with environment overrides.
//!
//! The document lives at `~/.config/aig/config.yaml` and is created with
//! defaults on first use. Provider, model and API key can be overridden from
//! the environment; an `api_key` of the form `${VAR}` is expanded.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

use crate::ai::ProviderConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "AIG_CONFIG";

const PROVIDER_ENV: &str = "AIG_AI_PROVIDER";
const MODEL_ENV: &str = "AIG_AI_MODEL";

/// Dotted keys whose values `list` masks.
const SECRET_KEYS: [&str; 1] = ["ai.api_key"];

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{([A-Za-z_][A-Za-z0-9_]*)\}$").unwrap());

/// Written on first use. Comments document the accepted values.
const DEFAULT_DOCUMENT: &str = r"# aig configuration

# AI provider settings
ai:
  provider: openai # openai or gemini
  api_key: ${AIG_OPENAI_API_KEY} # expanded from the environment
  model: gpt-4o-mini # OpenAI: gpt-4o-mini, gpt-4o | Gemini: gemini-1.5-pro, gemini-1.5-flash
  temperature: 0.7
  max_tokens: 2000

# Git settings
git:
  auto_stage: false
  default_branch: main
  commit_template: conventional # or custom

# Terminal output
ui:
  theme: dark # dark, light or auto
  emoji: true
  color: true
  spinner: dots # dots, line or none

# Code review
review:
  include_patterns:
    - '*.go'
    - '*.js'
    - '*.py'
  exclude_patterns:
    - '*_test.go'
    - 'vendor/*'
  focus_areas:
    - security
    - performance
    - best_practices
";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid configuration document.
    #[error("failed to parse config file {path}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The file or its directory could not be written.
    #[error("failed to write config file {path}")]
    Write {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialized.
    #[error("failed to encode configuration")]
    Encode(#[from] serde_yaml::Error),

    /// No such dotted key.
    #[error("configuration key '{0}' not found")]
    UnknownKey(String),

    /// The value does not fit the key's type.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// Dotted key.
        key: String,
        /// Why the value was rejected.
        message: String,
    },

    /// `$HOME` could not be determined.
    #[error("failed to determine home directory")]
    NoHomeDir,
}

/// Colour theme for terminal output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Colours tuned for dark terminals.
    #[default]
    Dark,
    /// Colours tuned for light terminals.
    Light,
    /// Let the terminal decide.
    Auto,
}

/// Progress indicator style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinnerStyle {
    /// Braille dots.
    #[default]
    Dots,
    /// Rotating line.
    Line,
    /// No spinner.
    None,
}

/// `ai` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// `openai` or `gemini`.
    pub provider: String,
    /// API key, possibly a `${VAR}` reference.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum response tokens.
    pub max_tokens: u32,
    /// API base URL override.
    pub base_url: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            base_url: None,
        }
    }
}

/// `git` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// Run `git add -A` before generating a commit message.
    pub auto_stage: bool,
    /// Default PR target branch.
    pub default_branch: String,
    /// `conventional` or `custom`.
    pub commit_template: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            auto_stage: false,
            default_branch: "main".to_string(),
            commit_template: "conventional".to_string(),
        }
    }
}

/// `ui` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Colour theme.
    pub theme: Theme,
    /// Prefix messages with emoji.
    pub emoji: bool,
    /// Use ANSI colours.
    pub color: bool,
    /// Progress indicator.
    pub spinner: SpinnerStyle,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            emoji: true,
            color: true,
            spinner: SpinnerStyle::Dots,
        }
    }
}

/// `review` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    /// Glob patterns of files to review; empty means all.
    pub include_patterns: Vec<String>,
    /// Glob patterns of files to skip.
    pub exclude_patterns: Vec<String>,
    /// Areas named in the review prompt.
    pub focus_areas: Vec<String>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> {
            items.iter().map(|s| (*s).to_string()).collect()
        };
        Self {
            include_patterns: owned(&["*.go", "*.js", "*.py"]),
            exclude_patterns: owned(&["*_test.go", "vendor/*"]),
            focus_areas: owned(&["security", "performance", "best_practices"]),
        }
    }
}

/// The whole configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider settings.
    pub ai: AiSettings,
    /// Git behaviour.
    pub git: GitSettings,
    /// Terminal output.
    pub ui: UiSettings,
    /// Code review filters.
    pub review: ReviewSettings,
}

impl AppConfig {
    /// Applies environment overrides.
    ///
    /// `env` returns the value of a variable; empty values count as unset.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        if let Some(captures) = ENV_REFERENCE.captures(self.ai.api_key.trim()) {
            if let Some(value) = var(&captures[1]) {
                self.ai.api_key = value;
            }
        }
        if let Some(provider) = var(PROVIDER_ENV) {
            self.ai.provider = provider;
        }
        if let Some(model) = var(MODEL_ENV) {
            self.ai.model = model;
        }

        let key_vars: &[&str] = match self.ai.provider.trim().to_lowercase().as_str() {
            "openai" => &["AIG_OPENAI_API_KEY", "OPENAI_API_KEY"],
            "gemini" => &["AIG_GEMINI_API_KEY", "GEMINI_API_KEY"],
            _ => &[],
        };
        if let Some(key) = key_vars.iter().find_map(|name| var(name)) {
            self.ai.api_key = key;
        }
    }

    /// Connection settings for the configured provider.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.ai.provider.clone(),
            api_key: self.ai.api_key.clone(),
            model: self.ai.model.clone(),
            temperature: self.ai.temperature,
            max_tokens: self.ai.max_tokens,
            base_url: self.ai.base_url.clone(),
        }
    }

    /// True unless `git.commit_template` selects a custom format.
    pub fn uses_conventional_commits(&self) -> bool {
        self.git.commit_template.trim().eq_ignore_ascii_case("conventional")
    }
}

/// Reads and writes the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager for the default location under the home directory.
    pub fn new() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::with_path(home.join(".config").join("aig").join("config.yaml")))
    }

    /// Manager for an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `path` when given, the default location otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Ok(Self::with_path(path)),
            None => Self::new(),
        }
    }

    /// Config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration with process environment overrides.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Loads the configuration using `env` for overrides.
    pub fn load_with_env(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<AppConfig, ConfigError> {
        let mut config = self.load_file()?;
        config.apply_env(env);
        debug!(
            path = %self.path.display(),
            provider = %config.ai.provider,
            model = %config.ai.model,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Loads the file as written, without environment overrides.
    pub fn load_file(&self) -> Result<AppConfig, ConfigError> {
        let document = self.read_document()?;
        serde_yaml::from_value(document).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Sets a dotted key, coercing `raw` to the key's type, and saves.
    pub fn set(&self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let defaults = serde_yaml::to_value(AppConfig::default())?;
        let template =
            lookup(&defaults, key).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let value = coerce(key, template, raw)?;

        let mut document = self.read_document()?;
        assign(&mut document, key, value);
        serde_yaml::from_value::<AppConfig>(document.clone()).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        self.write(&serde_yaml::to_string(&document)?)
    }

    /// Value of a dotted key as YAML text, defaults included.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let document = serde_yaml::to_value(self.load_file()?)?;
        lookup(&document, key)
            .map(display_value)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    /// Every leaf key with its value, secrets masked.
    pub fn list(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let document = serde_yaml::to_value(self.load_file()?)?;
        let mut entries = Vec::new();
        flatten(&document, "", &mut entries);
        for (key, value) in &mut entries {
            if SECRET_KEYS.contains(&key.as_str()) {
                *value = mask_secret(value);
            }
        }
        Ok(entries)
    }

    /// Reads the document, writing the default one first if missing.
    fn read_document(&self) -> Result<Value, ConfigError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Creating default configuration");
            self.write(DEFAULT_DOCUMENT)?;
        }
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let document: Value =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(match document {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        })
    }

    fn write(&self, content: &str) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(write_error)?;
        }
        fs::write(&self.path, content).map_err(write_error)
    }
}

fn lookup<'a>(document: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(document, |node, part| node.as_mapping()?.get(part))
}

fn assign(node: &mut Value, key: &str, value: Value) {
    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(map) = node else {
        return;
    };
    match key.split_once('.') {
        Some((head, rest)) => {
            let child = map
                .entry(Value::String(head.to_string()))
                .or_insert(Value::Null);
            assign(child, rest, value);
        }
        None => {
            map.insert(Value::String(key.to_string()), value);
        }
    }
}

/// Converts user input to the YAML type of the key's default value.
fn coerce(key: &str, template: &Value, raw: &str) -> Result<Value, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    match template {
        Value::Bool(_) => raw
            .trim()
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| invalid(format!("expected true or false, got '{raw}'"))),
        Value::Number(_) => serde_yaml::from_str::<Value>(raw.trim())
            .ok()
            .filter(Value::is_number)
            .ok_or_else(|| invalid(format!("expected a number, got '{raw}'"))),
        Value::Sequence(_) => Ok(Value::Sequence(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        )),
        Value::Mapping(_) => Err(invalid("cannot set a whole section".to_string())),
        _ => Ok(Value::String(raw.to_string())),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn flatten(node: &Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match node {
        Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key) = key.as_str() else { continue };
                let full = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(value, &full, out);
            }
        }
        leaf => out.push((prefix.to_string(), display_value(leaf))),
    }
}

/// Keeps the first and last four characters of long secrets.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if secret.is_empty() || ENV_REFERENCE.is_match(secret) {
        return secret.to_string();
    }
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
