//! Current branch lookup and branch-name analysis.

use std::sync::LazyLock;

use regex::Regex;

use super::command::{Git, GitError};

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{8}").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static TICKET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4,5})").unwrap());

/// Commit type and ticket inferred from a branch name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchDetails {
    /// `fix` or `feat`, when the name says so.
    pub commit_type: Option<String>,
    /// First 4-5 digit run, ignoring 8-digit date tokens.
    pub ticket: Option<String>,
}

/// Infers commit type and ticket number from a branch name.
///
/// Best effort: `feature/1234-20250620-new-login` yields `feat` and `1234`,
/// `release/v1.0` yields nothing.
pub fn extract_commit_details(branch: &str) -> BranchDetails {
    let lower = branch.to_lowercase();
    let without_dates = DATE_TOKEN.replace_all(&lower, "");

    let ticket = TICKET
        .captures(&without_dates)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let commit_type = if lower.contains("fix") {
        Some("fix".to_string())
    } else if lower.contains("feat") {
        Some("feat".to_string())
    } else {
        None
    };

    BranchDetails {
        commit_type,
        ticket,
    }
}

impl Git {
    /// Returns the checked-out branch name, empty on a detached HEAD.
    pub fn current_branch(&self) -> Result<String, GitError> {
        self.run_trimmed(&["branch", "--show-current"])
    }
}
