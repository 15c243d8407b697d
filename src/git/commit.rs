//! Write-side operations: staging, committing and pushing.

use super::command::{Git, GitError};

impl Git {
    /// Creates a commit from the staged changes.
    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message]).map(drop)
    }

    /// Pushes the current branch to its upstream.
    pub fn push(&self) -> Result<(), GitError> {
        self.run(&["push"]).map(drop)
    }

    /// Stages every change in the working tree.
    pub fn stage_all(&self) -> Result<(), GitError> {
        self.run(&["add", "-A"]).map(drop)
    }

    /// Returns true when the working tree has no changes at all.
    pub fn is_clean(&self) -> Result<bool, GitError> {
        Ok(self.run_trimmed(&["status", "--porcelain"])?.is_empty())
    }

    /// Returns true when the index holds staged changes.
    pub fn has_staged_changes(&self) -> Result<bool, GitError> {
        Ok(self.exit_code(&["diff", "--cached", "--quiet"])? == 1)
    }
}
