//! Diff retrieval.

use super::command::{Git, GitError};

/// Where a diff comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// Changes staged in the index.
    Staged,
    /// Working tree changes not yet staged.
    Unstaged,
    /// A single commit (`git show <hash>`).
    Commit(String),
    /// A revision range such as `main..HEAD`.
    Range(String),
    /// Working tree compared to another branch.
    Branch(String),
}

impl DiffSource {
    fn args(&self) -> Vec<&str> {
        match self {
            Self::Staged => vec!["diff", "--cached"],
            Self::Unstaged => vec!["diff"],
            Self::Commit(hash) => vec!["show", hash.as_str()],
            Self::Range(range) => vec!["diff", range.as_str()],
            Self::Branch(branch) => vec!["diff", branch.as_str()],
        }
    }
}

impl Git {
    /// Returns the diff for `source`, trimmed. An empty string means no changes.
    pub fn diff(&self, source: &DiffSource) -> Result<String, GitError> {
        self.run_trimmed(&source.args())
    }

    /// Returns the staged diff.
    pub fn staged_diff(&self) -> Result<String, GitError> {
        self.diff(&DiffSource::Staged)
    }

    /// Returns the unstaged working tree diff.
    pub fn unstaged_diff(&self) -> Result<String, GitError> {
        self.diff(&DiffSource::Unstaged)
    }

    /// Returns the diff between the working tree and `branch`.
    pub fn branch_diff(&self, branch: &str) -> Result<String, GitError> {
        self.diff(&DiffSource::Branch(branch.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_per_source() {
        assert_eq!(DiffSource::Staged.args(), vec!["diff", "--cached"]);
        assert_eq!(DiffSource::Unstaged.args(), vec!["diff"]);
        assert_eq!(
            DiffSource::Commit("abc".to_string()).args(),
            vec!["show", "abc"]
        );
        assert_eq!(
            DiffSource::Range("main..HEAD".to_string()).args(),
            vec!["diff", "main..HEAD"]
        );
        assert_eq!(
            DiffSource::Branch("main".to_string()).args(),
            vec!["diff", "main"]
        );
    }
}
