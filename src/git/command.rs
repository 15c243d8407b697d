//! Subprocess plumbing shared by every git operation.

use std::path::PathBuf;
use std::process::{Command, Output};

use thiserror::Error;
use tracing::debug;

/// Failure of a git subprocess.
#[derive(Error, Debug)]
pub enum GitError {
    /// Git ran and exited unsuccessfully.
    #[error("git {command} failed: {status}, stderr: {stderr}")]
    CommandFailed {
        /// Git subcommand that failed.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The git binary could not be started.
    #[error("failed to run git {command}: {source}")]
    Spawn {
        /// Git subcommand that could not start.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Git printed something that is not UTF-8.
    #[error("git {command} produced output that is not valid UTF-8")]
    Utf8 {
        /// Git subcommand whose output was rejected.
        command: String,
    },
}

/// Handle for running git, optionally inside a specific working directory.
#[derive(Debug, Clone, Default)]
pub struct Git {
    workdir: Option<PathBuf>,
}

impl Git {
    /// Runs git in the current process directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs git inside `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(path.into()),
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output, GitError> {
        let mut command = Command::new("git");
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }
        command.args(args);

        debug!(args = ?args, workdir = ?self.workdir, "Running git");

        command.output().map_err(|source| GitError::Spawn {
            command: subcommand(args),
            source,
        })
    }

    /// Runs git and returns its standard output, failing on a non-zero exit.
    pub(crate) fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: subcommand(args),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| GitError::Utf8 {
            command: subcommand(args),
        })
    }

    /// Like [`run`](Self::run) with surrounding whitespace removed.
    pub(crate) fn run_trimmed(&self, args: &[&str]) -> Result<String, GitError> {
        self.run(args).map(|out| out.trim().to_string())
    }

    /// Runs git and returns only its exit code, for `--quiet` style queries.
    ///
    /// Exit codes above 1 are treated as failures.
    pub(crate) fn exit_code(&self, args: &[&str]) -> Result<i32, GitError> {
        let output = self.output(args)?;
        match output.status.code() {
            Some(code @ (0 | 1)) => Ok(code),
            _ => Err(GitError::CommandFailed {
                command: subcommand(args),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

fn subcommand(args: &[&str]) -> String {
    args.first().copied().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_names_subcommand_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let git = Git::at(dir.path());
        let err = git.run(&["log", "-n1"]).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("git log failed"), "{text}");
        assert!(text.contains("stderr:"), "{text}");
    }

    #[test]
    fn subcommand_of_empty_args() {
        assert_eq!(subcommand(&[]), "");
    }
}
