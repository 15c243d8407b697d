//! Commit history queries.

use super::command::{Git, GitError};
use crate::data::CommitRecord;

const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ad|%s";

/// Selection of commits for [`Git::log`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Maximum number of commits.
    pub number: Option<usize>,
    /// Branch or revision range to walk.
    pub branch: Option<String>,
    /// Start of a `from..to` range.
    pub from: Option<String>,
    /// End of a `from..to` range. Defaults to `HEAD` when only `from` is set.
    pub to: Option<String>,
}

impl LogQuery {
    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            LOG_FORMAT.to_string(),
            "--date=short".to_string(),
        ];
        if let Some(n) = self.number.filter(|n| *n > 0) {
            args.push(format!("-n{n}"));
        }
        if let Some(branch) = self.branch.as_deref().filter(|b| !b.is_empty()) {
            args.push(branch.to_string());
        }
        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => {
                args.push(format!("{from}..{to}"));
            }
            (Some(from), _) if !from.is_empty() => args.push(format!("{from}..HEAD")),
            _ => {}
        }
        args
    }
}

impl Git {
    /// Lists commits, newest first.
    pub fn log(&self, query: &LogQuery) -> Result<Vec<CommitRecord>, GitError> {
        let args = query.args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.run_trimmed(&args)?;
        Ok(parse_log_output(&output))
    }
}

/// Parses `hash|author|date|subject` lines.
///
/// Only the first three pipes split fields, so subjects may contain pipes.
/// Lines with fewer than four fields are skipped.
pub fn parse_log_output(output: &str) -> Vec<CommitRecord> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(4, '|');
            Some(CommitRecord {
                hash: fields.next()?.to_string(),
                author: fields.next()?.to_string(),
                date: fields.next()?.to_string(),
                message: fields.next()?.to_string(),
            })
        })
        .collect()
}
