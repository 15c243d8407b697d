//! Commit records read from git and commit messages produced for it.

use serde::{Deserialize, Serialize};

/// A single entry from `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full commit hash.
    pub hash: String,
    /// Author name.
    pub author: String,
    /// Author date in `YYYY-MM-DD` form.
    pub date: String,
    /// Subject line of the commit message.
    pub message: String,
}

impl CommitRecord {
    /// Returns the abbreviated hash used in prompts and listings.
    pub fn short_hash(&self) -> &str {
        crate::git::short_hash(&self.hash)
    }
}

/// Options that shape commit message generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOptions {
    /// Commit type the message must use, if any.
    pub commit_type: Option<String>,
    /// Scope the message must use, if any.
    pub scope: Option<String>,
    /// Whether the conventional commit format is requested.
    pub conventional: bool,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            commit_type: None,
            scope: None,
            conventional: true,
        }
    }
}

/// A commit message decomposed into its conventional parts.
///
/// `full_message` is what actually gets committed; the other fields exist for
/// display and may be empty. Every constructor in this crate keeps
/// `full_message` equal to the reassembly of the parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    /// Conventional type such as `feat` or `fix`. Empty for free-form messages.
    pub commit_type: String,
    /// Optional scope inside the parentheses.
    pub scope: String,
    /// Subject line text after the header.
    pub subject: String,
    /// Body paragraphs.
    pub body: String,
    /// Trailer block (`BREAKING CHANGE:`, `Fixes #12`, ...).
    pub footer: String,
    /// Whether the header carried a `!` breaking-change marker.
    pub breaking: bool,
    /// The canonical message text.
    pub full_message: String,
}

impl CommitMessage {
    /// Builds a message from its parts and assembles `full_message`.
    pub fn from_parts(
        commit_type: impl Into<String>,
        scope: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        let mut message = Self {
            commit_type: commit_type.into(),
            scope: scope.into(),
            subject: subject.into(),
            ..Self::default()
        };
        message.rebuild_full_message();
        message
    }

    /// Renders the first line: `type(scope)!: subject`, `type: subject` or `subject`.
    pub fn header(&self) -> String {
        if self.commit_type.is_empty() {
            return self.subject.clone();
        }
        let bang = if self.breaking { "!" } else { "" };
        if self.scope.is_empty() {
            format!("{}{bang}: {}", self.commit_type, self.subject)
        } else {
            format!("{}({}){bang}: {}", self.commit_type, self.scope, self.subject)
        }
    }

    /// Reassembles `full_message` from header, body and footer, separated by
    /// blank lines and omitting empty parts.
    pub fn rebuild_full_message(&mut self) {
        let mut sections = vec![self.header()];
        if !self.body.is_empty() {
            sections.push(self.body.clone());
        }
        if !self.footer.is_empty() {
            sections.push(self.footer.clone());
        }
        self.full_message = sections.join("\n\n");
    }

    /// Prefixes the subject with a ticket number (`1234-subject`).
    pub fn prefix_ticket(&mut self, ticket: &str) {
        if ticket.is_empty() {
            return;
        }
        self.subject = format!("{ticket}-{}", self.subject);
        self.rebuild_full_message();
    }

    /// Returns true when the message carries no usable subject.
    pub fn is_blank(&self) -> bool {
        self.subject.trim().is_empty()
    }
}
