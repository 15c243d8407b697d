//! Local heuristics that work without a language model.
//!
//! These back the rate-limit fallback for commit messages and fill in the
//! parts of a pull request description that can be derived from the diff and
//! commit list alone.

pub mod diff;
pub mod filter;
pub mod issues;
pub mod pr;

pub use diff::DiffSummary;
pub use filter::PathFilter;
pub use issues::{extract_issue_numbers, format_issue_links};
