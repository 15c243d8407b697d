//! Turns raw model output into typed results.
//!
//! Every parser here is total: a structured JSON decode is tried first and,
//! when that fails, text heuristics produce a best-effort result. Malformed
//! model output never becomes an error.

mod commit;
mod json;
mod pr;
mod review;
mod summary;

pub use commit::{fallback_commit_message, parse_commit_message};
pub use json::{decode_structured, strip_code_fence};
pub use pr::{parse_pr_description, DEFAULT_PR_TITLE};
pub use review::{classify_line, parse_review, LineKind, SectionKind};
pub use summary::{group_commits, parse_summary};
