//! Typed results exchanged between the git, AI and presentation layers.

pub mod commit;
pub mod pr;
pub mod review;
pub mod summary;

pub use commit::{CommitMessage, CommitOptions, CommitRecord};
pub use pr::{ChecklistItem, Platform, PrAnalysis, PrDescription, PrTemplate};
pub use review::{Issue, PerformanceIssue, ReviewOptions, ReviewResult, SecurityRisk, Suggestion};
pub use summary::{CommitSummary, Summary, SummaryFormat, SummaryOptions};
