//! Code review results.

use serde::{Deserialize, Deserializer, Serialize};

/// Severity assigned to findings that carry no explicit marker.
pub const DEFAULT_SEVERITY: &str = "medium";

/// Type assigned to findings that carry no explicit marker.
pub const DEFAULT_KIND: &str = "general";

fn default_severity() -> String {
    DEFAULT_SEVERITY.to_string()
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

/// Accepts line numbers given either as numbers or as numeric strings.
fn lenient_line<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Line {
        Number(u32),
        Text(String),
    }

    Ok(match Option::<Line>::deserialize(deserializer)? {
        Some(Line::Number(n)) => Some(n),
        Some(Line::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// A problem found in the changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Severity label, `medium` unless the model said otherwise.
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Category label.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// File the issue refers to.
    #[serde(default)]
    pub file: String,
    /// Line the issue refers to.
    #[serde(default, deserialize_with = "lenient_line")]
    pub line: Option<u32>,
    /// What is wrong.
    #[serde(default)]
    pub description: String,
    /// How to fix it.
    #[serde(default)]
    pub suggestion: String,
}

/// An improvement that is not a defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Category label.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// File the suggestion refers to.
    #[serde(default)]
    pub file: String,
    /// Line the suggestion refers to.
    #[serde(default, deserialize_with = "lenient_line")]
    pub line: Option<u32>,
    /// The suggestion itself.
    #[serde(default)]
    pub description: String,
    /// Example code, if the model gave one.
    #[serde(default)]
    pub example: String,
}

/// A security concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRisk {
    /// Severity label.
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Category label.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// The risk.
    #[serde(default)]
    pub description: String,
    /// How to mitigate it.
    #[serde(default)]
    pub mitigation: String,
}

/// A performance concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceIssue {
    /// Category label.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// The concern.
    #[serde(default)]
    pub description: String,
    /// Expected impact.
    #[serde(default)]
    pub impact: String,
    /// Proposed solution.
    #[serde(default)]
    pub solution: String,
}

impl Issue {
    /// Creates an issue with default severity and type.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            severity: default_severity(),
            kind: default_kind(),
            file: String::new(),
            line: None,
            description: description.into(),
            suggestion: String::new(),
        }
    }
}

impl Suggestion {
    /// Creates a suggestion with the default type.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            kind: default_kind(),
            file: String::new(),
            line: None,
            description: description.into(),
            example: String::new(),
        }
    }
}

impl SecurityRisk {
    /// Creates a security risk with default severity and type.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            severity: default_severity(),
            kind: default_kind(),
            description: description.into(),
            mitigation: String::new(),
        }
    }
}

impl PerformanceIssue {
    /// Creates a performance issue with the default type.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            kind: default_kind(),
            description: description.into(),
            impact: String::new(),
            solution: String::new(),
        }
    }
}

/// Structured outcome of a code review.
///
/// Every list may be empty. A missing section in the model output is never an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Overall summary of the changes.
    #[serde(default)]
    pub summary: String,
    /// Problems found.
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Improvement suggestions.
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    /// Security concerns.
    #[serde(default)]
    pub security_risks: Vec<SecurityRisk>,
    /// Performance concerns.
    #[serde(default, alias = "performance")]
    pub performance_issues: Vec<PerformanceIssue>,
}

impl ReviewResult {
    /// Returns true when the review found nothing at all.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.issues.is_empty()
            && self.suggestions.is_empty()
            && self.security_risks.is_empty()
            && self.performance_issues.is_empty()
    }
}

/// Options that shape a review request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewOptions {
    /// Extra focus areas from configuration.
    pub focus_areas: Vec<String>,
    /// Prioritise security findings.
    pub security: bool,
    /// Prioritise performance findings.
    pub performance: bool,
}
