//! Review parsing: structured JSON first, then a line classifier driving a
//! small section state machine.

use super::json::decode_structured;
use crate::data::{Issue, PerformanceIssue, ReviewResult, SecurityRisk, Suggestion};

/// Review section opened by a level-2 heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// `## Summary`
    Summary,
    /// `## Issues`
    Issues,
    /// `## Suggestions`
    Suggestions,
    /// `## Security Risks` or `## Security`
    Security,
    /// `## Performance Issues` or `## Performance`
    Performance,
    /// Any other heading; its content is ignored.
    Other,
}

impl SectionKind {
    fn from_heading(title: &str) -> Self {
        match title.trim().trim_end_matches(':').to_lowercase().as_str() {
            "summary" => Self::Summary,
            "issues" => Self::Issues,
            "suggestions" => Self::Suggestions,
            "security risks" | "security" => Self::Security,
            "performance issues" | "performance" => Self::Performance,
            _ => Self::Other,
        }
    }
}

/// Classification of a single response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A `## ` heading.
    Heading(SectionKind),
    /// A bullet with its marker removed.
    Bullet(&'a str),
    /// Any other non-empty text, trimmed.
    Text(&'a str),
    /// Whitespace only.
    Blank,
}

/// Classifies one line of review text.
///
/// Bullets start with `-`, `*` or `•`. Only the first marker character is
/// removed, so `**Critical**: x` becomes the finding `*Critical**: x`.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if let Some(title) = line.strip_prefix("## ") {
        return LineKind::Heading(SectionKind::from_heading(title));
    }
    match line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('\u{2022}'))
    {
        Some(rest) => LineKind::Bullet(rest.trim()),
        None => LineKind::Text(line),
    }
}

/// Parses a review response.
///
/// A JSON object with `summary`, `issues`, `suggestions`, `security_risks`
/// and `performance_issues` keys is decoded directly. Anything else goes
/// through the line classifier: text under `## Summary` is kept verbatim and
/// bullets under the finding headings become findings with default severity
/// and type. Content before the first heading is ignored.
pub fn parse_review(text: &str) -> ReviewResult {
    if let Some(review) = decode_structured::<ReviewResult>(text) {
        return review;
    }

    let mut review = ReviewResult::default();
    let mut section: Option<SectionKind> = None;
    let mut summary_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        match (classify_line(line), section) {
            (LineKind::Heading(kind), _) => section = Some(kind),
            (LineKind::Blank, Some(SectionKind::Summary)) => summary_lines.push(""),
            (LineKind::Bullet(_) | LineKind::Text(_), Some(SectionKind::Summary)) => {
                summary_lines.push(line.trim());
            }
            (LineKind::Bullet(item), Some(kind)) if !item.is_empty() => {
                push_finding(&mut review, kind, item);
            }
            _ => {}
        }
    }

    review.summary = summary_lines.join("\n").trim().to_string();
    review
}

fn push_finding(review: &mut ReviewResult, kind: SectionKind, item: &str) {
    match kind {
        SectionKind::Issues => review.issues.push(Issue::new(item)),
        SectionKind::Suggestions => review.suggestions.push(Suggestion::new(item)),
        SectionKind::Security => review.security_risks.push(SecurityRisk::new(item)),
        SectionKind::Performance => review.performance_issues.push(PerformanceIssue::new(item)),
        SectionKind::Summary | SectionKind::Other => {}
    }
}
