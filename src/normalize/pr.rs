//! Pull request description parsing.

use super::json::decode_structured;
use crate::data::PrDescription;

/// Title used when neither JSON nor text yields one.
pub const DEFAULT_PR_TITLE: &str = "Generated PR Title";

const DEFAULT_TESTING_NOTES: &str = "Please test the changes manually";

/// Parses a pull request description response.
///
/// A JSON object with a non-empty `title` is decoded directly. Otherwise the
/// first non-empty line that is not a markdown heading becomes the title, the
/// whole text becomes the summary and the change list is guessed from
/// keywords.
pub fn parse_pr_description(text: &str) -> PrDescription {
    if let Some(description) = decode_structured::<PrDescription>(text) {
        if !description.title.trim().is_empty() {
            return description;
        }
    }

    let title = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .unwrap_or(DEFAULT_PR_TITLE)
        .to_string();

    PrDescription {
        title,
        summary: text.trim().to_string(),
        changes: guess_changes(text),
        testing_notes: DEFAULT_TESTING_NOTES.to_string(),
        ..PrDescription::default()
    }
}

/// Keyword-based change list. Each rule fires independently.
fn guess_changes(text: &str) -> Vec<String> {
    let rules: [(&[&str], &str); 3] = [
        (&["add", "new"], "Added new functionality"),
        (&["fix", "bug"], "Fixed bugs"),
        (&["update", "modify"], "Updated existing features"),
    ];
    let mut changes: Vec<String> = rules
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, change)| (*change).to_string())
        .collect();
    if changes.is_empty() {
        changes.push("Made various improvements".to_string());
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_response_decodes_directly() {
        let description = parse_pr_description(
            r#"{
  "title": "Add user login",
  "summary": "Adds a login form.",
  "changes": ["Login form", "Session cookie"],
  "testing": "Sign in with a test account",
  "breaking_changes": []
}"#,
        );
        assert_eq!(description.title, "Add user login");
        assert_eq!(description.summary, "Adds a login form.");
        assert_eq!(description.changes, vec!["Login form", "Session cookie"]);
        assert_eq!(description.testing_notes, "Sign in with a test account");
        assert!(description.breaking_changes.is_empty());
    }

    #[test]
    fn fenced_json_response() {
        let description =
            parse_pr_description("```json\n{\"title\": \"Fix crash\", \"changes\": []}\n```");
        assert_eq!(description.title, "Fix crash");
    }

    #[test]
    fn text_fallback_skips_headings() {
        let text = "# Pull Request\n\nAdd caching layer\n\nThis fixes a slow bug.";
        let description = parse_pr_description(text);
        assert_eq!(description.title, "Add caching layer");
        assert_eq!(description.summary, text);
        assert_eq!(description.changes, vec!["Fixed bugs"]);
        assert_eq!(description.testing_notes, "Please test the changes manually");
    }

    #[test]
    fn keyword_rules_fire_independently() {
        let changes = guess_changes("add new flag, fix bug, update docs");
        assert_eq!(
            changes,
            vec!["Added new functionality", "Fixed bugs", "Updated existing features"]
        );
    }

    #[test]
    fn no_keywords() {
        assert_eq!(guess_changes("Refactor internals"), vec!["Made various improvements"]);
    }

    #[test]
    fn empty_text_uses_default_title() {
        assert_eq!(parse_pr_description("").title, DEFAULT_PR_TITLE);
    }

    #[test]
    fn json_without_title_falls_back_to_text() {
        let description = parse_pr_description(r#"{"summary": "x"}"#);
        assert_eq!(description.title, r#"{"summary": "x"}"#);
    }
}
