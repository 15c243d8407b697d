//! Structured decoding of whole responses.

use serde::de::DeserializeOwned;

/// Removes a code fence that wraps the entire text.
///
/// Handles an optional info string on the opening fence (```` ```json ````).
/// Text that is not entirely fenced is returned trimmed but otherwise intact.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim().contains(char::is_whitespace) => body.trim(),
        _ => inner.trim(),
    }
}

/// Decodes the whole response as JSON, or the interior of a fence that wraps
/// the whole response.
///
/// JSON embedded inside prose is deliberately not searched for.
pub fn decode_structured<T: DeserializeOwned>(text: &str) -> Option<T> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    let inner = strip_code_fence(trimmed);
    if inner.len() == trimmed.len() {
        return None;
    }
    serde_json::from_str(inner).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        title: String,
    }

    #[test]
    fn strip_fence_with_language() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strip_fence_without_language() {
        assert_eq!(strip_code_fence("```\nfeat: add x\n```"), "feat: add x");
    }

    #[test]
    fn unfenced_text_is_trimmed() {
        assert_eq!(strip_code_fence("  feat: add x \n"), "feat: add x");
    }

    #[test]
    fn half_fence_is_kept() {
        assert_eq!(strip_code_fence("```\nno closing"), "```\nno closing");
    }

    #[test]
    fn decode_plain_json() {
        let probe: Option<Probe> = decode_structured(r#" {"title": "x"} "#);
        assert_eq!(probe.unwrap().title, "x");
    }

    #[test]
    fn decode_fenced_json() {
        let probe: Option<Probe> = decode_structured("```json\n{\"title\": \"y\"}\n```");
        assert_eq!(probe.unwrap().title, "y");
    }

    #[test]
    fn embedded_json_is_not_searched() {
        let probe: Option<Probe> = decode_structured("Here you go: {\"title\": \"z\"}");
        assert!(probe.is_none());
    }
}
