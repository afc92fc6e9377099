//! JSON extraction from raw model text.
//!
//! Models asked for JSON still wrap it in markdown fences or add a sentence
//! before the object. These functions remove that wrapping and parse what is
//! left. They never invent a value: unparseable text is a [`ParseError`]
//! carrying the raw response.

use thiserror::Error;

/// Model text could not be parsed as JSON
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse JSON response: {message}\nRaw response: {raw}")]
pub struct ParseError {
    pub message: String,
    pub raw: String,
}

/// Remove a surrounding markdown code fence (```` ```json ... ``` ````).
///
/// Text without a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. "json") on the opening fence line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse a model response into a JSON value.
///
/// 1. Strip code fences and parse the remainder.
/// 2. Fall back to the outermost `{ ... }` span (prose around the object).
pub fn parse_json_payload(text: &str) -> Result<serde_json::Value, ParseError> {
    let cleaned = strip_code_fences(text);

    let first_error = match serde_json::from_str::<serde_json::Value>(cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(start) = cleaned.find('{')
        && let Some(end) = cleaned.rfind('}')
        && end > start
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&cleaned[start..=end])
    {
        return Ok(value);
    }

    Err(ParseError {
        message: first_error.to_string(),
        raw: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n{\"position\": \"A\"}\n```";
        assert_eq!(strip_code_fences(text), "{\"position\": \"A\"}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let text = "  ```\n{\"a\": 1}\n```  ";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn test_no_fence_is_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_fenced_payload() {
        let value = parse_json_payload("```json\n{\"decision\": \"B\"}\n```").unwrap();
        assert_eq!(value["decision"], "B");
    }

    #[test]
    fn test_parse_object_inside_prose() {
        let text = "Here is my answer:\n{\"decision\": \"C\", \"rationale\": \"x\"}\nThanks.";
        let value = parse_json_payload(text).unwrap();
        assert_eq!(value["decision"], "C");
    }

    #[test]
    fn test_parse_error_keeps_raw_text() {
        let err = parse_json_payload("I cannot comply").unwrap_err();
        assert_eq!(err.raw, "I cannot comply");
        assert!(err.to_string().contains("I cannot comply"));
    }

    #[test]
    fn test_parse_never_returns_empty_object_for_garbage() {
        assert!(parse_json_payload("").is_err());
        assert!(parse_json_payload("{ not json }").is_err());
    }
}
