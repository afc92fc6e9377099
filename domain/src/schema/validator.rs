//! The shared payload validator.
//!
//! One routine checks a parsed JSON value against the field table of a
//! [`PayloadKind`]. It is pure: it never mutates or repairs the candidate,
//! so validating an already-valid payload again is a no-op.

use super::payload::{FieldRule, FieldSpec, IRAC_KEYS, PayloadKind};
use serde_json::Value;
use thiserror::Error;

/// Why a payload failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{0}' is empty")]
    EmptyField(String),

    #[error("field '{field}' must be {expected}")]
    WrongType { field: String, expected: &'static str },
}

/// Validate `candidate` against the field table of `kind`.
pub fn validate(candidate: &Value, kind: PayloadKind) -> Result<(), SchemaViolation> {
    let object = candidate.as_object().ok_or(SchemaViolation::NotAnObject)?;

    for spec in kind.fields() {
        match object.get(spec.key) {
            None | Some(Value::Null) if spec.required => {
                return Err(SchemaViolation::MissingField(spec.key.to_string()));
            }
            None | Some(Value::Null) => {}
            Some(value) => check_field(spec, value)?,
        }
    }
    Ok(())
}

/// Boolean form of [`validate`]
pub fn is_valid(candidate: &Value, kind: PayloadKind) -> bool {
    validate(candidate, kind).is_ok()
}

fn check_field(spec: &FieldSpec, value: &Value) -> Result<(), SchemaViolation> {
    match spec.rule {
        FieldRule::Text => check_text(spec.key, value, spec.required),
        FieldRule::Irac => check_irac(spec.key, value),
        FieldRule::TextList => {
            let items = value.as_array().ok_or_else(|| SchemaViolation::WrongType {
                field: spec.key.to_string(),
                expected: "a list of strings",
            })?;
            if items.iter().all(Value::is_string) {
                Ok(())
            } else {
                Err(SchemaViolation::WrongType {
                    field: spec.key.to_string(),
                    expected: "a list of strings",
                })
            }
        }
    }
}

fn check_text(path: &str, value: &Value, non_empty: bool) -> Result<(), SchemaViolation> {
    let text = value.as_str().ok_or_else(|| SchemaViolation::WrongType {
        field: path.to_string(),
        expected: "a string",
    })?;
    if non_empty && text.trim().is_empty() {
        return Err(SchemaViolation::EmptyField(path.to_string()));
    }
    Ok(())
}

fn check_irac(key: &str, value: &Value) -> Result<(), SchemaViolation> {
    let object = value.as_object().ok_or_else(|| SchemaViolation::WrongType {
        field: key.to_string(),
        expected: "an IRAC object",
    })?;

    for component in IRAC_KEYS {
        let path = format!("{}.{}", key, component);
        match object.get(component) {
            None | Some(Value::Null) => return Err(SchemaViolation::MissingField(path)),
            Some(inner) => check_text(&path, inner, true)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn irac() -> Value {
        json!({
            "issue": "Whether the offer was accepted",
            "rule": "Acceptance must mirror the offer",
            "application": "The reply added new terms",
            "conclusion": "No contract was formed"
        })
    }

    #[test]
    fn test_valid_irac_opening() {
        let payload = json!({"position": "C", "irac": irac(), "key_citations": ["UCC 2-207"]});
        assert!(validate(&payload, PayloadKind::OpeningIrac).is_ok());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let payload = json!({"position": "C", "irac": irac()});
        let before = payload.clone();
        assert!(is_valid(&payload, PayloadKind::OpeningIrac));
        assert!(is_valid(&payload, PayloadKind::OpeningIrac));
        assert_eq!(payload, before);
    }

    #[test]
    fn test_rejects_each_missing_irac_component() {
        for component in IRAC_KEYS {
            let mut inner = irac();
            inner.as_object_mut().unwrap().remove(component);
            let payload = json!({"position": "A", "irac": inner});
            assert_eq!(
                validate(&payload, PayloadKind::OpeningIrac),
                Err(SchemaViolation::MissingField(format!("irac.{}", component)))
            );
        }
    }

    #[test]
    fn test_rejects_whitespace_irac_component() {
        for component in IRAC_KEYS {
            let mut inner = irac();
            inner[component] = json!("   ");
            let payload = json!({"position": "A", "irac": inner});
            assert_eq!(
                validate(&payload, PayloadKind::OpeningIrac),
                Err(SchemaViolation::EmptyField(format!("irac.{}", component)))
            );
        }
    }

    #[test]
    fn test_rejects_missing_top_level_key() {
        let payload = json!({"irac": irac()});
        assert_eq!(
            validate(&payload, PayloadKind::OpeningIrac),
            Err(SchemaViolation::MissingField("position".into()))
        );
    }

    #[test]
    fn test_rejects_non_object() {
        assert_eq!(
            validate(&json!(["A"]), PayloadKind::DecisionMcq),
            Err(SchemaViolation::NotAnObject)
        );
    }

    #[test]
    fn test_optional_fields_type_checked_when_present() {
        let ok = json!({"decision": "B", "winner": null});
        assert!(is_valid(&ok, PayloadKind::DecisionHybrid));

        let bad = json!({"decision": "B", "key_factors": "not a list"});
        assert!(matches!(
            validate(&bad, PayloadKind::DecisionHybrid),
            Err(SchemaViolation::WrongType { .. })
        ));
    }

    #[test]
    fn test_optional_text_may_be_empty() {
        let payload = json!({"decision": "A", "rationale": ""});
        assert!(is_valid(&payload, PayloadKind::DecisionMcq));
    }

    #[test]
    fn test_decision_irac_requires_synthesis() {
        let payload = json!({"decision": "A", "rationale": "r"});
        assert_eq!(
            validate(&payload, PayloadKind::DecisionIrac),
            Err(SchemaViolation::MissingField("synthesis".into()))
        );
        let full = json!({"decision": "A", "synthesis": irac()});
        assert!(is_valid(&full, PayloadKind::DecisionIrac));
    }

    #[test]
    fn test_open_ended_payloads() {
        assert!(is_valid(
            &json!({"irac": irac(), "full_answer": "Essay"}),
            PayloadKind::OpeningOpenEndedIrac
        ));
        assert!(!is_valid(&json!({"answer": " "}), PayloadKind::OpeningOpenEndedVanilla));
        assert!(is_valid(
            &json!({"refined_answer": "Better essay", "critique": "Weak on facts"}),
            PayloadKind::RebuttalOpenEnded
        ));
        assert!(is_valid(&json!({"final_answer": "Synthesis"}), PayloadKind::DecisionSynthesis));
    }
}
