//! Structural predicates for answer values.
//!
//! Guards only check shape; range and date rules live in [`crate::validate`].

use serde::Serialize;
use serde_json::Value;

use crate::dates::parse_iso_date;
use crate::spec::question::QuestionType;

pub type TypeGuard = fn(&Value) -> bool;

/// Outcome of [`check_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

pub fn is_finite_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

pub fn is_string_or_string_array(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Array(items) => items.iter().all(Value::is_string),
        _ => false,
    }
}

pub fn is_number_range(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        map.get("min").is_some_and(is_finite_number) && map.get("max").is_some_and(is_finite_number)
    })
}

pub fn is_iso_date(value: &Value) -> bool {
    value.as_str().and_then(parse_iso_date).is_some()
}

pub fn is_date_range(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        map.get("start").is_some_and(is_iso_date) && map.get("end").is_some_and(is_iso_date)
    })
}

/// Maps a question type to its structural guard.
pub fn guard_for(kind: QuestionType) -> TypeGuard {
    match kind {
        QuestionType::Text => is_string,
        QuestionType::Boolean => is_boolean,
        QuestionType::Number => is_finite_number,
        QuestionType::MultipleChoice => is_string_or_string_array,
        QuestionType::NumberRange => is_number_range,
        QuestionType::Date => is_iso_date,
        QuestionType::DateRange => is_date_range,
    }
}

pub fn expected_description(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Text => "a string",
        QuestionType::Boolean => "a boolean",
        QuestionType::Number => "a finite number",
        QuestionType::MultipleChoice => "a string or an array of strings",
        QuestionType::NumberRange => "an object with finite numeric min and max",
        QuestionType::Date => "an ISO date string",
        QuestionType::DateRange => "an object with ISO start and end dates",
    }
}

pub fn runtime_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Runs the guard for `kind` and describes the mismatch when it fails.
pub fn check_type(kind: QuestionType, value: &Value) -> TypeCheck {
    if guard_for(kind)(value) {
        TypeCheck {
            is_valid: true,
            error_message: None,
        }
    } else {
        TypeCheck {
            is_valid: false,
            error_message: Some(format!(
                "Expected {}, but received {}",
                expected_description(kind),
                runtime_type_name(value)
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_range_requires_both_endpoints() {
        assert!(is_number_range(&json!({"min": 1, "max": 2.5})));
        assert!(!is_number_range(&json!({"min": 1})));
        assert!(!is_number_range(&json!({"min": "1", "max": 2})));
    }

    #[test]
    fn multiple_choice_accepts_string_arrays_only() {
        assert!(is_string_or_string_array(&json!("a")));
        assert!(is_string_or_string_array(&json!(["a", "b"])));
        assert!(!is_string_or_string_array(&json!(["a", 1])));
    }

    #[test]
    fn date_guards_reject_rollover_days() {
        assert!(is_iso_date(&json!("2024-02-29")));
        assert!(!is_iso_date(&json!("2023-02-29")));
        assert!(is_date_range(
            &json!({"start": "2024-01-01", "end": "2024-01-31"})
        ));
        assert!(!is_date_range(&json!({"start": "2024-01-01"})));
    }

    #[test]
    fn date_guard_requires_canonical_form() {
        assert!(!is_iso_date(&json!("2024-1-5")));
        assert!(!is_iso_date(&json!(" 2024-01-05 ")));
        assert!(is_iso_date(&json!("2024-01-05T10:00:00Z")));
    }

    #[test]
    fn check_type_names_runtime_type() {
        let check = check_type(QuestionType::Boolean, &json!("yes"));
        assert!(!check.is_valid);
        assert_eq!(
            check.error_message.as_deref(),
            Some("Expected a boolean, but received string")
        );
        assert!(check_type(QuestionType::Number, &json!(4)).is_valid);
    }
}
