use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};

use crate::answers::ValidationResult;
use crate::dates::{self, format_iso_date, parse_iso_date};
use crate::guards::check_type;
use crate::spec::question::{DateBound, DateRules, NumberRules, Question, QuestionKind, TextRules};

pub const REQUIRED_MESSAGE: &str = "This question is required";
pub const INVALID_DATE_MESSAGE: &str = "Please enter a valid date";

/// Validates one answer against its question, reading today's date for `"today"` bounds.
pub fn validate_answer(question: &Question, value: &Value) -> ValidationResult {
    validate_answer_on(question, value, dates::today())
}

/// Same as [`validate_answer`] with an explicit notion of "today".
pub fn validate_answer_on(question: &Question, value: &Value, today: NaiveDate) -> ValidationResult {
    if is_empty(value) {
        return if question.required {
            ValidationResult::invalid(REQUIRED_MESSAGE)
        } else {
            ValidationResult::valid()
        };
    }

    // Range objects and date strings get field-level messages from the checks below.
    let detailed = match question.kind {
        QuestionKind::NumberRange { .. } | QuestionKind::DateRange { .. } => value.is_object(),
        QuestionKind::Date { .. } => value.is_string(),
        _ => false,
    };
    if !detailed && let Some(message) = check_type(question.question_type(), value).error_message {
        return ValidationResult::invalid(message);
    }

    let error = match &question.kind {
        QuestionKind::Text { validation, .. } => value
            .as_str()
            .and_then(|text| check_text(text, validation)),
        QuestionKind::Number { validation } => value
            .as_f64()
            .and_then(|number| check_number(number, validation)),
        QuestionKind::NumberRange { validation } => value
            .as_object()
            .and_then(|range| check_number_range(range, validation)),
        QuestionKind::Date { validation } => value
            .as_str()
            .and_then(|text| check_date(text, validation, today)),
        QuestionKind::DateRange { validation } => value
            .as_object()
            .and_then(|range| check_date_range(range, validation, today)),
        QuestionKind::Boolean | QuestionKind::MultipleChoice { .. } => None,
    };

    match error {
        Some(message) => ValidationResult::invalid(message),
        None => ValidationResult::valid(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn check_text(text: &str, rules: &TextRules) -> Option<String> {
    let length = text.chars().count();

    if let Some(rule) = &rules.min_length
        && length < *rule.value()
    {
        return Some(rule.message_or(|| format!("Must be at least {} characters", rule.value())));
    }

    if let Some(rule) = &rules.max_length
        && length > *rule.value()
    {
        return Some(rule.message_or(|| format!("Must be at most {} characters", rule.value())));
    }

    if let Some(rule) = &rules.pattern {
        match Regex::new(rule.value()) {
            Ok(regex) if !regex.is_match(text) => {
                return Some(rule.message_or(|| "Invalid format".to_string()));
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(pattern = %rule.value(), error = %err, "skipping invalid pattern rule");
            }
        }
    }

    None
}

fn check_number(number: f64, rules: &NumberRules) -> Option<String> {
    if let Some(rule) = &rules.min
        && number < *rule.value()
    {
        return Some(rule.message_or(|| format!("Value must be at least {}", rule.value())));
    }

    if let Some(rule) = &rules.max
        && number > *rule.value()
    {
        return Some(rule.message_or(|| format!("Value must be at most {}", rule.value())));
    }

    None
}

fn finite_field(range: &Map<String, Value>, key: &str) -> Option<f64> {
    range
        .get(key)
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite())
}

fn check_number_range(range: &Map<String, Value>, rules: &NumberRules) -> Option<String> {
    let (Some(low), Some(high)) = (finite_field(range, "min"), finite_field(range, "max")) else {
        return Some("Both minimum and maximum values are required".to_string());
    };

    if low > high {
        return Some("Minimum value cannot be greater than maximum value".to_string());
    }

    for (label, endpoint) in [("Minimum", low), ("Maximum", high)] {
        if let Some(rule) = &rules.min
            && endpoint < *rule.value()
        {
            return Some(
                rule.message_or(|| format!("{} value must be at least {}", label, rule.value())),
            );
        }
        if let Some(rule) = &rules.max
            && endpoint > *rule.value()
        {
            return Some(
                rule.message_or(|| format!("{} value must be at most {}", label, rule.value())),
            );
        }
    }

    None
}

fn check_date(text: &str, rules: &DateRules, today: NaiveDate) -> Option<String> {
    match parse_iso_date(text) {
        Some(date) => check_date_bounds(date, rules, today),
        None => Some(INVALID_DATE_MESSAGE.to_string()),
    }
}

fn check_date_bounds(date: NaiveDate, rules: &DateRules, today: NaiveDate) -> Option<String> {
    if let Some(bound) = &rules.min_date
        && date < bound.resolve(today)
    {
        return Some(match bound {
            DateBound::Today => "Date must be today or later".to_string(),
            DateBound::On(min) => format!("Date must be on or after {}", format_iso_date(*min)),
        });
    }

    if let Some(bound) = &rules.max_date
        && date > bound.resolve(today)
    {
        return Some(match bound {
            DateBound::Today => "Date must be today or earlier".to_string(),
            DateBound::On(max) => format!("Date must be on or before {}", format_iso_date(*max)),
        });
    }

    None
}

fn check_date_range(
    range: &Map<String, Value>,
    rules: &DateRules,
    today: NaiveDate,
) -> Option<String> {
    let start = range.get("start").filter(|value| !is_empty(value));
    let end = range.get("end").filter(|value| !is_empty(value));
    let (Some(start), Some(end)) = (start, end) else {
        return Some("Both start and end dates are required".to_string());
    };

    let Some(start) = start.as_str().and_then(parse_iso_date) else {
        return Some(format!("Start date: {}", INVALID_DATE_MESSAGE));
    };
    let Some(end) = end.as_str().and_then(parse_iso_date) else {
        return Some(format!("End date: {}", INVALID_DATE_MESSAGE));
    };

    if start > end {
        return Some("Start date must be on or before end date".to_string());
    }

    if let Some(message) = check_date_bounds(start, rules, today) {
        return Some(format!("Start date: {}", message));
    }
    if let Some(message) = check_date_bounds(end, rules, today) {
        return Some(format!("End date: {}", message));
    }

    None
}
