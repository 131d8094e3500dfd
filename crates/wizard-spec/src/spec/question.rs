use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::spec::condition::Condition;

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Text,
    Boolean,
    Number,
    MultipleChoice,
    NumberRange,
    Date,
    DateRange,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Boolean => "boolean",
            QuestionType::Number => "number",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::NumberRange => "number-range",
            QuestionType::Date => "date",
            QuestionType::DateRange => "date-range",
        }
    }
}

/// A rule value that is either bare (`3`) or carries a custom message
/// (`{ "value": 3, "message": "Too short" }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Rule<T> {
    Bare(T),
    Detailed {
        value: T,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl<T> Rule<T> {
    pub fn value(&self) -> &T {
        match self {
            Rule::Bare(value) | Rule::Detailed { value, .. } => value,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Rule::Bare(_) => None,
            Rule::Detailed { message, .. } => message.as_deref(),
        }
    }

    /// Custom message when present, otherwise the supplied default.
    pub fn message_or(&self, default: impl FnOnce() -> String) -> String {
        self.message().map(str::to_string).unwrap_or_else(default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<Rule<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Rule<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Rule<String>>,
}

/// Bounds for `number` answers and for both endpoints of a `number-range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct NumberRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Rule<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Rule<f64>>,
}

/// A date bound: a literal calendar day or the moving `"today"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateBound {
    Today,
    On(NaiveDate),
}

impl DateBound {
    /// Resolves the bound to a concrete day; `today` is evaluated by the caller.
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            DateBound::Today => today,
            DateBound::On(date) => *date,
        }
    }
}

impl TryFrom<String> for DateBound {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("today") {
            return Ok(DateBound::Today);
        }
        dates::parse_iso_date(&value)
            .map(DateBound::On)
            .ok_or_else(|| format!("invalid date bound '{}'", value))
    }
}

impl From<DateBound> for String {
    fn from(bound: DateBound) -> Self {
        match bound {
            DateBound::Today => "today".to_string(),
            DateBound::On(date) => dates::format_iso_date(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct DateRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub min_date: Option<DateBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub max_date: Option<DateBound>,
}

/// A selectable option for `multiple-choice` questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChoiceOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Type tag plus the rules that only make sense for that type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    Text {
        #[serde(default)]
        validation: TextRules,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Boolean,
    Number {
        #[serde(default)]
        validation: NumberRules,
    },
    MultipleChoice {
        #[serde(default)]
        options: Vec<ChoiceOption>,
        #[serde(default)]
        multiple: bool,
    },
    NumberRange {
        #[serde(default)]
        validation: NumberRules,
    },
    Date {
        #[serde(default)]
        validation: DateRules,
    },
    DateRange {
        #[serde(default)]
        validation: DateRules,
    },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::Text { .. } => QuestionType::Text,
            QuestionKind::Boolean => QuestionType::Boolean,
            QuestionKind::Number { .. } => QuestionType::Number,
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::NumberRange { .. } => QuestionType::NumberRange,
            QuestionKind::Date { .. } => QuestionType::Date,
            QuestionKind::DateRange { .. } => QuestionType::DateRange,
        }
    }

    pub fn text() -> Self {
        QuestionKind::Text {
            validation: TextRules::default(),
            placeholder: None,
        }
    }

    pub fn number() -> Self {
        QuestionKind::Number {
            validation: NumberRules::default(),
        }
    }
}

/// A single question; `id` is unique across the whole forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_questions: Vec<ConditionalQuestion>,
}

impl Question {
    pub fn new(id: impl Into<String>, kind: QuestionKind, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            text: text.into(),
            description: None,
            required: false,
            conditional_questions: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_conditional(mut self, condition: Condition, question: Question) -> Self {
        self.conditional_questions.push(ConditionalQuestion {
            condition,
            question,
        });
        self
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }
}

/// A question shown only while `condition` holds against its parent's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionalQuestion {
    pub condition: Condition,
    #[serde(flatten)]
    pub question: Question,
}
