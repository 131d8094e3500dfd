use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A submitted or stored answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub value: Value,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// Outcome of validating a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Answers keyed by question id, in first-insertion order.
///
/// Answers are kept even when their question is no longer visible.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    values: Map<String, Value>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_answers(answers: impl IntoIterator<Item = Answer>) -> Self {
        let mut store = Self::new();
        for answer in answers {
            store.insert(answer.question_id, answer.value);
        }
        store
    }

    /// Stores `value`, replacing any earlier answer for the same id in place.
    pub fn insert(&mut self, question_id: impl Into<String>, value: Value) {
        self.values.insert(question_id.into(), value);
    }

    pub fn get(&self, question_id: &str) -> Option<&Value> {
        self.values.get(question_id)
    }

    /// Like [`AnswerStore::get`] but treats a stored `null` as unanswered.
    pub fn answered(&self, question_id: &str) -> Option<&Value> {
        self.get(question_id).filter(|value| !value.is_null())
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.values.contains_key(question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn to_answers(&self) -> Vec<Answer> {
        self.values
            .iter()
            .map(|(id, value)| Answer::new(id.clone(), value.clone()))
            .collect()
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.values
    }
}
