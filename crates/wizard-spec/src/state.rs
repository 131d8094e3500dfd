use serde::{Deserialize, Serialize};

use crate::answers::{Answer, AnswerStore};
use crate::error::WizardError;
use crate::flatten::FlattenedQuestion;

/// Mutable session state; owned by exactly one caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardState {
    /// May equal `flattened_questions.len()` once the wizard is complete.
    pub current_question_index: usize,
    pub answers: AnswerStore,
    pub flattened_questions: Vec<FlattenedQuestion>,
    pub visited_questions: Vec<String>,
    pub is_complete: bool,
}

impl WizardState {
    pub fn is_terminal(&self) -> bool {
        self.current_question_index >= self.flattened_questions.len()
    }

    pub(crate) fn mark_visited(&mut self, question_id: &str) {
        if !self.visited_questions.iter().any(|id| id == question_id) {
            self.visited_questions.push(question_id.to_string());
        }
    }

    /// Persistable view of the state; the flattened sequence is left out.
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            current_question_index: self.current_question_index,
            answers: self.answers.to_answers(),
            visited_questions: self.visited_questions.clone(),
            is_complete: self.is_complete,
        }
    }
}

/// What a caller persists between sessions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    #[serde(default)]
    pub current_question_index: usize,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub visited_questions: Vec<String>,
    #[serde(default)]
    pub is_complete: bool,
}

impl WizardSnapshot {
    pub fn to_json(&self) -> Result<String, WizardError> {
        serde_json::to_string(self).map_err(WizardError::Json)
    }

    pub fn from_json(text: &str) -> Result<Self, WizardError> {
        serde_json::from_str(text).map_err(WizardError::SnapshotParse)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, WizardError> {
        serde_cbor::to_vec(self).map_err(WizardError::Cbor)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, WizardError> {
        serde_cbor::from_slice(bytes).map_err(WizardError::Cbor)
    }
}
