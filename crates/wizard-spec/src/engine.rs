use serde::Serialize;
use serde_json::{Map, Value};

use crate::answers::{Answer, AnswerStore, ValidationResult};
use crate::error::WizardError;
use crate::flatten::{FlattenedQuestion, rebuild};
use crate::spec::config::WizardConfig;
use crate::spec::question::Question;
use crate::state::{WizardSnapshot, WizardState};
use crate::validate::validate_answer;

/// Owns the question forest and drives [`WizardState`] values through it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardEngine {
    config: WizardConfig,
}

impl WizardEngine {
    pub fn new(config: WizardConfig) -> Self {
        Self { config }
    }

    pub fn from_json(text: &str) -> Result<Self, WizardError> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(WizardError::ConfigParse)
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn find_question(&self, id: &str) -> Option<&Question> {
        self.config.find_question(id)
    }

    pub fn init_state(&self, answers: Option<Vec<Answer>>) -> WizardState {
        let answers = AnswerStore::from_answers(answers.unwrap_or_default());
        let flattened_questions = rebuild(&self.config, &answers);
        WizardState {
            current_question_index: 0,
            answers,
            flattened_questions,
            visited_questions: Vec::new(),
            is_complete: false,
        }
    }

    /// Validates and stores a batch of answers, then rebuilds visibility once.
    ///
    /// Answers for ids not present anywhere in the config are dropped without
    /// a result entry.
    pub fn answer_questions(
        &self,
        state: &mut WizardState,
        answers: impl IntoIterator<Item = Answer>,
    ) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        for answer in answers {
            let Some(question) = self.config.find_question(&answer.question_id) else {
                tracing::debug!(question_id = %answer.question_id, "dropping answer for unknown question");
                continue;
            };
            let result = validate_answer(question, &answer.value);
            if result.is_valid {
                state.answers.insert(answer.question_id, answer.value);
            } else {
                tracing::debug!(
                    question_id = %answer.question_id,
                    error = result.error.as_deref().unwrap_or_default(),
                    "rejected answer"
                );
            }
            results.push(result);
        }
        self.refresh(state);
        results
    }

    pub fn reset(&self, state: &mut WizardState, answers: Option<Vec<Answer>>) {
        *state = self.init_state(answers);
    }

    /// Appends top-level questions; position, answers and history are kept.
    pub fn add_questions(&mut self, state: &mut WizardState, questions: Vec<Question>) {
        self.config.questions.extend(questions);
        self.refresh(state);
    }

    /// Recomputes the flattened sequence from config and stored answers.
    pub fn refresh(&self, state: &mut WizardState) {
        state.flattened_questions = rebuild(&self.config, &state.answers);
    }

    /// Rebuilds a state from a persisted snapshot, clamping the index to the
    /// terminal position.
    pub fn restore(&self, snapshot: WizardSnapshot) -> WizardState {
        let mut state = self.init_state(Some(snapshot.answers));
        state.current_question_index = snapshot
            .current_question_index
            .min(state.flattened_questions.len());
        for id in &snapshot.visited_questions {
            state.mark_visited(id);
        }
        state.is_complete = snapshot.is_complete;
        state
    }
}

/// A visible question paired with its stored answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub question: FlattenedQuestion,
    pub value: Value,
}

pub fn get_answers(state: &WizardState) -> Vec<Answer> {
    state.answers.to_answers()
}

/// Every stored answer keyed by id, including answers of hidden questions.
pub fn get_answers_object(state: &WizardState) -> Map<String, Value> {
    state.answers.as_object().clone()
}

pub fn get_answered_questions(state: &WizardState) -> Vec<AnsweredQuestion> {
    state
        .flattened_questions
        .iter()
        .filter_map(|entry| {
            state.answers.answered(entry.id()).map(|value| AnsweredQuestion {
                question: entry.clone(),
                value: value.clone(),
            })
        })
        .collect()
}
