use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Question;

/// Top-level wizard definition: a forest of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct WizardConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl WizardConfig {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }

    /// Looks a question up anywhere in the forest, visible or not.
    pub fn find_question(&self, id: &str) -> Option<&Question> {
        let mut stack: Vec<&Question> = self.questions.iter().rev().collect();
        while let Some(question) = stack.pop() {
            if question.id == id {
                return Some(question);
            }
            stack.extend(
                question
                    .conditional_questions
                    .iter()
                    .rev()
                    .map(|child| &child.question),
            );
        }
        None
    }
}
