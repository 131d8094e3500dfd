use serde::Serialize;

use crate::answers::AnswerStore;
use crate::spec::config::WizardConfig;
use crate::spec::question::{Question, QuestionType};

/// A visible question annotated with the anchor it hangs off.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedQuestion {
    pub question: Question,
    pub conditional_parent_id: Option<String>,
}

impl FlattenedQuestion {
    pub fn id(&self) -> &str {
        &self.question.id
    }

    pub fn is_conditional(&self) -> bool {
        self.conditional_parent_id.is_some()
    }
}

/// Computes the currently visible question sequence.
///
/// The walk is depth-first so every visible child directly follows its
/// anchor. Children of an unanswered boolean are all included.
pub fn rebuild(config: &WizardConfig, answers: &AnswerStore) -> Vec<FlattenedQuestion> {
    let mut flattened = Vec::new();
    let mut stack: Vec<(&Question, Option<&str>)> = config
        .questions
        .iter()
        .rev()
        .map(|question| (question, None))
        .collect();

    while let Some((question, parent_id)) = stack.pop() {
        flattened.push(FlattenedQuestion {
            question: question.clone(),
            conditional_parent_id: parent_id.map(str::to_string),
        });

        if question.conditional_questions.is_empty() {
            continue;
        }

        let answer = answers.answered(&question.id);
        let eager = answer.is_none() && question.question_type() == QuestionType::Boolean;
        stack.extend(
            question
                .conditional_questions
                .iter()
                .rev()
                .filter(|child| eager || child.condition.evaluate(answer))
                .map(|child| (&child.question, Some(question.id.as_str()))),
        );
    }

    tracing::debug!(visible = flattened.len(), "rebuilt flattened questions");
    flattened
}
