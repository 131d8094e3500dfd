use std::collections::HashSet;

use crate::answers::Answer;
use crate::spec::question::Question;
use crate::state::WizardState;

/// The entry at `index` (default: current) plus its contiguous visible descendants.
///
/// Returns an empty list when the index is out of bounds.
pub fn get_question_set(state: &WizardState, index: Option<usize>) -> Vec<Question> {
    let start = index.unwrap_or(state.current_question_index);
    let Some(anchor) = state.flattened_questions.get(start) else {
        return Vec::new();
    };

    let mut members: HashSet<&str> = HashSet::from([anchor.id()]);
    let mut set = vec![anchor.question.clone()];
    for entry in &state.flattened_questions[start + 1..] {
        match entry.conditional_parent_id.as_deref() {
            Some(parent) if members.contains(parent) => {
                members.insert(entry.id());
                set.push(entry.question.clone());
            }
            _ => break,
        }
    }
    set
}

/// Stored answers for the current question set, in set order.
pub fn get_current_answers(state: &WizardState) -> Vec<Answer> {
    get_question_set(state, None)
        .iter()
        .filter_map(|question| {
            state
                .answers
                .get(&question.id)
                .map(|value| Answer::new(question.id.clone(), value.clone()))
        })
        .collect()
}
