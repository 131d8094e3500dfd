//! Index transitions over the flattened sequence.
//!
//! Only top-level entries are navigation targets; conditional entries are
//! answered together with their anchor's question set.

use serde::{Deserialize, Serialize};

use crate::state::WizardState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub current: usize,
    pub total: usize,
    pub percentage: f64,
}

pub fn find_next_index(state: &WizardState) -> Option<usize> {
    let total = state.flattened_questions.len();
    let index = state.current_question_index;
    if index + 1 >= total {
        return None;
    }
    (index + 1..total).find(|&candidate| !state.flattened_questions[candidate].is_conditional())
}

pub fn find_prev_index(state: &WizardState) -> Option<usize> {
    let index = state.current_question_index;
    if index < 1 {
        return None;
    }
    (0..index)
        .rev()
        .find(|&candidate| {
            state
                .flattened_questions
                .get(candidate)
                .is_some_and(|entry| !entry.is_conditional())
        })
}

/// Advances to the next top-level entry, or completes the wizard.
///
/// Returns `false` when there was nothing left to move to; the state is then
/// complete and rests on the terminal index.
pub fn next(state: &mut WizardState) -> bool {
    match find_next_index(state) {
        Some(index) => {
            state.current_question_index = index;
            let id = state.flattened_questions[index].id().to_string();
            state.mark_visited(&id);
            true
        }
        None => {
            state.is_complete = true;
            state.current_question_index = state.flattened_questions.len();
            false
        }
    }
}

/// Moves to the previous top-level entry. Leaves `is_complete` untouched.
pub fn back(state: &mut WizardState) -> bool {
    match find_prev_index(state) {
        Some(index) => {
            state.current_question_index = index;
            true
        }
        None => false,
    }
}

pub fn can_go_next(state: &WizardState) -> bool {
    find_next_index(state).is_some()
}

pub fn can_go_back(state: &WizardState) -> bool {
    find_prev_index(state).is_some()
}

pub fn get_progress(state: &WizardState) -> ProgressReport {
    let total = state.flattened_questions.len();
    let current = (state.current_question_index + 1).min(total);
    let percentage = if total > 0 {
        current as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    ProgressReport {
        current,
        total,
        percentage,
    }
}
