#![allow(missing_docs)]

pub mod answers;
pub mod dates;
pub mod engine;
pub mod error;
pub mod flatten;
pub mod guards;
pub mod navigation;
pub mod question_set;
pub mod render;
pub mod schema;
pub mod spec;
pub mod state;
pub mod template;
pub mod validate;

pub use answers::{Answer, AnswerStore, ValidationResult};
pub use engine::{
    AnsweredQuestion, WizardEngine, get_answered_questions, get_answers, get_answers_object,
};
pub use error::WizardError;
pub use flatten::{FlattenedQuestion, rebuild};
pub use guards::{TypeCheck, check_type, guard_for};
pub use navigation::{
    ProgressReport, back, can_go_back, can_go_next, find_next_index, find_prev_index,
    get_progress, next,
};
pub use question_set::{get_current_answers, get_question_set};
pub use render::{
    RenderPayload, RenderQuestion, RenderStatus, build_render_payload, render_json_ui,
    render_text,
};
pub use schema::config_schema;
pub use spec::{
    Condition, ConditionOperator, ConditionalQuestion, Question, QuestionKind, QuestionType,
    WizardConfig,
};
pub use state::{WizardSnapshot, WizardState};
pub use template::PromptTemplates;
pub use validate::{validate_answer, validate_answer_on};
