pub mod condition;
pub mod config;
pub mod question;

pub use condition::{Condition, ConditionOperator};
pub use config::WizardConfig;
pub use question::{
    ChoiceOption, ConditionalQuestion, DateBound, DateRules, NumberRules, Question, QuestionKind,
    QuestionType, Rule, TextRules,
};
