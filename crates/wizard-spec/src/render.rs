use serde_json::{Map, Value, json};

use crate::{
    engine::WizardEngine,
    navigation::{ProgressReport, can_go_back, can_go_next, get_progress},
    question_set::get_question_set,
    spec::question::{ChoiceOption, QuestionKind, QuestionType},
    state::WizardState,
    template::PromptTemplates,
};

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The current question set awaits input.
    NeedInput,
    /// Navigation ran past the last question.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
        }
    }
}

/// Describes a single question of the current set.
#[derive(Debug, Clone)]
pub struct RenderQuestion {
    pub id: String,
    pub prompt: String,
    pub description: Option<String>,
    pub kind: QuestionType,
    pub required: bool,
    pub conditional_parent_id: Option<String>,
    pub current_value: Option<Value>,
    pub options: Vec<ChoiceOption>,
    pub multiple: bool,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub title: Option<String>,
    pub help: Option<String>,
    pub status: RenderStatus,
    pub progress: ProgressReport,
    pub can_go_next: bool,
    pub can_go_back: bool,
    pub questions: Vec<RenderQuestion>,
}

/// Build the renderer payload for the current question set.
pub fn build_render_payload(engine: &WizardEngine, state: &WizardState) -> RenderPayload {
    let templates = PromptTemplates::new();
    let set = get_question_set(state, None);
    let start = state.current_question_index;

    let questions = set
        .into_iter()
        .enumerate()
        .map(|(offset, question)| {
            let (options, multiple) = match &question.kind {
                QuestionKind::MultipleChoice { options, multiple } => (options.clone(), *multiple),
                _ => (Vec::new(), false),
            };
            RenderQuestion {
                prompt: templates.render(&question.text, &state.answers),
                description: question.description.clone(),
                kind: question.question_type(),
                required: question.required,
                conditional_parent_id: state
                    .flattened_questions
                    .get(start + offset)
                    .and_then(|entry| entry.conditional_parent_id.clone()),
                current_value: state.answers.get(&question.id).cloned(),
                options,
                multiple,
                id: question.id,
            }
        })
        .collect::<Vec<_>>();

    // A collapsed branch can leave the index past the end before `next` has
    // marked the state complete; that still needs input.
    let status = if state.is_complete && state.is_terminal() {
        RenderStatus::Complete
    } else {
        RenderStatus::NeedInput
    };

    RenderPayload {
        title: engine.config().title.clone(),
        help: engine.config().description.clone(),
        status,
        progress: get_progress(state),
        can_go_next: can_go_next(state),
        can_go_back: can_go_back(state),
        questions,
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let questions = payload
        .questions
        .iter()
        .map(|question| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(question.id.clone()));
            map.insert("prompt".into(), Value::String(question.prompt.clone()));
            map.insert(
                "description".into(),
                question
                    .description
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );
            map.insert("type".into(), Value::String(question.kind.as_str().into()));
            map.insert("required".into(), Value::Bool(question.required));
            map.insert(
                "conditionalParentId".into(),
                question
                    .conditional_parent_id
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );
            if let Some(current_value) = &question.current_value {
                map.insert("currentValue".into(), current_value.clone());
            }
            if !question.options.is_empty() {
                map.insert(
                    "options".into(),
                    Value::Array(
                        question
                            .options
                            .iter()
                            .map(|option| {
                                json!({
                                    "value": option.value,
                                    "label": option.label.as_deref().unwrap_or(&option.value),
                                })
                            })
                            .collect(),
                    ),
                );
                map.insert("multiple".into(), Value::Bool(question.multiple));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "title": payload.title,
        "help": payload.help,
        "status": payload.status.as_str(),
        "progress": payload.progress,
        "canGoNext": payload.can_go_next,
        "canGoBack": payload.can_go_back,
        "questions": questions,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    if let Some(title) = &payload.title {
        lines.push(format!("Wizard: {}", title));
    }
    lines.push(format!(
        "Status: {} ({}/{}, {:.0}%)",
        payload.status.as_str(),
        payload.progress.current,
        payload.progress.total,
        payload.progress.percentage
    ));
    if let Some(help) = &payload.help {
        lines.push(format!("Help: {}", help));
    }

    if payload.status == RenderStatus::Complete {
        lines.push("All questions are answered.".to_string());
        return lines.join("\n");
    }

    for question in &payload.questions {
        let indent = if question.conditional_parent_id.is_some() {
            "  "
        } else {
            ""
        };
        let mut entry = format!("{}- {} [{}]", indent, question.prompt, question.kind.as_str());
        if question.required {
            entry.push_str(" *");
        }
        if let Some(value) = &question.current_value {
            entry.push_str(&format!(" = {}", value_to_display(value)));
        }
        lines.push(entry);
        if let Some(description) = &question.description {
            lines.push(format!("{}  {}", indent, description));
        }
    }

    lines.join("\n")
}

pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_display)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
