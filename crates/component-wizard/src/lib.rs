use serde_json::{Value, json};
use thiserror::Error;

use wizard_spec::{
    Answer, Question, WizardEngine, WizardError, WizardSnapshot, WizardState,
    build_render_payload, get_answers_object, get_current_answers, render_json_ui,
    render_text as wizard_render_text,
};

const DEFAULT_CONFIG: &str = include_str!("../../wizard-spec/tests/fixtures/household.json");

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("failed to parse config: {0}")]
    Config(#[source] WizardError),
    #[error("failed to parse snapshot: {0}")]
    Snapshot(#[source] WizardError),
    #[error("failed to parse answers: {0}")]
    AnswersParse(#[source] serde_json::Error),
    #[error("answers must be an array of {{questionId, value}} or an object keyed by question id")]
    AnswersShape,
    #[error("failed to parse questions: {0}")]
    QuestionsParse(#[source] serde_json::Error),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
}

fn load_engine(config_json: &str) -> Result<WizardEngine, ComponentError> {
    let config_json = if config_json.trim().is_empty() {
        DEFAULT_CONFIG
    } else {
        config_json
    };
    WizardEngine::from_json(config_json).map_err(ComponentError::Config)
}

fn parse_snapshot(snapshot_json: &str) -> Result<WizardSnapshot, ComponentError> {
    if snapshot_json.trim().is_empty() {
        return Ok(WizardSnapshot::default());
    }
    WizardSnapshot::from_json(snapshot_json).map_err(ComponentError::Snapshot)
}

/// Accepts `[{"questionId": .., "value": ..}]` or `{"id": value}`.
pub fn parse_answers(answers_json: &str) -> Result<Vec<Answer>, ComponentError> {
    if answers_json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(answers_json).map_err(ComponentError::AnswersParse)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(ComponentError::AnswersParse),
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(id, value)| Answer::new(id, value))
            .collect()),
        Value::Null => Ok(Vec::new()),
        _ => Err(ComponentError::AnswersShape),
    }
}

fn restore(
    config_json: &str,
    snapshot_json: &str,
) -> Result<(WizardEngine, WizardState), ComponentError> {
    let engine = load_engine(config_json)?;
    let state = engine.restore(parse_snapshot(snapshot_json)?);
    Ok((engine, state))
}

fn state_view(engine: &WizardEngine, state: &WizardState) -> Result<Value, ComponentError> {
    let ui = render_json_ui(&build_render_payload(engine, state));
    let snapshot = serde_json::to_value(state.snapshot()).map_err(ComponentError::JsonEncode)?;
    let current_answers =
        serde_json::to_value(get_current_answers(state)).map_err(ComponentError::JsonEncode)?;
    Ok(json!({
        "title": ui["title"],
        "status": ui["status"],
        "questionSet": ui["questions"],
        "currentAnswers": current_answers,
        "progress": ui["progress"],
        "canGoNext": ui["canGoNext"],
        "canGoBack": ui["canGoBack"],
        "isComplete": state.is_complete,
        "answers": Value::Object(get_answers_object(state)),
        "snapshot": snapshot,
    }))
}

fn with_field(mut view: Value, key: &str, value: Value) -> Value {
    if let Value::Object(map) = &mut view {
        map.insert(key.to_string(), value);
    }
    view
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => {
            tracing::debug!(error = %err, "component call failed");
            json!({ "error": err.to_string() }).to_string()
        }
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

pub fn describe(config_json: &str) -> String {
    respond(load_engine(config_json).and_then(|engine| {
        serde_json::to_value(engine.config()).map_err(ComponentError::JsonEncode)
    }))
}

pub fn init(config_json: &str, answers_json: &str) -> String {
    respond(load_engine(config_json).and_then(|engine| {
        let answers = parse_answers(answers_json)?;
        let state = engine.init_state(Some(answers));
        state_view(&engine, &state)
    }))
}

pub fn answer(config_json: &str, snapshot_json: &str, answers_json: &str) -> String {
    respond(restore(config_json, snapshot_json).and_then(|(engine, mut state)| {
        let answers = parse_answers(answers_json)?;
        let results = engine.answer_questions(&mut state, answers);
        let results = serde_json::to_value(results).map_err(ComponentError::JsonEncode)?;
        Ok(with_field(state_view(&engine, &state)?, "results", results))
    }))
}

pub fn next(config_json: &str, snapshot_json: &str) -> String {
    respond(restore(config_json, snapshot_json).and_then(|(engine, mut state)| {
        let moved = wizard_spec::next(&mut state);
        Ok(with_field(state_view(&engine, &state)?, "moved", Value::Bool(moved)))
    }))
}

pub fn back(config_json: &str, snapshot_json: &str) -> String {
    respond(restore(config_json, snapshot_json).and_then(|(engine, mut state)| {
        let moved = wizard_spec::back(&mut state);
        Ok(with_field(state_view(&engine, &state)?, "moved", Value::Bool(moved)))
    }))
}

pub fn reset(config_json: &str, answers_json: &str) -> String {
    respond(load_engine(config_json).and_then(|engine| {
        let answers = parse_answers(answers_json)?;
        let mut state = WizardState::default();
        engine.reset(&mut state, Some(answers));
        state_view(&engine, &state)
    }))
}

pub fn add_questions(config_json: &str, snapshot_json: &str, questions_json: &str) -> String {
    respond(restore(config_json, snapshot_json).and_then(|(mut engine, mut state)| {
        let questions: Vec<Question> =
            serde_json::from_str(questions_json).map_err(ComponentError::QuestionsParse)?;
        engine.add_questions(&mut state, questions);
        let config = serde_json::to_value(engine.config()).map_err(ComponentError::JsonEncode)?;
        Ok(with_field(state_view(&engine, &state)?, "config", config))
    }))
}

pub fn view(config_json: &str, snapshot_json: &str) -> String {
    respond(
        restore(config_json, snapshot_json)
            .and_then(|(engine, state)| state_view(&engine, &state)),
    )
}

pub fn render_text(config_json: &str, snapshot_json: &str) -> String {
    respond_string(
        restore(config_json, snapshot_json)
            .map(|(engine, state)| wizard_render_text(&build_render_payload(&engine, &state))),
    )
}
