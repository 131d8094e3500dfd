use serde_json::{Value, json};

use wizard_spec::{
    Answer, Condition, ConditionOperator, Question, QuestionKind, RenderStatus, WizardConfig,
    WizardEngine, WizardSnapshot, back, build_render_payload, can_go_back, can_go_next,
    get_answered_questions, get_answers, get_answers_object, get_current_answers, get_progress,
    get_question_set, next,
};

fn fixture_engine() -> WizardEngine {
    WizardEngine::from_json(include_str!("fixtures/household.json")).expect("fixture config")
}

fn ids(state: &wizard_spec::WizardState) -> Vec<&str> {
    state
        .flattened_questions
        .iter()
        .map(|entry| entry.id())
        .collect()
}

fn set_ids(questions: &[Question]) -> Vec<String> {
    questions.iter().map(|question| question.id.clone()).collect()
}

fn text(id: &str) -> Question {
    Question::new(id, QuestionKind::text(), id)
}

fn boolean(id: &str) -> Question {
    Question::new(id, QuestionKind::Boolean, id)
}

#[test]
fn linear_flow_reports_progress() {
    let engine = WizardEngine::new(WizardConfig::new(vec![
        text("q1").required(),
        Question::new("q2", QuestionKind::number(), "q2").required(),
    ]));
    let mut state = engine.init_state(None);

    assert_eq!(set_ids(&get_question_set(&state, None)), vec!["q1"]);
    let progress = get_progress(&state);
    assert_eq!((progress.current, progress.total), (1, 2));
    assert_eq!(progress.percentage, 50.0);

    let results = engine.answer_questions(&mut state, vec![Answer::new("q1", "J")]);
    assert!(results[0].is_valid);
    assert!(next(&mut state));

    let progress = get_progress(&state);
    assert_eq!((progress.current, progress.total), (2, 2));
    assert_eq!(progress.percentage, 100.0);
    assert_eq!(state.visited_questions, vec!["q2"]);
}

#[test]
fn unanswered_boolean_shows_children_eagerly() {
    let engine = WizardEngine::new(WizardConfig::new(vec![
        boolean("q1").with_conditional(Condition::equals(true), text("c1")),
    ]));
    let mut state = engine.init_state(None);
    assert_eq!(ids(&state), vec!["q1", "c1"]);

    engine.answer_questions(&mut state, vec![Answer::new("q1", false)]);
    assert_eq!(ids(&state), vec!["q1"]);

    engine.answer_questions(&mut state, vec![Answer::new("q1", true)]);
    assert_eq!(ids(&state), vec!["q1", "c1"]);
    assert_eq!(state.flattened_questions[1].conditional_parent_id.as_deref(), Some("q1"));
}

#[test]
fn unanswered_non_boolean_hides_children() {
    let engine = WizardEngine::new(WizardConfig::new(vec![
        Question::new("age", QuestionKind::number(), "Age").with_conditional(
            Condition::new(ConditionOperator::GreaterThan, 17),
            text("licence"),
        ),
    ]));
    let mut state = engine.init_state(None);
    assert_eq!(ids(&state), vec!["age"]);

    engine.answer_questions(&mut state, vec![Answer::new("age", 30)]);
    assert_eq!(ids(&state), vec!["age", "licence"]);
}

#[test]
fn flipping_root_hides_nested_branch_but_keeps_answers() {
    let engine = fixture_engine();
    let mut state = engine.init_state(None);
    assert_eq!(
        ids(&state),
        vec!["name", "has_pets", "has_dog", "dog_name", "rooms", "budget", "move_in", "color"]
    );

    engine.answer_questions(
        &mut state,
        vec![
            Answer::new("has_pets", true),
            Answer::new("has_dog", true),
            Answer::new("dog_name", "Rex"),
        ],
    );
    assert_eq!(&ids(&state)[..4], &["name", "has_pets", "has_dog", "dog_name"]);

    engine.answer_questions(&mut state, vec![Answer::new("has_pets", false)]);
    assert_eq!(
        ids(&state),
        vec!["name", "has_pets", "rooms", "budget", "move_in", "color"]
    );

    let answers = get_answers_object(&state);
    assert_eq!(answers["dog_name"], json!("Rex"));
    assert_eq!(answers["has_dog"], json!(true));
    assert_eq!(answers["has_pets"], json!(false));
}

#[test]
fn question_set_groups_visible_descendants() {
    let engine = fixture_engine();
    let mut state = engine.init_state(None);
    engine.answer_questions(&mut state, vec![Answer::new("name", "Ada")]);

    assert!(next(&mut state));
    assert_eq!(state.current_question_index, 1);
    assert_eq!(
        set_ids(&get_question_set(&state, None)),
        vec!["has_pets", "has_dog", "dog_name"]
    );
    assert_eq!(set_ids(&get_question_set(&state, Some(4))), vec!["rooms"]);
    assert!(get_question_set(&state, Some(99)).is_empty());

    // Conditional entries are skipped by navigation.
    assert!(next(&mut state));
    assert_eq!(state.flattened_questions[state.current_question_index].id(), "rooms");
}

#[test]
fn unknown_ids_are_dropped_and_invalid_answers_not_stored() {
    let engine = fixture_engine();
    let mut state = engine.init_state(None);

    let results = engine.answer_questions(
        &mut state,
        vec![
            Answer::new("ghost", "boo"),
            Answer::new("name", "A"),
            Answer::new("rooms", 3),
        ],
    );
    assert_eq!(results.len(), 2);
    assert!(!results[0].is_valid);
    assert_eq!(results[0].error.as_deref(), Some("Must be at least 2 characters"));
    assert!(results[1].is_valid);

    let answers = get_answers_object(&state);
    assert!(!answers.contains_key("ghost"));
    assert!(!answers.contains_key("name"));
    assert_eq!(answers["rooms"], json!(3));
}

#[test]
fn hidden_questions_still_accept_answers() {
    let engine = fixture_engine();
    let mut state = engine.init_state(Some(vec![Answer::new("has_pets", false)]));
    assert!(!ids(&state).contains(&"dog_name"));

    let results = engine.answer_questions(&mut state, vec![Answer::new("dog_name", "Rex")]);
    assert!(results[0].is_valid);
    assert_eq!(get_answers_object(&state)["dog_name"], json!("Rex"));
}

#[test]
fn next_at_end_completes_and_back_keeps_completion() {
    let engine = WizardEngine::new(WizardConfig::new(vec![text("a"), text("b")]));
    let mut state = engine.init_state(None);

    assert!(!can_go_back(&state));
    assert!(!back(&mut state));
    assert!(next(&mut state));
    assert!(!can_go_next(&state));
    assert!(!next(&mut state));
    assert!(state.is_complete);
    assert_eq!(state.current_question_index, 2);
    assert_eq!(get_progress(&state).percentage, 100.0);

    assert!(back(&mut state));
    assert_eq!(state.current_question_index, 1);
    assert!(state.is_complete);
}

#[test]
fn trailing_conditionals_complete_the_wizard() {
    let engine = WizardEngine::new(WizardConfig::new(vec![
        boolean("q1").with_conditional(Condition::equals(true), text("c1")),
    ]));
    let mut state = engine.init_state(None);
    assert!(!can_go_next(&state));
    assert!(!next(&mut state));
    assert!(state.is_complete);
    assert_eq!(state.current_question_index, 2);
    assert!(get_question_set(&state, None).is_empty());
}

#[test]
fn visited_questions_never_repeat() {
    let engine = WizardEngine::new(WizardConfig::new(vec![text("a"), text("b"), text("c")]));
    let mut state = engine.init_state(None);
    for _ in 0..3 {
        next(&mut state);
        next(&mut state);
        back(&mut state);
        back(&mut state);
    }
    assert_eq!(state.visited_questions, vec!["b", "c"]);
}

#[test]
fn progress_stays_within_bounds() {
    let empty = WizardEngine::default();
    let mut state = empty.init_state(None);
    let progress = get_progress(&state);
    assert_eq!((progress.current, progress.total, progress.percentage), (0, 0, 0.0));
    assert!(!next(&mut state));
    assert!(state.is_complete);

    let engine = fixture_engine();
    let mut state = engine.init_state(None);
    loop {
        let progress = get_progress(&state);
        assert!((0.0..=100.0).contains(&progress.percentage));
        assert_eq!(
            progress.percentage == 100.0,
            progress.current == progress.total
        );
        if !next(&mut state) {
            break;
        }
    }
}

#[test]
fn reset_replaces_answers_and_history() {
    let engine = fixture_engine();
    let mut state = engine.init_state(None);
    engine.answer_questions(&mut state, vec![Answer::new("name", "Ada")]);
    next(&mut state);
    next(&mut state);

    engine.reset(&mut state, Some(vec![Answer::new("has_pets", false)]));
    assert_eq!(state.current_question_index, 0);
    assert!(state.visited_questions.is_empty());
    assert!(!state.is_complete);
    assert_eq!(get_answers(&state), vec![Answer::new("has_pets", false)]);
    assert!(!ids(&state).contains(&"has_dog"));

    engine.reset(&mut state, None);
    assert!(get_answers(&state).is_empty());
}

#[test]
fn add_questions_preserves_position() {
    let mut engine = WizardEngine::new(WizardConfig::new(vec![text("a"), text("b")]));
    let mut state = engine.init_state(None);
    engine.answer_questions(&mut state, vec![Answer::new("a", "x")]);
    next(&mut state);

    engine.add_questions(&mut state, vec![text("c")]);
    assert_eq!(ids(&state), vec!["a", "b", "c"]);
    assert_eq!(state.current_question_index, 1);
    assert_eq!(state.visited_questions, vec!["b"]);
    assert!(can_go_next(&state));

    // New questions are recognised by answerQuestions.
    let results = engine.answer_questions(&mut state, vec![Answer::new("c", "z")]);
    assert_eq!(results.len(), 1);
}

#[test]
fn current_and_answered_views() {
    let engine = fixture_engine();
    let mut state = engine.init_state(Some(vec![
        Answer::new("name", "Ada"),
        Answer::new("has_pets", true),
        Answer::new("dog_name", Value::Null),
    ]));
    next(&mut state);

    let current = get_current_answers(&state);
    assert_eq!(
        current,
        vec![Answer::new("has_pets", true), Answer::new("dog_name", Value::Null)]
    );

    let answered: Vec<_> = get_answered_questions(&state)
        .into_iter()
        .map(|answered| answered.question.id().to_string())
        .collect();
    assert_eq!(answered, vec!["name", "has_pets"]);
}

#[test]
fn snapshot_restores_state_without_flattened_list() {
    let engine = fixture_engine();
    let mut state = engine.init_state(None);
    engine.answer_questions(
        &mut state,
        vec![Answer::new("name", "Ada"), Answer::new("has_pets", false)],
    );
    next(&mut state);
    next(&mut state);

    let snapshot = state.snapshot();
    let json = snapshot.to_json().expect("json");
    assert!(!json.contains("flattened"));
    let restored = engine.restore(WizardSnapshot::from_json(&json).expect("parse"));
    assert_eq!(restored, state);

    let bytes = snapshot.to_cbor().expect("cbor");
    let decoded = WizardSnapshot::from_cbor(&bytes).expect("decode");
    assert_eq!(decoded, snapshot);
}

#[test]
fn restore_clamps_index_to_terminal() {
    let engine = WizardEngine::new(WizardConfig::new(vec![text("a")]));
    let state = engine.restore(WizardSnapshot {
        current_question_index: 40,
        answers: Vec::new(),
        visited_questions: vec!["a".into(), "a".into()],
        is_complete: true,
    });
    assert_eq!(state.current_question_index, 1);
    assert_eq!(state.visited_questions, vec!["a"]);
}

#[test]
fn config_round_trips_through_json() {
    let engine = fixture_engine();
    let value = serde_json::to_value(engine.config()).expect("encode");
    assert_eq!(value["questions"][1]["type"], "boolean");
    assert_eq!(
        value["questions"][1]["conditionalQuestions"][0]["condition"]["operator"],
        "equals"
    );
    let decoded: WizardConfig = serde_json::from_value(value).expect("decode");
    assert_eq!(&decoded, engine.config());
}

#[test]
fn unsupported_operator_hides_child() {
    let engine = WizardEngine::from_json(
        &json!({
            "questions": [
                { "id": "code", "type": "text", "text": "Code?",
                  "conditionalQuestions": [
                    { "condition": { "operator": "matchesRegex", "value": ".*" },
                      "id": "detail", "type": "text", "text": "Detail?" }
                  ] }
            ]
        })
        .to_string(),
    )
    .expect("config");
    let mut state = engine.init_state(None);
    engine.answer_questions(&mut state, vec![Answer::new("code", "abc")]);
    assert_eq!(ids(&state), vec!["code"]);
}

#[test]
fn collapsed_branch_past_end_still_needs_input() {
    let engine = WizardEngine::new(WizardConfig::new(vec![
        boolean("b")
            .with_conditional(Condition::equals(true), text("c1"))
            .with_conditional(Condition::equals(true), text("c2")),
        text("d"),
    ]));
    let mut state = engine.init_state(Some(vec![Answer::new("b", true)]));
    assert!(next(&mut state));
    assert_eq!(state.current_question_index, 3);

    engine.answer_questions(&mut state, vec![Answer::new("b", false)]);
    assert_eq!(ids(&state), vec!["b", "d"]);
    assert!(state.is_terminal());
    assert!(!state.is_complete);
    let payload = build_render_payload(&engine, &state);
    assert_eq!(payload.status, RenderStatus::NeedInput);

    assert!(!next(&mut state));
    assert!(state.is_complete);
    assert_eq!(state.current_question_index, 2);
    let payload = build_render_payload(&engine, &state);
    assert_eq!(payload.status, RenderStatus::Complete);
}
