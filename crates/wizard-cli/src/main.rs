mod wizard;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;
use wizard::{Verbosity, WizardPayload, WizardPresenter};
use wizard_spec::{WizardEngine, config_schema};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Conditional wizard CLI",
    long_about = "Runs, flattens and validates conditional questionnaire configs backed by the wizard component"
)]
struct Cli {
    /// Emit debug logs (RUST_LOG overrides).
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a wizard config interactively in the terminal.
    Run {
        /// Path to the wizard config JSON.
        #[arg(long, value_name = "CONFIG")]
        config: PathBuf,
        /// Optional JSON file containing initial answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Also emit answer JSON when the wizard completes.
        #[arg(long)]
        answers_json: bool,
    },
    /// Print the currently visible question sequence.
    Flatten {
        /// Path to the wizard config JSON.
        #[arg(long, value_name = "CONFIG")]
        config: PathBuf,
        /// Optional JSON file containing answers that drive visibility.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
    /// Validate answers against a wizard config.
    Validate {
        /// Path to the wizard config JSON.
        #[arg(long, value_name = "CONFIG")]
        config: PathBuf,
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Print the JSON Schema of the wizard config format.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Run {
            config,
            answers,
            answers_json,
        } => run_wizard(config, answers, cli.verbose, answers_json),
        Command::Flatten { config, answers } => run_flatten(config, answers),
        Command::Validate { config, answers } => run_validate(config, answers),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&config_schema())?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_optional(path: Option<PathBuf>) -> CliResult<String> {
    Ok(match path {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    })
}

fn component_view(response: String) -> CliResult<Value> {
    let view: Value = serde_json::from_str(&response)?;
    if let Some(error) = view.get("error").and_then(Value::as_str) {
        return Err(error.into());
    }
    Ok(view)
}

fn run_wizard(
    config: PathBuf,
    answers: Option<PathBuf>,
    verbose: bool,
    answers_json: bool,
) -> CliResult<()> {
    let config_json = fs::read_to_string(config)?;
    let answers = read_optional(answers)?;
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose), answers_json);
    let mut view = component_view(component_wizard::init(&config_json, &answers))?;
    let mut asked: HashSet<String> = HashSet::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let payload = WizardPayload::from_json(&view)?;
        presenter.show_header(&payload);
        if payload.is_complete() {
            presenter.show_completion(&view);
            return Ok(());
        }

        let snapshot = view["snapshot"].to_string();
        let Some(question) = payload
            .questions
            .iter()
            .find(|question| !asked.contains(&question.id))
        else {
            // Every question of the current set has an answer; move on.
            view = component_view(component_wizard::next(&config_json, &snapshot))?;
            asked.clear();
            continue;
        };

        if asked.is_empty() {
            presenter.show_status(&payload);
        }
        presenter.show_prompt(question, &payload.progress);
        let line = lines
            .next()
            .ok_or("input closed before the wizard completed")??;

        if line.trim() == ":back" {
            view = component_view(component_wizard::back(&config_json, &snapshot))?;
            asked.clear();
            continue;
        }

        let value = match question.parse_answer(&line) {
            Ok(value) => value,
            Err(err) => {
                presenter.show_parse_error(&err);
                continue;
            }
        };
        tracing::debug!(question_id = %question.id, "submitting answer");
        let mut submission = Map::new();
        submission.insert(question.id.clone(), value);
        let answered = component_view(component_wizard::answer(
            &config_json,
            &snapshot,
            &Value::Object(submission).to_string(),
        ))?;

        match answered["results"][0]["error"].as_str() {
            Some(message) => presenter.show_validation_error(message),
            None => {
                asked.insert(question.id.clone());
            }
        }
        view = answered;
    }
}

fn run_flatten(config: PathBuf, answers: Option<PathBuf>) -> CliResult<()> {
    let engine = WizardEngine::from_json(&fs::read_to_string(config)?)?;
    let answers = component_wizard::parse_answers(&read_optional(answers)?)?;
    let state = engine.init_state(Some(answers));

    let mut depths: HashMap<&str, usize> = HashMap::new();
    for entry in &state.flattened_questions {
        let depth = entry
            .conditional_parent_id
            .as_deref()
            .and_then(|parent| depths.get(parent))
            .map_or(0, |depth| depth + 1);
        depths.insert(entry.id(), depth);

        let mut line = format!(
            "{}- {} [{}]",
            "  ".repeat(depth),
            entry.id(),
            entry.question.question_type().as_str()
        );
        if entry.question.required {
            line.push_str(" *");
        }
        if let Some(value) = state.answers.get(entry.id()) {
            line.push_str(&format!(" = {}", value));
        }
        println!("{}", line);
    }
    Ok(())
}

fn run_validate(config: PathBuf, answers: PathBuf) -> CliResult<()> {
    let engine = WizardEngine::from_json(&fs::read_to_string(config)?)?;
    let answers = component_wizard::parse_answers(&fs::read_to_string(answers)?)?;

    let (known, unknown): (Vec<_>, Vec<_>) = answers
        .into_iter()
        .partition(|answer| engine.find_question(&answer.question_id).is_some());
    for answer in &unknown {
        println!("skip {} (unknown question)", answer.question_id);
    }

    let ids: Vec<String> = known
        .iter()
        .map(|answer| answer.question_id.clone())
        .collect();
    let mut state = engine.init_state(None);
    let results = engine.answer_questions(&mut state, known);

    let mut failures = 0;
    for (id, result) in ids.iter().zip(&results) {
        match &result.error {
            None => println!("ok   {}", id),
            Some(message) => {
                failures += 1;
                println!("FAIL {}: {}", id, message);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} answer(s) failed validation", failures).into());
    }
    println!("All {} answer(s) are valid.", results.len());
    Ok(())
}
