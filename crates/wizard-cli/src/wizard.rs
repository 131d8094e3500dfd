use std::fmt::Write;

use serde_json::{Number, Value, json};
use wizard_spec::WizardSnapshot;

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: status line and descriptions.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints prompts and outcomes for the interactive runner.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
    show_answers_json: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, show_answers_json: bool) -> Self {
        Self {
            verbosity,
            header_printed: false,
            show_answers_json,
        }
    }

    pub fn show_header(&mut self, payload: &WizardPayload) {
        if self.header_printed {
            return;
        }
        if let Some(title) = &payload.title {
            println!("Wizard: {}", title);
        }
        println!("Type :back to return to the previous question.");
        self.header_printed = true;
    }

    pub fn show_status(&self, payload: &WizardPayload) {
        if self.verbosity.is_verbose() {
            println!(
                "Status: {} ({}/{}, {:.0}%)",
                payload.status,
                payload.progress.current,
                payload.progress.total,
                payload.progress.percentage
            );
        }
    }

    pub fn show_prompt(&self, question: &WizardQuestion, progress: &ViewProgress) {
        let indent = if question.conditional_parent_id.is_some() {
            "  "
        } else {
            ""
        };
        let mut line = format!(
            "{}{}/{} {}",
            indent, progress.current, progress.total, question.prompt
        );
        if question.required {
            line.push_str(" *");
        }
        if let Some(hint) = question.hint() {
            line.push(' ');
            line.push_str(&hint);
        }
        println!("{}", line);
        if self.verbosity.is_verbose()
            && let Some(description) = &question.description
        {
            println!("{}{}", indent, description);
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
    }

    pub fn show_validation_error(&self, message: &str) {
        eprintln!("Invalid answer: {}", message);
    }

    pub fn show_completion(&self, view: &Value) {
        println!("Done ✅");
        match serde_json::from_value::<WizardSnapshot>(view["snapshot"].clone())
            .map_err(|err| err.to_string())
            .and_then(|snapshot| snapshot.to_cbor().map_err(|err| err.to_string()))
        {
            Ok(bytes) => println!("Snapshot (CBOR hex): {}", encode_hex(&bytes)),
            Err(err) => eprintln!("Failed to serialize snapshot to CBOR: {}", err),
        }
        if self.show_answers_json {
            match serde_json::to_string_pretty(&view["answers"]) {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => eprintln!("Failed to serialize answers to JSON: {}", err),
            }
        }
    }
}

/// Progress counters from a component view.
pub struct ViewProgress {
    pub current: u64,
    pub total: u64,
    pub percentage: f64,
}

/// The parts of a component view the runner needs.
pub struct WizardPayload {
    pub title: Option<String>,
    pub status: String,
    pub progress: ViewProgress,
    pub questions: Vec<WizardQuestion>,
}

impl WizardPayload {
    pub fn from_json(json: &Value) -> Result<Self, String> {
        if let Some(error) = json.get("error").and_then(Value::as_str) {
            return Err(error.to_string());
        }
        let title = json
            .get("title")
            .and_then(Value::as_str)
            .map(String::from);
        let status = json
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("need_input")
            .to_string();
        let progress = json
            .get("progress")
            .and_then(Value::as_object)
            .ok_or_else(|| "wizard view missing progress".to_string())?;
        let progress = ViewProgress {
            current: progress.get("current").and_then(Value::as_u64).unwrap_or(0),
            total: progress.get("total").and_then(Value::as_u64).unwrap_or(0),
            percentage: progress
                .get("percentage")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        };
        let questions = json
            .get("questionSet")
            .and_then(Value::as_array)
            .ok_or_else(|| "wizard view missing questionSet".to_string())?
            .iter()
            .map(WizardQuestion::from_json)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            title,
            status,
            progress,
            questions,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.status == "complete"
    }
}

/// Minimal view of a question used for prompting.
pub struct WizardQuestion {
    pub id: String,
    pub prompt: String,
    pub description: Option<String>,
    pub kind: String,
    pub required: bool,
    pub conditional_parent_id: Option<String>,
    pub options: Vec<String>,
    pub multiple: bool,
}

impl WizardQuestion {
    fn from_json(value: &Value) -> Result<Self, String> {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| "question missing id".to_string())?
            .to_string();
        let prompt = value
            .get("prompt")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("question '{}' missing prompt", id))?
            .to_string();
        let options = value
            .get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| option.get("value").and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            id,
            prompt,
            description: value
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            kind: value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("text")
                .to_string(),
            required: value
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            conditional_parent_id: value
                .get("conditionalParentId")
                .and_then(Value::as_str)
                .map(String::from),
            options,
            multiple: value
                .get("multiple")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    fn hint(&self) -> Option<String> {
        match self.kind.as_str() {
            "boolean" => Some("(yes/no)".to_string()),
            "number" => Some("(number)".to_string()),
            "number-range" => Some("(min..max)".to_string()),
            "date" => Some("(YYYY-MM-DD)".to_string()),
            "date-range" => Some("(YYYY-MM-DD..YYYY-MM-DD)".to_string()),
            "multiple-choice" if !self.options.is_empty() => {
                let separator = if self.multiple { ", " } else { "/" };
                Some(format!("({})", self.options.join(separator)))
            }
            _ => None,
        }
    }

    /// Turns a line of user input into the JSON value expected for this question.
    ///
    /// A blank line submits `null`, which the engine treats as "no answer".
    pub fn parse_answer(&self, input: &str) -> Result<Value, AnswerParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Value::Null);
        }
        match self.kind.as_str() {
            "boolean" => parse_bool(input).map(Value::Bool),
            "number" => parse_number(input),
            "number-range" => {
                let (min, max) = split_range(input)?;
                Ok(json!({ "min": parse_number(min)?, "max": parse_number(max)? }))
            }
            "date-range" => {
                let (start, end) = split_range(input)?;
                Ok(json!({ "start": start, "end": end }))
            }
            "multiple-choice" if self.multiple => Ok(Value::Array(
                input
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| Value::String(item.to_string()))
                    .collect(),
            )),
            _ => Ok(Value::String(input.to_string())),
        }
    }
}

fn parse_bool(input: &str) -> Result<bool, AnswerParseError> {
    match input.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err(AnswerParseError::new("answer yes or no")),
    }
}

fn parse_number(input: &str) -> Result<Value, AnswerParseError> {
    let input = input.trim();
    if let Ok(integer) = input.parse::<i64>() {
        return Ok(Value::Number(integer.into()));
    }
    input
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| AnswerParseError::new(format!("'{}' is not a number", input)))
}

fn split_range(input: &str) -> Result<(&str, &str), AnswerParseError> {
    input
        .split_once("..")
        .map(|(low, high)| (low.trim(), high.trim()))
        .ok_or_else(|| AnswerParseError::new("use the form <from>..<to>"))
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
        }
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut encoded, "{:02x}", byte).expect("writing to string cannot fail");
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: &str, multiple: bool) -> WizardQuestion {
        WizardQuestion {
            id: "q".into(),
            prompt: "Q".into(),
            description: None,
            kind: kind.into(),
            required: false,
            conditional_parent_id: None,
            options: vec!["a".into(), "b".into()],
            multiple,
        }
    }

    #[test]
    fn parses_typed_input() {
        assert_eq!(question("boolean", false).parse_answer("Yes").unwrap(), json!(true));
        assert_eq!(question("number", false).parse_answer("42").unwrap(), json!(42));
        assert_eq!(question("number", false).parse_answer("2.5").unwrap(), json!(2.5));
        assert_eq!(
            question("number-range", false).parse_answer("10..20").unwrap(),
            json!({"min": 10, "max": 20})
        );
        assert_eq!(
            question("date-range", false)
                .parse_answer("2024-01-01..2024-02-01")
                .unwrap(),
            json!({"start": "2024-01-01", "end": "2024-02-01"})
        );
        assert_eq!(
            question("multiple-choice", true).parse_answer("a, b").unwrap(),
            json!(["a", "b"])
        );
        assert_eq!(question("text", false).parse_answer("  ").unwrap(), Value::Null);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(question("boolean", false).parse_answer("maybe").is_err());
        assert!(question("number", false).parse_answer("many").is_err());
        assert!(question("number-range", false).parse_answer("10").is_err());
    }
}
