use handlebars::Handlebars;
use serde_json::json;

use crate::answers::AnswerStore;
use crate::error::WizardError;

/// Renders question prompts that reference earlier answers, e.g. `{{answers.name}}`.
pub struct PromptTemplates {
    handlebars: Handlebars<'static>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptTemplates {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    pub fn try_render(&self, text: &str, answers: &AnswerStore) -> Result<String, WizardError> {
        if !text.contains("{{") {
            return Ok(text.to_string());
        }
        let data = json!({ "answers": answers.as_object() });
        self.handlebars
            .render_template(text, &data)
            .map_err(|err| WizardError::Template(Box::new(err)))
    }

    /// Renders `text`, falling back to the raw template when it does not render.
    pub fn render(&self, text: &str, answers: &AnswerStore) -> String {
        self.try_render(text, answers).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "prompt template failed; using raw text");
            text.to_string()
        })
    }
}
