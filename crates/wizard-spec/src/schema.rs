use schemars::schema_for;
use serde_json::Value;

use crate::spec::config::WizardConfig;

/// JSON Schema describing a wizard configuration document.
pub fn config_schema() -> Value {
    serde_json::to_value(schema_for!(WizardConfig)).unwrap_or(Value::Null)
}
