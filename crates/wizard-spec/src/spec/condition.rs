use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operators understood by conditional branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equals,
    Contains,
    GreaterThan,
    LessThan,
    Between,
    /// Any operator name this build does not know; always evaluates to false.
    #[serde(other)]
    Unsupported,
}

/// Predicate evaluated against the anchor question's stored answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    pub fn new(operator: ConditionOperator, value: impl Into<Value>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    pub fn equals(value: impl Into<Value>) -> Self {
        Self::new(ConditionOperator::Equals, value)
    }

    /// Evaluates the condition. `None` and `null` answers never satisfy a condition.
    pub fn evaluate(&self, answer: Option<&Value>) -> bool {
        let Some(answer) = answer.filter(|value| !value.is_null()) else {
            return false;
        };
        match self.operator {
            ConditionOperator::Equals => values_equal(answer, &self.value),
            ConditionOperator::Contains => match answer {
                Value::String(text) => self
                    .value
                    .as_str()
                    .is_some_and(|needle| text.contains(needle)),
                Value::Array(items) => items.iter().any(|item| values_equal(item, &self.value)),
                _ => false,
            },
            ConditionOperator::GreaterThan => {
                matches!((answer.as_f64(), self.value.as_f64()), (Some(a), Some(b)) if a > b)
            }
            ConditionOperator::LessThan => {
                matches!((answer.as_f64(), self.value.as_f64()), (Some(a), Some(b)) if a < b)
            }
            ConditionOperator::Between => match (answer.as_f64(), between_bounds(&self.value)) {
                (Some(number), Some((low, high))) => low <= number && number <= high,
                _ => false,
            },
            ConditionOperator::Unsupported => {
                tracing::warn!("unsupported condition operator; branch hidden");
                false
            }
        }
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

/// Accepts `[low, high]` or `{ "min": low, "max": high }`.
fn between_bounds(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Array(items) if items.len() == 2 => Some((items[0].as_f64()?, items[1].as_f64()?)),
        Value::Object(map) => Some((map.get("min")?.as_f64()?, map.get("max")?.as_f64()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equals_compares_numbers_numerically() {
        let condition = Condition::equals(json!(5));
        assert!(condition.evaluate(Some(&json!(5.0))));
        assert!(!condition.evaluate(Some(&json!("5"))));
    }

    #[test]
    fn contains_checks_strings_and_arrays() {
        let condition = Condition::new(ConditionOperator::Contains, "cat");
        assert!(condition.evaluate(Some(&json!("concatenate"))));
        assert!(condition.evaluate(Some(&json!(["dog", "cat"]))));
        assert!(!condition.evaluate(Some(&json!(["dog"]))));
    }

    #[test]
    fn between_accepts_array_and_object_operands() {
        let array = Condition::new(ConditionOperator::Between, json!([1, 10]));
        let object = Condition::new(ConditionOperator::Between, json!({"min": 1, "max": 10}));
        assert!(array.evaluate(Some(&json!(10))));
        assert!(object.evaluate(Some(&json!(1))));
        assert!(!array.evaluate(Some(&json!(11))));
        let malformed = Condition::new(ConditionOperator::Between, json!([1]));
        assert!(!malformed.evaluate(Some(&json!(1))));
    }

    #[test]
    fn unknown_operator_deserializes_and_is_false() {
        let condition: Condition =
            serde_json::from_value(json!({"operator": "matchesRegex", "value": ".*"}))
                .expect("deserialize");
        assert_eq!(condition.operator, ConditionOperator::Unsupported);
        assert!(!condition.evaluate(Some(&json!("anything"))));
    }

    #[test]
    fn missing_or_null_answer_never_matches() {
        let condition = Condition::equals(Value::Null);
        assert!(!condition.evaluate(None));
        assert!(!condition.evaluate(Some(&Value::Null)));
    }
}
