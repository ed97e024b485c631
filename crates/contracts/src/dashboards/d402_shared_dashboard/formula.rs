use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Binary arithmetic operator of a formula node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Division by zero yields 0.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                if right == 0.0 {
                    0.0
                } else {
                    left / right
                }
            }
        }
    }
}

/// Expression tree of a calculation.
///
/// Deserialization never fails: nodes with an unknown `type`, missing
/// children or an unknown operator are kept as `Invalid` or as an
/// `Operation` with `None` parts, and evaluate to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", from = "Value")]
pub enum FormulaNode {
    Constant {
        value: f64,
    },
    Variable {
        #[serde(rename = "variableId")]
        variable_id: String,
    },
    Metric {
        #[serde(rename = "metricKey")]
        metric_key: String,
    },
    CustomField {
        #[serde(rename = "customFieldId")]
        custom_field_id: String,
    },
    Operation {
        operator: Option<Operator>,
        left: Option<Box<FormulaNode>>,
        right: Option<Box<FormulaNode>>,
    },
    Invalid,
}

impl FormulaNode {
    pub fn constant(value: f64) -> Self {
        FormulaNode::Constant { value }
    }

    pub fn variable(id: &str) -> Self {
        FormulaNode::Variable {
            variable_id: id.to_string(),
        }
    }

    pub fn metric(key: &str) -> Self {
        FormulaNode::Metric {
            metric_key: key.to_string(),
        }
    }

    pub fn custom_field(id: &str) -> Self {
        FormulaNode::CustomField {
            custom_field_id: id.to_string(),
        }
    }

    pub fn operation(operator: Operator, left: FormulaNode, right: FormulaNode) -> Self {
        FormulaNode::Operation {
            operator: Some(operator),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Parse a stored formula. Invalid JSON gives `Invalid`.
    pub fn from_json_str(s: &str) -> Self {
        serde_json::from_str::<Value>(s)
            .map(FormulaNode::from)
            .unwrap_or(FormulaNode::Invalid)
    }
}

fn str_field<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

fn child(obj: &serde_json::Map<String, Value>, key: &str) -> Option<Box<FormulaNode>> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(Box::new(FormulaNode::from(v.clone()))),
    }
}

impl From<Value> for FormulaNode {
    fn from(value: Value) -> Self {
        let Value::Object(obj) = value else {
            return FormulaNode::Invalid;
        };
        let kind = str_field(&obj, &["type"]).unwrap_or_default();

        match kind {
            "constant" => {
                match obj.get("value").and_then(Value::as_f64) {
                    Some(v) if v.is_finite() => FormulaNode::Constant { value: v },
                    _ => FormulaNode::Invalid,
                }
            }
            "variable" => match str_field(&obj, &["variableId", "variable_id"]) {
                Some(id) => FormulaNode::variable(id),
                None => FormulaNode::Invalid,
            },
            "metric" => match str_field(&obj, &["metricKey", "metric_key"]) {
                Some(key) => FormulaNode::metric(key),
                None => FormulaNode::Invalid,
            },
            "custom_field" | "customField" => {
                match str_field(&obj, &["customFieldId", "custom_field_id"]) {
                    Some(id) => FormulaNode::custom_field(id),
                    None => FormulaNode::Invalid,
                }
            }
            "operation" => FormulaNode::Operation {
                operator: str_field(&obj, &["operator"]).and_then(Operator::from_symbol),
                left: child(&obj, "left"),
                right: child(&obj, "right"),
            },
            _ => FormulaNode::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_operation() {
        let node: FormulaNode = serde_json::from_value(json!({
            "type": "operation",
            "operator": "/",
            "left": { "type": "metric", "metricKey": "sales_total_value" },
            "right": { "type": "variable", "variableId": "v-meta" }
        }))
        .unwrap();

        assert_eq!(
            node,
            FormulaNode::operation(
                Operator::Divide,
                FormulaNode::metric("sales_total_value"),
                FormulaNode::variable("v-meta"),
            )
        );
    }

    #[test]
    fn test_malformed_nodes_do_not_fail_parsing() {
        let node: FormulaNode = serde_json::from_value(json!({
            "type": "operation",
            "operator": "%",
            "left": { "type": "mystery" },
        }))
        .unwrap();

        assert_eq!(
            node,
            FormulaNode::Operation {
                operator: None,
                left: Some(Box::new(FormulaNode::Invalid)),
                right: None,
            }
        );

        assert_eq!(FormulaNode::from_json_str("not json"), FormulaNode::Invalid);
        assert_eq!(FormulaNode::from(json!(42)), FormulaNode::Invalid);
        assert_eq!(
            FormulaNode::from(json!({"type": "variable"})),
            FormulaNode::Invalid
        );
    }

    #[test]
    fn test_only_numbers_and_basic_operators_are_accepted() {
        assert_eq!(
            FormulaNode::from(json!({"type": "constant", "value": "2.5"})),
            FormulaNode::Invalid
        );
        for symbol in ["x", "×", "÷", " + ", "plus"] {
            assert_eq!(Operator::from_symbol(symbol), None, "symbol {symbol:?}");
        }
        for (symbol, op) in [
            ("+", Operator::Add),
            ("-", Operator::Subtract),
            ("*", Operator::Multiply),
            ("/", Operator::Divide),
        ] {
            assert_eq!(Operator::from_symbol(symbol), Some(op));
        }
    }

    #[test]
    fn test_serialized_form_parses_back() {
        let node = FormulaNode::operation(
            Operator::Multiply,
            FormulaNode::custom_field("cf-1"),
            FormulaNode::constant(3.0),
        );
        let text = serde_json::to_string(&node).unwrap();
        assert!(text.contains("\"customFieldId\":\"cf-1\""));
        assert_eq!(FormulaNode::from_json_str(&text), node);
    }

    #[test]
    fn test_divide_by_zero_is_zero() {
        assert_eq!(Operator::Divide.apply(10.0, 0.0), 0.0);
        assert_eq!(Operator::Divide.apply(10.0, 4.0), 2.5);
        assert_eq!(Operator::Subtract.apply(1.0, 4.0), -3.0);
    }
}
