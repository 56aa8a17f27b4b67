use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Text,
    Flag,
    List,
}

/// The current value of a field as consumed by rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl Default for ResolvedValue {
    fn default() -> Self {
        ResolvedValue::Text(String::new())
    }
}

impl ResolvedValue {
    pub fn empty(shape: ValueShape) -> Self {
        match shape {
            ValueShape::Text => ResolvedValue::Text(String::new()),
            ValueShape::Flag => ResolvedValue::Flag(false),
            ValueShape::List => ResolvedValue::List(Vec::new()),
        }
    }

    pub fn shape(&self) -> ValueShape {
        match self {
            ResolvedValue::Flag(_) => ValueShape::Flag,
            ResolvedValue::Text(_) => ValueShape::Text,
            ResolvedValue::List(_) => ValueShape::List,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResolvedValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ResolvedValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ResolvedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ResolvedValue::Flag(flag) => !flag,
            ResolvedValue::Text(text) => text.is_empty(),
            ResolvedValue::List(items) => items.is_empty(),
        }
    }

    /// Reshape a value read from the outside world into the shape a field renders.
    /// A bare string read for a multi-select becomes a one-element array.
    pub fn coerce(self, shape: ValueShape) -> Self {
        match (shape, self) {
            (ValueShape::List, ResolvedValue::List(items)) => ResolvedValue::List(items),
            (ValueShape::List, ResolvedValue::Text(text)) => {
                if text.is_empty() {
                    ResolvedValue::List(Vec::new())
                } else {
                    ResolvedValue::List(vec![text])
                }
            }
            (ValueShape::List, ResolvedValue::Flag(_)) => ResolvedValue::List(Vec::new()),
            (ValueShape::Text, ResolvedValue::Text(text)) => ResolvedValue::Text(text),
            (ValueShape::Text, ResolvedValue::List(items)) => {
                ResolvedValue::Text(items.into_iter().next().unwrap_or_default())
            }
            (ValueShape::Text, ResolvedValue::Flag(flag)) => ResolvedValue::Text(flag.to_string()),
            (ValueShape::Flag, ResolvedValue::Flag(flag)) => ResolvedValue::Flag(flag),
            (ValueShape::Flag, ResolvedValue::Text(text)) => {
                ResolvedValue::Flag(matches!(text.as_str(), "true" | "on" | "yes" | "1"))
            }
            (ValueShape::Flag, ResolvedValue::List(items)) => ResolvedValue::Flag(!items.is_empty()),
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self.coerce(ValueShape::List) {
            ResolvedValue::List(items) => items,
            _ => Vec::new(),
        }
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(ResolvedValue::Flag(*flag)),
            Value::String(text) => Some(ResolvedValue::Text(text.clone())),
            Value::Number(number) => Some(ResolvedValue::Text(number.to_string())),
            Value::Array(items) => Some(ResolvedValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text.clone()),
                        Value::Number(number) => Some(number.to_string()),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Null | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ResolvedValue::Flag(flag) => Value::Bool(*flag),
            ResolvedValue::Text(text) => Value::String(text.clone()),
            ResolvedValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for ResolvedValue {
    fn from(value: &str) -> Self {
        ResolvedValue::Text(value.to_string())
    }
}

impl From<String> for ResolvedValue {
    fn from(value: String) -> Self {
        ResolvedValue::Text(value)
    }
}

impl From<bool> for ResolvedValue {
    fn from(value: bool) -> Self {
        ResolvedValue::Flag(value)
    }
}

impl From<Vec<String>> for ResolvedValue {
    fn from(value: Vec<String>) -> Self {
        ResolvedValue::List(value)
    }
}
