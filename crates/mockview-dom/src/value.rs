//! Script results converted into plain Rust values.

use std::collections::BTreeMap;

use serde::Deserialize;

use mockview_common::DomError;

/// A script value after crossing into Rust.
///
/// Anything JSON can represent comes back structurally. Functions, nodes,
/// and cyclic objects come back as [`ScriptValue::Opaque`] carrying a
/// display string.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<ScriptValue>),
    Object(BTreeMap<String, ScriptValue>),
    Opaque(String),
}

#[derive(Deserialize)]
#[serde(tag = "t", content = "v")]
enum Captured {
    #[serde(rename = "u")]
    Undefined,
    #[serde(rename = "j")]
    Json(serde_json::Value),
    #[serde(rename = "o")]
    Opaque(String),
}

impl ScriptValue {
    /// Decode the tagged envelope produced by `__mockview_dom.capture`.
    pub(crate) fn from_capture(raw: &str) -> Result<Self, DomError> {
        let captured: Captured =
            serde_json::from_str(raw).map_err(|e| DomError::Decode(e.to_string()))?;
        Ok(match captured {
            Captured::Undefined => Self::Undefined,
            Captured::Json(value) => Self::from_json(value),
            Captured::Opaque(display) => Self::Opaque(display),
        })
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// JSON form; `Undefined` maps to `null` and opaque values to their display string.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Self::Undefined | Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::String(s) | Self::Opaque(s) => Value::String(s.clone()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Opaque(_) => "opaque",
        }
    }
}
