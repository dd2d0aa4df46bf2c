use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A single attribute value stored on a [`Record`](super::Record).
///
/// Attribute names are open-ended, but values are limited to these shapes.
/// Serialized untagged, so the JSON file holds plain strings, numbers and
/// string arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    String(String),
    Integer(i64),
    Float(f64),
    StringList(Vec<String>),
}

impl AttrValue {
    /// Infer a typed value from a raw command token.
    ///
    /// - only ASCII digits: integer (a float if it does not fit in `i64`)
    /// - anything `f64` accepts with a finite result: float
    /// - otherwise the token itself, as a string
    ///
    /// `nan` and `inf` stay strings because JSON cannot store them.
    pub fn coerce(token: &str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = token.parse::<i64>() {
                return Self::Integer(n);
            }
        }
        match token.parse::<f64>() {
            Ok(f) if f.is_finite() => Self::Float(f),
            _ => Self::String(token.to_string()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::StringList(_) => "list",
        }
    }

    /// JSON form of the value. `None` only for a non-finite float, which
    /// JSON cannot represent.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::String(s) => Some(Value::String(s.clone())),
            Self::Integer(n) => Some(Value::from(*n)),
            Self::Float(f) => Number::from_f64(*f).map(Value::Number),
            Self::StringList(items) => Some(Value::Array(
                items.iter().cloned().map(Value::String).collect(),
            )),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// Quote a string the way the console displays it: single quotes unless the
/// text itself contains a single quote and no double quote.
pub(crate) fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{}\"", s)
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Whole floats keep a trailing `.0` so they read differently from integers.
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", quote(s)),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", format_float(*x)),
            Self::StringList(items) => {
                let inner: Vec<String> = items.iter().map(|s| quote(s)).collect();
                write!(f, "[{}]", inner.join(", "))
            }
        }
    }
}
