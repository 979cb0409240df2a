//! Concrete sample values and the relaxed boolean equivalence used when
//! grading simulation output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete value carried by an asserted sample.
///
/// Numeric signals hold `Int`; enumerated or opaque simulator output
/// (state names, tuples of floats) holds `Text`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// An integer value.
    Int(i64),
    /// A symbolic or opaque value, kept verbatim.
    Text(String),
}

impl Value {
    /// Parses simulator text into a value, preferring an integer reading.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// Returns the integer if this value is numeric.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Reads this value as a boolean logic level.
    ///
    /// `0`/`1`, `low`/`high`, `false`/`true` (any case) and their
    /// one-letter forms are all accepted. Anything else is not a logic level.
    pub fn as_logic(&self) -> Option<bool> {
        match self {
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            Value::Int(_) => None,
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "0" | "low" | "l" | "false" | "f" => Some(false),
                "1" | "high" | "h" | "true" | "t" => Some(true),
                _ => None,
            },
        }
    }

    /// Returns `true` if both values denote the same logic level or are equal.
    pub fn loosely_eq(&self, other: &Value) -> bool {
        match (self.as_logic(), other.as_logic()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Formats the value as a simulator literal.
    ///
    /// Negative integers are parenthesized so they survive inside list
    /// and application syntax.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Int(n) if *n < 0 => format!("({n})"),
            Value::Int(n) => n.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
