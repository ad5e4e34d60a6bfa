//! Dynamically-typed payload values carried by molecules and schema config.
//!
//! JSON numbers decode to `f64` unconditionally — the evaluator relies on
//! this so that `42` and `42.0` compare equal without special-casing
//! integer widths (see `matching::compare`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PayloadValue>),
    Object(HashMap<String, PayloadValue>),
}

pub type Payload = HashMap<String, PayloadValue>;

impl PayloadValue {
    /// Coerces to `f64` when the value is numeric. Strings, bools, and
    /// compound values are never coerced — the evaluator only treats two
    /// numbers as numerically comparable, per the matching contract.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PayloadValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PayloadValue::Null)
    }

    pub fn from_str(s: impl Into<String>) -> Self {
        PayloadValue::String(s.into())
    }

    pub fn from_f64(n: f64) -> Self {
        PayloadValue::Number(n)
    }
}

impl From<&str> for PayloadValue {
    fn from(s: &str) -> Self {
        PayloadValue::String(s.to_string())
    }
}

impl From<f64> for PayloadValue {
    fn from(n: f64) -> Self {
        PayloadValue::Number(n)
    }
}

impl From<bool> for PayloadValue {
    fn from(b: bool) -> Self {
        PayloadValue::Bool(b)
    }
}

/// Canonical string form used as an index key (`bySpeciesFieldValue`) and as
/// the fallback for string comparisons. Whole-valued numbers print without a
/// trailing `.0` so `42` and `42.0` hash to the same bucket.
impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadValue::Null => write!(f, "null"),
            PayloadValue::Bool(b) => write!(f, "{b}"),
            PayloadValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            PayloadValue::String(s) => write!(f, "{s}"),
            PayloadValue::Array(_) | PayloadValue::Object(_) => {
                let encoded = serde_json::to_string(self).unwrap_or_default();
                write!(f, "{encoded}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_float_display_match() {
        assert_eq!(PayloadValue::Number(42.0).to_string(), "42");
        assert_eq!(PayloadValue::Number(42.5).to_string(), "42.5");
    }

    #[test]
    fn as_f64_only_coerces_numbers() {
        assert_eq!(PayloadValue::Number(1.0).as_f64(), Some(1.0));
        assert_eq!(PayloadValue::String("1".into()).as_f64(), None);
        assert_eq!(PayloadValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn deserializes_from_untagged_json() {
        let v: PayloadValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, PayloadValue::Number(42.0));
        let v: PayloadValue = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(v, PayloadValue::String("hi".into()));
        let v: PayloadValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, PayloadValue::Null);
    }
}
