use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One transformed result row: field name mapped to its coerced value,
/// kept in the order the log-search service returned the fields.
pub type StatRecord = IndexMap<String, StatValue>;

/// Typed field values — the service returns every value as a string, and
/// numeric-looking ones are coerced on ingestion.
///
/// Serialized untagged, so a record renders as plain `number | string` JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    /// Numeric coercion of a raw field value.
    ///
    /// Values that parse as a finite `f64` become [`StatValue::Number`];
    /// everything else stays [`StatValue::Text`]. The literal strings
    /// `"NaN"`, `"inf"` and friends parse but are not finite, so they are
    /// kept as text.
    pub fn coerce(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => StatValue::Number(n),
            _ => StatValue::Text(raw.to_string()),
        }
    }

    /// Extract as string, returning None for numbers.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract as number, returning None for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) => write!(f, "{}", n),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}
