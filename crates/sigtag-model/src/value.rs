//! Sample values carried by signal columns.
//!
//! Source tables mix strings, numbers and booleans inside a single column.
//! [`SignalValue`] closes that set so classification can match on it
//! instead of inspecting runtime types.

use serde::{Deserialize, Serialize};

/// A single sample of a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum SignalValue {
    /// No sample recorded (empty cell, null).
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SignalValue {
    /// Parses a raw cell from a text source.
    ///
    /// Empty cells become [`SignalValue::Missing`], `true`/`false` become
    /// booleans (case-insensitive), anything that parses as `f64` becomes a
    /// number and the rest is kept as trimmed text.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigtag_model::SignalValue;
    ///
    /// assert_eq!(SignalValue::parse_cell(" "), SignalValue::Missing);
    /// assert_eq!(SignalValue::parse_cell("TRUE"), SignalValue::Bool(true));
    /// assert_eq!(SignalValue::parse_cell("1.5"), SignalValue::Number(1.5));
    /// assert_eq!(SignalValue::parse_cell("ON"), SignalValue::Text("ON".into()));
    /// ```
    pub fn parse_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        match parse_f64(trimmed) {
            Some(number) => Self::Number(number),
            None => Self::Text(trimmed.to_string()),
        }
    }

    /// True for [`SignalValue::Missing`] and for `NaN` numbers.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(value) => value.is_nan(),
            Self::Bool(_) | Self::Text(_) => false,
        }
    }

    /// Numeric coercion: numbers as-is, booleans as 0/1, text if it parses.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Missing => None,
            Self::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            Self::Number(value) => Some(*value),
            Self::Text(text) => parse_f64(text),
        }
    }

    /// Upper-cased string form used for boolean-token comparison.
    pub fn to_token(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Bool(value) => if *value { "TRUE" } else { "FALSE" }.to_string(),
            Self::Number(value) => format_numeric(*value).to_uppercase(),
            Self::Text(text) => text.to_uppercase(),
        }
    }
}

impl From<f64> for SignalValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for SignalValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SignalValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SignalValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<SignalValue>> From<Option<T>> for SignalValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Formats a floating-point number without a trailing `.0` for integral values.
pub fn format_numeric(value: f64) -> String {
    format!("{value}")
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}
