//! Discrete/continuous classification of resolved signals.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use sigtag_model::{SignalTable, SignalValue};

use crate::diagnostics::Diagnostic;

/// Tokens accepted as the two states of a digital signal.
pub const BOOLEAN_TOKENS: [&str; 8] = ["ON", "OFF", "0", "1", "0.0", "1.0", "TRUE", "FALSE"];

/// Tokens read as the high state when rendering a digital signal.
pub const ON_TOKENS: [&str; 4] = ["ON", "1", "1.0", "TRUE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Two-valued digital I/O.
    Discrete,
    /// Analog.
    Continuous,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete => write!(f, "discrete"),
            Self::Continuous => write!(f, "continuous"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("signal '{0}' not found in table")]
    NotFound(String),
    #[error("signal '{signal}' has {len} samples, table has {expected}")]
    LengthMismatch {
        signal: String,
        len: usize,
        expected: usize,
    },
}

/// Ordered partition of the classified signals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub discrete: Vec<String>,
    pub continuous: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Classification {
    pub fn len(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind_of(&self, signal: &str) -> Option<SignalKind> {
        if self.discrete.iter().any(|s| s == signal) {
            Some(SignalKind::Discrete)
        } else if self.continuous.iter().any(|s| s == signal) {
            Some(SignalKind::Continuous)
        } else {
            None
        }
    }
}

/// Hashable identity of a sample for distinct-value counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DistinctKey<'a> {
    Bool(bool),
    Number(u64),
    Text(&'a str),
}

fn distinct_key(value: &SignalValue) -> Option<DistinctKey<'_>> {
    if value.is_missing() {
        return None;
    }
    match value {
        SignalValue::Missing => None,
        SignalValue::Bool(flag) => Some(DistinctKey::Bool(*flag)),
        // -0.0 and 0.0 are the same sample
        SignalValue::Number(number) => Some(DistinctKey::Number((number + 0.0).to_bits())),
        SignalValue::Text(text) => Some(DistinctKey::Text(text)),
    }
}

/// Distinct non-missing values, in first-seen order.
pub fn distinct_values(values: &[SignalValue]) -> Vec<&SignalValue> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .filter(|value| distinct_key(*value).is_some_and(|key| seen.insert(key)))
        .collect()
}

/// Classifies one value sequence.
///
/// Up to two distinct values are discrete when every value reads as a
/// boolean token. More than two are continuous when all of them coerce to
/// numbers, and discrete otherwise.
///
/// # Examples
///
/// ```
/// use sigtag_map::{SignalKind, classify_values};
/// use sigtag_model::SignalValue;
///
/// let pump = [SignalValue::from("ON"), SignalValue::from("OFF")];
/// assert_eq!(classify_values(&pump), SignalKind::Discrete);
///
/// let level = [0.0, 1.0, 2.0].map(SignalValue::from);
/// assert_eq!(classify_values(&level), SignalKind::Continuous);
/// ```
pub fn classify_values(values: &[SignalValue]) -> SignalKind {
    let distinct = distinct_values(values);
    if distinct.len() <= 2 {
        let all_boolean = distinct
            .iter()
            .all(|value| BOOLEAN_TOKENS.contains(&value.to_token().as_str()));
        return if all_boolean {
            SignalKind::Discrete
        } else {
            SignalKind::Continuous
        };
    }
    let numeric = values
        .iter()
        .filter(|value| !value.is_missing())
        .all(|value| value.as_f64().is_some());
    if numeric {
        SignalKind::Continuous
    } else {
        SignalKind::Discrete
    }
}

/// Classifies the column named `signal` in `table`.
///
/// # Errors
///
/// Fails when the column is absent or its length disagrees with the table.
pub fn classify_column(table: &SignalTable, signal: &str) -> Result<SignalKind, ClassifyError> {
    // Duplicate names resolve to the first column, like any name lookup.
    let column = table
        .column(signal)
        .ok_or_else(|| ClassifyError::NotFound(signal.to_string()))?;
    if column.len() != table.height() {
        return Err(ClassifyError::LengthMismatch {
            signal: signal.to_string(),
            len: column.len(),
            expected: table.height(),
        });
    }
    Ok(classify_values(&column.values))
}

/// Splits `signals` into discrete and continuous lists ordered by `order`.
///
/// Only entries of `order` that are also in `signals` and present in
/// `table` are classified; each is classified once. A signal that cannot be
/// classified is reported and counted as continuous.
pub fn classify_signals<S, O>(table: &SignalTable, signals: &[S], order: &[O]) -> Classification
where
    S: AsRef<str>,
    O: AsRef<str>,
{
    let wanted: BTreeSet<&str> = signals.iter().map(AsRef::as_ref).collect();
    let mut done = BTreeSet::new();
    let mut classification = Classification::default();

    for signal in order.iter().map(AsRef::as_ref) {
        if !wanted.contains(signal) || !table.contains(signal) || !done.insert(signal) {
            continue;
        }
        let kind = match classify_column(table, signal) {
            Ok(kind) => kind,
            Err(error) => {
                warn!(signal, %error, "classification failed, treating as continuous");
                classification
                    .diagnostics
                    .push(Diagnostic::ClassificationFailure {
                        signal: signal.to_string(),
                        message: error.to_string(),
                    });
                SignalKind::Continuous
            }
        };
        match kind {
            SignalKind::Discrete => classification.discrete.push(signal.to_string()),
            SignalKind::Continuous => classification.continuous.push(signal.to_string()),
        }
    }
    debug!(
        discrete = classification.discrete.len(),
        continuous = classification.continuous.len(),
        "classified signals"
    );
    classification
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_is_not_a_new_value() {
        let values = [SignalValue::Number(0.0), SignalValue::Number(-0.0)];
        assert_eq!(distinct_values(&values).len(), 1);
    }

    #[test]
    fn missing_values_are_ignored() {
        let values = [
            SignalValue::Missing,
            SignalValue::Number(f64::NAN),
            SignalValue::from("ON"),
        ];
        assert_eq!(distinct_values(&values).len(), 1);
        assert_eq!(classify_values(&values), SignalKind::Discrete);
    }

    #[test]
    fn all_missing_is_discrete() {
        assert_eq!(classify_values(&[SignalValue::Missing]), SignalKind::Discrete);
    }
}
