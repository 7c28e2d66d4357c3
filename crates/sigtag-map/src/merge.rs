//! Intersection of signals resolved from several sources.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sigtag_model::SignalTable;

use crate::diagnostics::Diagnostic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "signals", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Signals present in every source, in the first source's order.
    Common(Vec<String>),
    /// Nothing is shared; no plot should be produced.
    NoCommonSignals,
}

impl MergeOutcome {
    pub fn signals(&self) -> &[String] {
        match self {
            Self::Common(signals) => signals,
            Self::NoCommonSignals => &[],
        }
    }

    /// Diagnostic describing an empty intersection, if this is one.
    pub fn diagnostic(&self, sources: usize) -> Option<Diagnostic> {
        match self {
            Self::Common(_) => None,
            Self::NoCommonSignals => Some(Diagnostic::EmptyIntersection { sources }),
        }
    }
}

/// Ordered intersection of name lists, excluding `exclude`.
pub fn intersect_ordered<S: AsRef<str>>(sets: &[Vec<S>], exclude: Option<&str>) -> Vec<String> {
    let Some((first, rest)) = sets.split_first() else {
        return Vec::new();
    };
    let others: Vec<BTreeSet<&str>> = rest
        .iter()
        .map(|set| set.iter().map(AsRef::as_ref).collect())
        .collect();
    let mut seen = BTreeSet::new();
    first
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| Some(*name) != exclude)
        .filter(|name| others.iter().all(|set| set.contains(name)))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Column names shared by every table, ignoring the time column.
pub fn common_signals(tables: &[SignalTable], time_column: Option<&str>) -> MergeOutcome {
    let sets: Vec<Vec<&str>> = tables.iter().map(SignalTable::column_names).collect();
    let common = intersect_ordered(&sets, time_column);
    if common.is_empty() {
        warn!(sources = tables.len(), "no common signals");
        MergeOutcome::NoCommonSignals
    } else {
        info!(sources = tables.len(), common = common.len(), "merged sources");
        MergeOutcome::Common(common)
    }
}
