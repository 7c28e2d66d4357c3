//! Resolution of requested tags to table columns.
//!
//! Requested tags are processed in caller order; that order is preserved in
//! the extraction. A physical column is selected at most once per request.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use sigtag_model::{SignalTable, SignalValue};

use crate::diagnostics::{Diagnostic, UnresolvedReason};
use crate::normalize::TagMapping;
use crate::options::ResolveOptions;

/// Number of table columns quoted in an extraction failure.
const SAMPLE_COLUMN_COUNT: usize = 10;

/// A requested tag bound to a source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTag {
    pub tag: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedTag {
    pub tag: String,
    pub reason: UnresolvedReason,
}

/// Borrowed view of one extracted signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSignal<'a> {
    pub tag: &'a str,
    pub column: &'a str,
    pub values: &'a [SignalValue],
}

/// Result of [`resolve_tags`].
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Copies of the resolved columns, renamed to their tags, in request order.
    pub extracted: SignalTable,
    pub resolved: Vec<ResolvedTag>,
    pub unresolved: Vec<UnresolvedTag>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.extracted.is_empty()
    }

    pub fn resolved_tags(&self) -> Vec<&str> {
        self.resolved.iter().map(|r| r.tag.as_str()).collect()
    }

    pub fn unresolved_tags(&self) -> Vec<&str> {
        self.unresolved.iter().map(|u| u.tag.as_str()).collect()
    }

    /// Iterates `(tag, source column, values)` for every extracted signal.
    pub fn signals(&self) -> impl Iterator<Item = ResolvedSignal<'_>> {
        self.resolved
            .iter()
            .zip(self.extracted.columns())
            .map(|(resolved, column)| ResolvedSignal {
                tag: &resolved.tag,
                column: &resolved.column,
                values: &column.values,
            })
    }

    fn mark_unresolved(&mut self, tag: &str, reason: UnresolvedReason, suggestions: Vec<String>) {
        warn!(tag, %reason, ?suggestions, "tag not resolved");
        if !self.unresolved.iter().any(|u| u.tag == tag) {
            self.unresolved.push(UnresolvedTag {
                tag: tag.to_string(),
                reason: reason.clone(),
            });
        }
        self.diagnostics.push(Diagnostic::UnresolvedTag {
            tag: tag.to_string(),
            reason,
            suggestions,
        });
    }
}

/// Maps each requested tag to a column of `table` and extracts those columns.
///
/// Unknown tags, out-of-range positions and repeated selections are
/// reported through [`Resolution::unresolved`] and
/// [`Resolution::diagnostics`]; this function never fails.
pub fn resolve_tags<S: AsRef<str>>(
    mapping: &TagMapping,
    table: &SignalTable,
    requested: &[S],
    options: &ResolveOptions,
) -> Resolution {
    let span = info_span!("resolve", requested = requested.len(), width = table.width());
    let _guard = span.enter();

    let mut resolution = Resolution::default();
    let mut selected_columns = BTreeSet::new();
    let mut tentative = Vec::new();

    for raw in requested {
        let tag = raw.as_ref().trim();
        let Some(position) = mapping.position(tag) else {
            let suggestions = mapping.similar_tags(tag, options.suggestion_limit);
            resolution.mark_unresolved(tag, UnresolvedReason::NotInMapping, suggestions);
            continue;
        };
        let Some(column) = table.column_at(position) else {
            let reason = UnresolvedReason::PositionOutOfRange {
                position,
                width: table.width(),
            };
            resolution.mark_unresolved(tag, reason, Vec::new());
            continue;
        };
        if !selected_columns.insert(column.name.clone()) {
            warn!(tag, column = %column.name, "column already selected");
            resolution.diagnostics.push(Diagnostic::DuplicateSelection {
                tag: tag.to_string(),
                column: column.name.clone(),
            });
            continue;
        }
        tentative.push(ResolvedTag {
            tag: tag.to_string(),
            column: column.name.clone(),
        });
    }

    let reconciled = reconcile(table, tentative, &mut resolution);
    if reconciled.is_empty() {
        info!(
            resolved = 0,
            unresolved = resolution.unresolved.len(),
            "no columns to extract"
        );
        return resolution;
    }

    let pairs: Vec<(&str, &str)> = reconciled
        .iter()
        .map(|r| (r.column.as_str(), r.tag.as_str()))
        .collect();
    match table.select_renamed(&pairs) {
        Ok(extracted) => {
            info!(
                resolved = reconciled.len(),
                requested = requested.len(),
                rows = extracted.height(),
                "extracted tagged columns"
            );
            resolution.extracted = extracted;
            resolution.resolved = reconciled;
        }
        Err(error) => {
            let attempted: Vec<String> = reconciled.into_iter().map(|r| r.column).collect();
            warn!(%error, ?attempted, "extraction failed");
            resolution.diagnostics.push(Diagnostic::ExtractionFailure {
                message: error.to_string(),
                attempted,
                sample_columns: table
                    .column_names()
                    .into_iter()
                    .take(SAMPLE_COLUMN_COUNT)
                    .map(str::to_string)
                    .collect(),
                ambiguous_columns: ambiguous_columns(table),
            });
        }
    }
    resolution
}

/// Re-checks every tentative column against the table.
///
/// A column that is no longer present verbatim (for example after a loader
/// appended a `.1` suffix) is replaced by the first table column that
/// contains or starts with the expected name. Tags without a substitute are
/// dropped and reported. A column is never handed out twice: a later tag
/// naming an already selected column is reported as a duplicate selection.
pub fn reconcile(
    table: &SignalTable,
    tentative: Vec<ResolvedTag>,
    resolution: &mut Resolution,
) -> Vec<ResolvedTag> {
    let mut used = BTreeSet::new();
    let mut reconciled = Vec::with_capacity(tentative.len());
    for ResolvedTag { tag, column } in tentative {
        if table.contains(&column) {
            if used.insert(column.clone()) {
                reconciled.push(ResolvedTag { tag, column });
            } else {
                warn!(tag = %tag, column = %column, "column already selected");
                resolution.diagnostics.push(Diagnostic::DuplicateSelection { tag, column });
            }
            continue;
        }
        let substitute = table
            .column_names()
            .into_iter()
            .filter(|name| !used.contains(*name))
            .find(|name| name.contains(column.as_str()) || name.starts_with(column.as_str()))
            .map(str::to_string);
        match substitute {
            Some(actual) => {
                info!(tag = %tag, expected = %column, actual = %actual, "column substituted");
                resolution.diagnostics.push(Diagnostic::ColumnSubstituted {
                    tag: tag.clone(),
                    expected: column,
                    actual: actual.clone(),
                });
                used.insert(actual.clone());
                reconciled.push(ResolvedTag {
                    tag,
                    column: actual,
                });
            }
            None => {
                let reason = UnresolvedReason::ColumnMissing { column };
                resolution.mark_unresolved(&tag, reason, Vec::new());
            }
        }
    }
    reconciled
}

/// Groups column names that share a base name before the first `.`.
fn ambiguous_columns(table: &SignalTable) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for name in table.column_names() {
        let base = name.split('.').next().unwrap_or(name);
        match groups.iter_mut().find(|(existing, _)| existing == base) {
            Some((_, variants)) => variants.push(name.to_string()),
            None => groups.push((base.to_string(), vec![name.to_string()])),
        }
    }
    groups.retain(|(_, variants)| variants.len() > 1);
    groups
}
